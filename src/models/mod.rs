use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

mod record;
mod user;

pub use record::{parse_series_order, Candidate, ListSnapshot, Record};
pub use user::UserSession;

/// Token selecting cross-list mode on the wheel
pub const ALL_LISTS: &str = "all";

/// One of the user's tracked lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ListType {
    #[serde(rename = "movies")]
    Movies,
    #[serde(rename = "tvShows")]
    TvShows,
    #[serde(rename = "anime")]
    Anime,
    #[serde(rename = "books")]
    Books,
}

impl ListType {
    /// Every list, in display order
    pub const ALL: [ListType; 4] = [
        ListType::Movies,
        ListType::TvShows,
        ListType::Anime,
        ListType::Books,
    ];

    /// Key used by the store for this list
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Movies => "movies",
            ListType::TvShows => "tvShows",
            ListType::Anime => "anime",
            ListType::Books => "books",
        }
    }

    /// Human label used on result cards
    pub fn label(&self) -> &'static str {
        match self {
            ListType::Movies => "Movie",
            ListType::TvShows => "TV Show",
            ListType::Anime => "Anime",
            ListType::Books => "Book",
        }
    }

    /// Lists whose entries can have sequels. Books are always standalone.
    pub fn is_series_bearing(&self) -> bool {
        !matches!(self, ListType::Books)
    }

    /// Lists that expose an actor filter
    pub fn supports_actor_filter(&self) -> bool {
        self.is_series_bearing()
    }
}

impl Display for ListType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListType::ALL
            .into_iter()
            .find(|list_type| list_type.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// What a spin draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinTarget {
    List(ListType),
    All,
}

impl SpinTarget {
    /// Parses a wheel source selection; unknown names are returned as the error
    pub fn parse(source: &str) -> Result<Self, String> {
        let source = source.trim();
        if source == ALL_LISTS {
            return Ok(SpinTarget::All);
        }
        source.parse().map(SpinTarget::List)
    }

    /// Lists that must be loaded for this target
    pub fn list_types(&self) -> Vec<ListType> {
        match self {
            SpinTarget::List(list_type) => vec![*list_type],
            SpinTarget::All => ListType::ALL.to_vec(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, SpinTarget::All)
    }
}

impl Display for SpinTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpinTarget::List(list_type) => write!(f, "{}", list_type),
            SpinTarget::All => write!(f, "{}", ALL_LISTS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_type_round_trips_store_keys() {
        for list_type in ListType::ALL {
            assert_eq!(list_type.as_str().parse::<ListType>(), Ok(list_type));
        }
        let json = serde_json::to_string(&ListType::TvShows).unwrap();
        assert_eq!(json, "\"tvShows\"");
    }

    #[test]
    fn test_books_are_standalone() {
        assert!(ListType::Movies.is_series_bearing());
        assert!(ListType::Anime.is_series_bearing());
        assert!(!ListType::Books.is_series_bearing());
    }

    #[test]
    fn test_spin_target_parse() {
        assert_eq!(SpinTarget::parse("all"), Ok(SpinTarget::All));
        assert_eq!(
            SpinTarget::parse("anime"),
            Ok(SpinTarget::List(ListType::Anime))
        );
        assert_eq!(SpinTarget::parse("podcasts"), Err("podcasts".to_string()));
        assert_eq!(SpinTarget::All.list_types().len(), 4);
    }
}
