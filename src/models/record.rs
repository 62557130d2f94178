use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::ListType;

/// One entry of a user's list as stored in the realtime database
///
/// Only the fields the app understands are typed; everything else is kept in `extra`
/// so a record survives a read/write cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Only a JSON boolean counts; any other value is ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched: Option<Value>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub series_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_order: Option<Value>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Value>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Either an array of names or a comma separated string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<Value>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_watched(mut self, watched: bool) -> Self {
        self.watched = Some(Value::Bool(watched));
        self
    }

    pub fn in_series(mut self, name: impl Into<String>, order: impl Into<Value>) -> Self {
        self.series_name = Some(name.into());
        self.series_order = Some(order.into());
        self
    }

    /// Title shown on the spinner and result card
    pub fn display_title(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => "(no title)",
        }
    }

    /// Case-insensitive sort key for the title
    pub fn title_key(&self) -> String {
        self.title.as_deref().unwrap_or("").trim().to_lowercase()
    }

    /// Trimmed, lower-cased status text
    pub fn normalized_status(&self) -> String {
        self.status.as_deref().unwrap_or("").trim().to_lowercase()
    }

    pub fn explicit_watched(&self) -> Option<bool> {
        self.watched.as_ref().and_then(Value::as_bool)
    }

    /// Grouping key for series members, `None` for standalone entries
    pub fn series_key(&self) -> Option<String> {
        let name = self.series_name.as_deref()?.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_lowercase())
        }
    }

    pub fn series_position(&self) -> f64 {
        parse_series_order(self.series_order.as_ref())
    }

    /// Parsed release year, if any
    pub fn year_number(&self) -> Option<i64> {
        match self.year.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Actor names, whatever shape the store kept them in
    pub fn actor_names(&self) -> Vec<String> {
        match &self.actors {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(joined)) => joined
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Reads an optional field, treating a value of the wrong JSON type as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Parses a series position. Missing or unparseable values sort last.
pub fn parse_series_order(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(order) if order.is_finite() => order,
        _ => f64::INFINITY,
    }
}

/// All records of one list keyed by store id
pub type ListSnapshot = BTreeMap<String, Record>;

/// A record that made it into the wheel's pool for one spin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    #[serde(rename = "__id")]
    pub id: String,
    #[serde(rename = "__listType")]
    pub list_type: ListType,
    #[serde(flatten)]
    pub record: Record,
}

impl Candidate {
    pub fn new(list_type: ListType, id: impl Into<String>, record: Record) -> Self {
        Self {
            id: id.into(),
            list_type,
            record,
        }
    }

    pub fn title(&self) -> &str {
        self.record.display_title()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_series_order() {
        assert_eq!(parse_series_order(Some(&json!(2))), 2.0);
        assert_eq!(parse_series_order(Some(&json!(" 1.5 "))), 1.5);
        assert_eq!(parse_series_order(Some(&json!("part two"))), f64::INFINITY);
        assert_eq!(parse_series_order(Some(&json!(""))), f64::INFINITY);
        assert_eq!(parse_series_order(Some(&json!("-inf"))), f64::INFINITY);
        assert_eq!(parse_series_order(Some(&json!("Infinity"))), f64::INFINITY);
        assert_eq!(parse_series_order(Some(&json!("NaN"))), f64::INFINITY);
        assert_eq!(parse_series_order(Some(&json!(null))), f64::INFINITY);
        assert_eq!(parse_series_order(None), f64::INFINITY);
    }

    #[test]
    fn test_record_keeps_unknown_fields() {
        let raw = json!({
            "title": "Dune",
            "status": "Planned",
            "seriesName": "Dune",
            "seriesOrder": "1",
            "imdbId": "tt1160419"
        });
        let record: Record = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.series_key(), Some("dune".to_string()));
        assert_eq!(record.series_position(), 1.0);
        assert_eq!(record.extra.get("imdbId"), Some(&json!("tt1160419")));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_non_boolean_watched_is_ignored() {
        let record: Record = serde_json::from_value(json!({ "watched": "yes" })).unwrap();
        assert_eq!(record.explicit_watched(), None);
        assert_eq!(Record::default().with_watched(true).explicit_watched(), Some(true));
    }

    #[test]
    fn test_actor_names_accepts_both_shapes() {
        let listed: Record =
            serde_json::from_value(json!({ "actors": ["Keanu Reeves", "Carrie-Anne Moss"] }))
                .unwrap();
        let joined: Record =
            serde_json::from_value(json!({ "actors": "Keanu Reeves, Carrie-Anne Moss" })).unwrap();
        assert_eq!(listed.actor_names(), joined.actor_names());
    }

    #[test]
    fn test_mistyped_display_fields_are_dropped_not_the_record() {
        let record: Record = serde_json::from_value(json!({
            "title": "Ronin",
            "director": ["John Frankenheimer"],
            "notes": 5,
            "createdAt": 1700000000000.5_f64
        }))
        .unwrap();
        assert_eq!(record.display_title(), "Ronin");
        assert_eq!(record.director, None);
        assert_eq!(record.notes, None);
        assert_eq!(record.created_at, None);

        let untitled: Record = serde_json::from_value(json!({ "title": 42 })).unwrap();
        assert_eq!(untitled.display_title(), "(no title)");
    }

    #[test]
    fn test_display_title_fallback() {
        assert_eq!(Record::default().display_title(), "(no title)");
        assert_eq!(Record::titled("  ").display_title(), "(no title)");
        assert_eq!(Record::titled("Heat").display_title(), "Heat");
    }

    #[test]
    fn test_candidate_serializes_store_tags() {
        let candidate = Candidate::new(ListType::Anime, "-Nabc", Record::titled("Mushishi"));
        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["__id"], "-Nabc");
        assert_eq!(value["__listType"], "anime");
        assert_eq!(value["title"], "Mushishi");
    }
}
