use serde::{Deserialize, Serialize};

/// The signed-in user whose lists the app reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Database auth token forwarded on REST reads
    #[serde(default, skip_serializing)]
    pub id_token: Option<String>,
}

impl UserSession {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            id_token: None,
        }
    }

    /// Checks a uid can be used as one store key.
    ///
    /// Store keys may not contain `.`, `$`, `#`, `[`, `]` or `/`; `?` and control characters
    /// would change the request itself.
    pub fn validate_uid(uid: &str) -> Result<(), String> {
        if uid.is_empty() {
            return Err("uid must not be empty".to_string());
        }
        match uid
            .chars()
            .find(|c| matches!(c, '.' | '$' | '#' | '[' | ']' | '/' | '?') || c.is_control())
        {
            Some(c) => Err(format!("uid contains a forbidden character: {:?}", c)),
            None => Ok(()),
        }
    }

    /// Name shown in the header
    pub fn greeting_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("You")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uid() {
        assert!(UserSession::validate_uid("kZ3xYq9Lr2").is_ok());
        assert!(UserSession::validate_uid("").is_err());
        for uid in ["..", "a/b", "a.b", "x?y", "a#b", "a[0]", "$key", "tab\tuid"] {
            assert!(UserSession::validate_uid(uid).is_err(), "{uid:?} should be rejected");
        }
    }

    #[test]
    fn test_greeting_falls_back_to_you() {
        assert_eq!(UserSession::new("u").greeting_name(), "You");
    }
}
