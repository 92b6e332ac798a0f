//! User identity type for inbound events.

use serde::{Deserialize, Serialize};

/// Platform user that originated an event (id, username, names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// First and last name joined by a space; empty when neither is set.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> User {
        User {
            id: 1,
            username: None,
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
        }
    }

    #[test]
    fn test_full_name_joins_first_and_last() {
        assert_eq!(user(Some("Ada"), Some("Lovelace")).full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_full_name_first_only() {
        assert_eq!(user(Some("Alice"), None).full_name(), "Alice");
    }

    #[test]
    fn test_full_name_empty() {
        assert_eq!(user(None, None).full_name(), "");
        assert_eq!(user(Some(""), None).full_name(), "");
    }
}
