use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of query intents a repository asks its factory for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryName {
    DefaultGet,
    DefaultPage,
    DefaultCount,
    UpdateOne,
    DeleteOne,
    DeleteMany,
}

impl QueryName {
    pub const ALL: [QueryName; 6] = [
        QueryName::DefaultGet,
        QueryName::DefaultPage,
        QueryName::DefaultCount,
        QueryName::UpdateOne,
        QueryName::DeleteOne,
        QueryName::DeleteMany,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QueryName::DefaultGet => "DEFAULT_GET",
            QueryName::DefaultPage => "DEFAULT_PAGE",
            QueryName::DefaultCount => "DEFAULT_COUNT",
            QueryName::UpdateOne => "UPDATE_ONE",
            QueryName::DeleteOne => "DELETE_ONE",
            QueryName::DeleteMany => "DELETE_MANY",
        }
    }

    /// Read intents fall back to the catch-all read filter when unmapped.
    pub fn is_read(self) -> bool {
        matches!(
            self,
            QueryName::DefaultGet | QueryName::DefaultPage | QueryName::DefaultCount
        )
    }
}

impl fmt::Display for QueryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown query name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown query name: {0}")]
pub struct UnknownQueryName(pub String);

impl FromStr for QueryName {
    type Err = UnknownQueryName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownQueryName(s.to_string()))
    }
}
