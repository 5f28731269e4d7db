use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Routing rule handled by a decorator other than shadow routing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Logical database the rule applies to.
    pub database: String,
    /// Rule type.
    #[serde(rename = "type")]
    pub kind: RuleKind,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Sharding,
    ReadWriteSplit,
    Encrypt,
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sharding => write!(f, "sharding"),
            Self::ReadWriteSplit => write!(f, "read_write_split"),
            Self::Encrypt => write!(f, "encrypt"),
        }
    }
}
