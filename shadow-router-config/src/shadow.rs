use serde::{Deserialize, Serialize};

/// Shadow routing enabled for a logical database.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct ShadowRule {
    /// Logical database this rule applies to.
    pub database: String,
    /// Column flagging a row as shadow traffic, e.g.
    /// `INSERT INTO users (id, shadow) VALUES (1, true)`.
    /// Matched case-insensitively, like an unquoted identifier.
    #[serde(default = "ShadowRule::column")]
    pub column: String,
}

impl ShadowRule {
    fn column() -> String {
        "shadow".into()
    }
}

/// Production data source paired with its shadow copy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct ShadowMapping {
    /// Logical database this mapping belongs to.
    pub database: String,
    /// Production data source.
    pub source_db: String,
    /// Shadow data source receiving test traffic.
    pub shadow_db: String,
}
