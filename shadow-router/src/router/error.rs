//! Router error.

use thiserror::Error;

use super::{decorator::RuleType, parser};

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Parser(#[from] parser::Error),

    #[error("data source \"{0}\" has no shadow mapping")]
    NoShadowMapping(String),

    #[error("shadow mapping has an empty data source name")]
    EmptyDataSourceName,

    #[error("data source \"{0}\" is mapped to more than one shadow data source")]
    DuplicateSource(String),

    #[error("shadow data source \"{0}\" is mapped from more than one data source")]
    DuplicateShadow(String),

    #[error("data source \"{0}\" is both a production and a shadow data source")]
    SourceIsShadow(String),

    #[error("{0} decorator can't apply a {1} rule")]
    RuleMismatch(RuleType, RuleType),

    #[error("database \"{0}\" has a shadow rule but no shadow mappings")]
    EmptyShadowMapping(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
