//! Parser error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    PgQuery(#[from] pg_query::Error),

    #[error("empty query")]
    EmptyQuery,

    #[error("missing parameter: ${0}")]
    MissingParameter(i32),

    #[error("rows disagree on the value of shadow column \"{0}\"")]
    ConflictingShadowValues(String),
}
