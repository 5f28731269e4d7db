//! Statement parsing and classification.

pub mod column;
pub mod error;
pub mod parameter;
pub mod statement;
pub mod value;

pub use column::Column;
pub use error::Error;
pub use parameter::Parameter;
pub use statement::{Statement, StatementKind};
pub use value::Value;
