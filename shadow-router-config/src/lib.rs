// Submodules
pub mod core;
pub mod database;
pub mod error;
pub mod general;
pub mod rules;
pub mod shadow;

pub use core::Config;
pub use database::Database;
pub use error::Error;
pub use general::{General, LogFormat};
pub use rules::{RuleConfig, RuleKind};
pub use shadow::{ShadowMapping, ShadowRule};
