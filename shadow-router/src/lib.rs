pub mod cli;
pub mod logger;
pub mod router;

pub use router::{RouteContext, RouteMapper, RouteResult, Router};
