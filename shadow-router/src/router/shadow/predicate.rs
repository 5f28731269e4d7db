//! Shadow traffic classification.

use crate::router::{
    context::RouteContext,
    parser::{Error, Parameter, Statement},
};

/// Decides whether a data-manipulation statement is shadow traffic.
pub trait ShadowPredicate: std::fmt::Debug + Send + Sync {
    /// Statement with literal values only.
    fn is_shadow(&self, statement: &Statement) -> Result<bool, Error>;

    /// Statement executed with bound parameters.
    fn is_shadow_with_parameters(
        &self,
        statement: &Statement,
        parameters: &[Parameter],
    ) -> Result<bool, Error>;
}

/// Classify the statement in the context, picking the entry point by
/// whether parameters are bound. An empty parameter list still counts
/// as bound.
pub fn is_shadow_traffic(
    context: &RouteContext,
    predicate: &dyn ShadowPredicate,
) -> Result<bool, Error> {
    match context.parameters() {
        Some(parameters) => predicate.is_shadow_with_parameters(context.statement(), parameters),
        None => predicate.is_shadow(context.statement()),
    }
}
