use super::{
    parser::{Parameter, Statement},
    route::RouteResult,
};

/// State threaded through the decorator chain.
///
/// Decorators take it by value and return the context the next
/// stage should use.
#[derive(Debug, Clone)]
pub struct RouteContext {
    /// Parsed statement.
    statement: Statement,
    /// Bound parameters. `None` for statements with literal values.
    parameters: Option<Vec<Parameter>>,
    /// Data sources resolved so far.
    route_result: RouteResult,
}

impl RouteContext {
    /// Context for a statement without bound parameters.
    pub fn new(statement: Statement) -> Self {
        Self {
            statement,
            parameters: None,
            route_result: RouteResult::default(),
        }
    }

    /// Context for a statement executed with bound parameters.
    pub fn prepared(statement: Statement, parameters: Vec<Parameter>) -> Self {
        Self {
            statement,
            parameters: Some(parameters),
            route_result: RouteResult::default(),
        }
    }

    /// Start from data sources resolved by an earlier stage.
    pub fn with_route_result(mut self, route_result: RouteResult) -> Self {
        self.route_result = route_result;
        self
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn parameters(&self) -> Option<&[Parameter]> {
        self.parameters.as_deref()
    }

    pub fn route_result(&self) -> &RouteResult {
        &self.route_result
    }

    pub fn set_route_result(&mut self, route_result: RouteResult) {
        self.route_result = route_result;
    }

    pub fn into_route_result(self) -> RouteResult {
        self.route_result
    }
}
