//! Query router.
//!
//! Runs the decorator chain over a parsed statement using the rules
//! configured for its logical database.

pub mod cli;
pub mod context;
pub mod decorator;
pub mod error;
pub mod parser;
pub mod route;
pub mod shadow;

use std::{collections::HashMap, sync::Arc};

use shadow_router_config::Config;
use tracing::{debug, info};

pub use context::RouteContext;
pub use decorator::{DecoratorChain, RouteDecorator, Rule, RuleType};
pub use error::Error;
pub use route::{RouteMapper, RouteResult};
pub use shadow::{ShadowRouteDecorator, ShadowRule};

/// Routes statements for every configured logical database.
///
/// Immutable once built and safe to share between threads.
#[derive(Debug)]
pub struct Router {
    chain: DecoratorChain,
    rules: HashMap<String, Vec<Rule>>,
}

impl Router {
    /// Build rules for every database in the configuration.
    ///
    /// Only the shadow decorator is installed. Decorators for the
    /// other rule types are added with [`Router::with_decorator`].
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut rules: HashMap<String, Vec<Rule>> = HashMap::new();

        for (database, kinds) in config.rules() {
            rules
                .entry(database)
                .or_default()
                .extend(kinds.into_iter().map(|kind| Rule::External(kind.into())));
        }

        let mappings = config.shadow_mappings();

        for database in config.logical_databases() {
            if let Some(rule) = config.shadow_rule(&database) {
                let mappings = mappings
                    .get(&database)
                    .map(|mappings| mappings.as_slice())
                    .unwrap_or(&[]);
                let rule = ShadowRule::from_config(rule, mappings)?;
                info!(
                    "shadow routing enabled for \"{}\" [data sources: {}]",
                    database,
                    rule.mapping().len()
                );
                rules
                    .entry(database)
                    .or_default()
                    .push(Rule::Shadow(Arc::new(rule)));
            }
        }

        Ok(Self {
            chain: DecoratorChain::new().with(ShadowRouteDecorator),
            rules,
        })
    }

    /// Add a decorator to the chain.
    pub fn with_decorator(mut self, decorator: impl RouteDecorator + 'static) -> Self {
        self.chain.push(Box::new(decorator));
        self
    }

    /// Rules configured for a database.
    pub fn rules(&self, database: &str) -> &[Rule] {
        self.rules
            .get(database)
            .map(|rules| rules.as_slice())
            .unwrap_or(&[])
    }

    /// Route a statement for a logical database. Databases without
    /// rules get the context back unchanged.
    pub fn route(&self, database: &str, context: RouteContext) -> Result<RouteContext, Error> {
        let rules = self.rules(database);

        if rules.is_empty() {
            debug!("no routing rules for \"{}\"", database);
            return Ok(context);
        }

        self.chain.decorate(context, rules)
    }
}
