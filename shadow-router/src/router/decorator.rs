//! Route decorators and the chain that runs them.

use std::{fmt::Display, sync::Arc};

use shadow_router_config::RuleKind;
use tracing::debug;

use super::{context::RouteContext, shadow::ShadowRule, Error};

/// Rule type tag used to pick decorators for a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    Sharding,
    ReadWriteSplit,
    Encrypt,
    Shadow,
}

impl Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sharding => write!(f, "sharding"),
            Self::ReadWriteSplit => write!(f, "read_write_split"),
            Self::Encrypt => write!(f, "encrypt"),
            Self::Shadow => write!(f, "shadow"),
        }
    }
}

impl From<RuleKind> for RuleType {
    fn from(kind: RuleKind) -> Self {
        match kind {
            RuleKind::Sharding => Self::Sharding,
            RuleKind::ReadWriteSplit => Self::ReadWriteSplit,
            RuleKind::Encrypt => Self::Encrypt,
        }
    }
}

/// Rule configured for a database.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Shadow data source routing.
    Shadow(Arc<ShadowRule>),
    /// Rule evaluated by a decorator outside this crate. Only the tag
    /// is known here.
    External(RuleType),
}

impl Rule {
    pub fn rule_type(&self) -> RuleType {
        match self {
            Self::Shadow(_) => RuleType::Shadow,
            Self::External(rule_type) => *rule_type,
        }
    }
}

/// A routing stage refining the route result of earlier stages.
pub trait RouteDecorator: std::fmt::Debug + Send + Sync {
    /// Lower runs earlier.
    fn priority(&self) -> i32;

    /// Run this decorator for databases configured with this rule type.
    fn applies_to(&self, rule_type: RuleType) -> bool;

    /// Refine the route. Callers must continue with the returned context.
    fn decorate(&self, context: RouteContext, rule: &Rule) -> Result<RouteContext, Error>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

/// Decorators ordered by ascending priority.
#[derive(Debug, Default)]
pub struct DecoratorChain {
    decorators: Vec<Box<dyn RouteDecorator>>,
}

impl DecoratorChain {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decorator. Decorators with equal priority run in the
    /// order they were added.
    pub fn with(mut self, decorator: impl RouteDecorator + 'static) -> Self {
        self.push(Box::new(decorator));
        self
    }

    pub fn push(&mut self, decorator: Box<dyn RouteDecorator>) {
        self.decorators.push(decorator);
        // Stable sort.
        self.decorators.sort_by_key(|decorator| decorator.priority());
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    /// Run every decorator matching one of the rules, in priority order.
    pub fn decorate(&self, mut context: RouteContext, rules: &[Rule]) -> Result<RouteContext, Error> {
        for decorator in &self.decorators {
            for rule in rules {
                if !decorator.applies_to(rule.rule_type()) {
                    continue;
                }

                debug!(
                    "running {} decorator [priority: {}]",
                    decorator.name(),
                    decorator.priority()
                );

                context = decorator.decorate(context, rule)?;
            }
        }

        Ok(context)
    }
}
