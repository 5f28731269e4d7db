//! Shadow data source routing.
//!
//! Statements classified as shadow traffic go to the shadow copy of
//! each production data source. Statements that don't touch rows, e.g.
//! schema changes, go to both so the two environments stay in sync.

pub mod column;
pub mod mapping;
pub mod predicate;
pub mod rule;

pub use column::ColumnPredicate;
pub use mapping::{Mapping, Side};
pub use predicate::{is_shadow_traffic, ShadowPredicate};
pub use rule::ShadowRule;

use tracing::{debug, trace};

use super::{
    context::RouteContext,
    decorator::{RouteDecorator, Rule, RuleType},
    route::{RouteMapper, RouteResult},
    Error,
};

/// Runs after sharding, read/write split and encryption decorators,
/// which resolve logical names to production data sources first.
pub const PRIORITY: i32 = 20;

/// Rewrites the route result for databases with a shadow rule.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShadowRouteDecorator;

impl RouteDecorator for ShadowRouteDecorator {
    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn applies_to(&self, rule_type: RuleType) -> bool {
        rule_type == RuleType::Shadow
    }

    fn decorate(&self, context: RouteContext, rule: &Rule) -> Result<RouteContext, Error> {
        match rule {
            Rule::Shadow(rule) => decorate(context, rule),
            rule => Err(Error::RuleMismatch(RuleType::Shadow, rule.rule_type())),
        }
    }

    fn name(&self) -> &str {
        "shadow"
    }
}

/// Route the statement to production and/or shadow data sources.
pub fn decorate(context: RouteContext, rule: &ShadowRule) -> Result<RouteContext, Error> {
    let context = if context.route_result().is_empty() {
        route(context, rule)?
    } else {
        merge(context, rule)?
    };

    debug!(
        "shadow router decision: {} [{}]",
        context.route_result(),
        context.statement().kind()
    );

    Ok(context)
}

/// No earlier stage resolved anything: address every data source
/// by its own name.
fn route(mut context: RouteContext, rule: &ShadowRule) -> Result<RouteContext, Error> {
    let mapping = rule.mapping();

    let route_result: RouteResult = if !context.statement().is_dml() {
        mapping
            .iter()
            .flat_map(|(source, shadow)| {
                [RouteMapper::identity(source), RouteMapper::identity(shadow)]
            })
            .collect()
    } else if is_shadow_traffic(&context, rule.predicate())? {
        mapping.shadows().map(RouteMapper::identity).collect()
    } else {
        mapping.sources().map(RouteMapper::identity).collect()
    };

    context.set_route_result(route_result);

    Ok(context)
}

/// An earlier stage resolved production data sources: pair them with
/// (non-DML) or swap them for (shadow DML) their shadow counterparts.
/// Swapping keeps one entry per input entry.
fn merge(mut context: RouteContext, rule: &ShadowRule) -> Result<RouteContext, Error> {
    let mapping = rule.mapping();

    if !context.statement().is_dml() {
        let mut route_result = context.route_result().clone();

        for mapper in context.route_result() {
            match mapping.side(mapper.physical())? {
                Side::Production { shadow } => {
                    let paired = mapper.with_physical(shadow);
                    if !route_result.contains(&paired) {
                        trace!("{} paired with \"{}\"", mapper, shadow);
                        route_result.push(paired);
                    }
                }
                Side::Shadow => trace!("{} is already a shadow route", mapper),
            }
        }

        context.set_route_result(route_result);
        return Ok(context);
    }

    if !is_shadow_traffic(&context, rule.predicate())? {
        return Ok(context);
    }

    let mut route_result = RouteResult::new();

    for mapper in context.route_result() {
        let replacement = match mapping.side(mapper.physical())? {
            Side::Production { shadow } => mapper.with_physical(shadow),
            Side::Shadow => mapper.clone(),
        };

        trace!("{} replaced with {}", mapper, replacement);
        route_result.push(replacement);
    }

    context.set_route_result(route_result);

    Ok(context)
}
