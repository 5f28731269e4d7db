use std::sync::Arc;

use shadow_router_config as config;

use super::{column::ColumnPredicate, mapping::Mapping, predicate::ShadowPredicate};
use crate::router::Error;

/// Shadow routing rule for one logical database.
#[derive(Debug, Clone)]
pub struct ShadowRule {
    mapping: Mapping,
    predicate: Arc<dyn ShadowPredicate>,
}

impl ShadowRule {
    pub fn new(mapping: Mapping, predicate: impl ShadowPredicate + 'static) -> Self {
        Self {
            mapping,
            predicate: Arc::new(predicate),
        }
    }

    /// Build the rule from configuration, classifying traffic
    /// by the configured column. `mappings` are the shadow mappings
    /// of the rule's database, see [`config::Config::shadow_mappings`].
    pub fn from_config(
        rule: &config::ShadowRule,
        mappings: &[config::ShadowMapping],
    ) -> Result<Self, Error> {
        let mapping = Mapping::new(
            mappings
                .iter()
                .map(|mapping| (mapping.source_db.clone(), mapping.shadow_db.clone())),
        )?;

        if mapping.is_empty() {
            return Err(Error::EmptyShadowMapping(rule.database.clone()));
        }

        Ok(Self::new(mapping, ColumnPredicate::new(&rule.column)))
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn predicate(&self) -> &dyn ShadowPredicate {
        self.predicate.as_ref()
    }
}
