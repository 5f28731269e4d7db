//! Production to shadow data source pairs.

use indexmap::IndexMap;

use crate::router::Error;

/// Which side of the mapping a data source is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side<'a> {
    /// Production data source, with its shadow counterpart.
    Production { shadow: &'a str },
    /// Already a shadow data source.
    Shadow,
}

/// Pairs of production and shadow data sources, in configuration order.
///
/// Immutable once built. Each name appears at most once across both sides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    /// Production -> shadow.
    shadows: IndexMap<String, String>,
    /// Shadow -> production.
    sources: IndexMap<String, String>,
}

impl Mapping {
    /// Build the mapping from (production, shadow) pairs.
    pub fn new<I, S, T>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut shadows = IndexMap::new();
        let mut sources = IndexMap::new();

        for (source, shadow) in pairs {
            let (source, shadow) = (source.into(), shadow.into());

            if source.is_empty() || shadow.is_empty() {
                return Err(Error::EmptyDataSourceName);
            }

            if shadows.contains_key(&source) {
                return Err(Error::DuplicateSource(source));
            }

            if sources.contains_key(&shadow) {
                return Err(Error::DuplicateShadow(shadow));
            }

            sources.insert(shadow.clone(), source.clone());
            shadows.insert(source, shadow);
        }

        if let Some(name) = shadows.keys().find(|source| sources.contains_key(*source)) {
            return Err(Error::SourceIsShadow(name.clone()));
        }

        Ok(Self { shadows, sources })
    }

    /// (production, shadow) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.shadows
            .iter()
            .map(|(source, shadow)| (source.as_str(), shadow.as_str()))
    }

    /// Production data sources.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.shadows.keys().map(|source| source.as_str())
    }

    /// Shadow data sources.
    pub fn shadows(&self) -> impl Iterator<Item = &str> {
        self.shadows.values().map(|shadow| shadow.as_str())
    }

    /// Shadow counterpart of a production data source.
    pub fn shadow(&self, source: &str) -> Option<&str> {
        self.shadows.get(source).map(|shadow| shadow.as_str())
    }

    /// Data source is the shadow side of a pair.
    pub fn is_shadow(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Find which side a data source is on.
    pub fn side(&self, name: &str) -> Result<Side<'_>, Error> {
        if let Some(shadow) = self.shadow(name) {
            Ok(Side::Production { shadow })
        } else if self.is_shadow(name) {
            Ok(Side::Shadow)
        } else {
            Err(Error::NoShadowMapping(name.to_string()))
        }
    }

    pub fn len(&self) -> usize {
        self.shadows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shadows.is_empty()
    }
}
