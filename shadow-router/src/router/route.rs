//! Route result.

use std::fmt::Display;

/// Logical name resolved to a physical data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteMapper {
    logical: String,
    physical: String,
}

impl RouteMapper {
    /// Create new mapper.
    pub fn new(logical: impl ToString, physical: impl ToString) -> Self {
        Self {
            logical: logical.to_string(),
            physical: physical.to_string(),
        }
    }

    /// Data source addressed by its own name.
    pub fn identity(name: impl ToString) -> Self {
        let name = name.to_string();
        Self {
            logical: name.clone(),
            physical: name,
        }
    }

    /// Name used by the query author.
    pub fn logical(&self) -> &str {
        &self.logical
    }

    /// Data source the query executes on.
    pub fn physical(&self) -> &str {
        &self.physical
    }

    /// Same logical name, different data source.
    pub fn with_physical(&self, physical: impl ToString) -> Self {
        Self {
            logical: self.logical.clone(),
            physical: physical.to_string(),
        }
    }
}

impl Display for RouteMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.logical, self.physical)
    }
}

impl<L: ToString, P: ToString> From<(L, P)> for RouteMapper {
    fn from((logical, physical): (L, P)) -> Self {
        Self::new(logical, physical)
    }
}

/// Data sources a statement is routed to, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteResult {
    mappers: Vec<RouteMapper>,
}

impl RouteResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteMapper> {
        self.mappers.iter()
    }

    pub fn push(&mut self, mapper: RouteMapper) {
        self.mappers.push(mapper);
    }

    pub fn contains(&self, mapper: &RouteMapper) -> bool {
        self.mappers.contains(mapper)
    }

    pub fn mappers(&self) -> &[RouteMapper] {
        &self.mappers
    }
}

impl Display for RouteResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}]",
            self.mappers
                .iter()
                .map(|mapper| mapper.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl FromIterator<RouteMapper> for RouteResult {
    fn from_iter<T: IntoIterator<Item = RouteMapper>>(iter: T) -> Self {
        Self {
            mappers: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<RouteMapper>> for RouteResult {
    fn from(mappers: Vec<RouteMapper>) -> Self {
        Self { mappers }
    }
}

impl IntoIterator for RouteResult {
    type Item = RouteMapper;
    type IntoIter = std::vec::IntoIter<RouteMapper>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappers.into_iter()
    }
}

impl<'a> IntoIterator for &'a RouteResult {
    type Item = &'a RouteMapper;
    type IntoIter = std::slice::Iter<'a, RouteMapper>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappers.iter()
    }
}
