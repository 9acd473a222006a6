//! Filter, sort, pagination and search parameters of list queries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Equality / `IN` filters keyed by property path.
pub type Criteria = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// Case-insensitive parse; anything but `ASC` / `DESC` is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Ordered `(property, direction)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderBy(Vec<(String, Direction)>);

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the direction of `column`; an existing column keeps its position.
    pub fn set(&mut self, column: impl Into<String>, direction: Direction) {
        let column = column.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == column) {
            Some(entry) => entry.1 = direction,
            None => self.0.push((column, direction)),
        }
    }

    pub fn with(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.set(column, direction);
        self
    }

    pub fn get(&self, column: &str) -> Option<Direction> {
        self.0
            .iter()
            .find(|(existing, _)| existing == column)
            .map(|(_, direction)| *direction)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Direction)> {
        self.0.iter().map(|(column, direction)| (column.as_str(), *direction))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Search terms grouped by operand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchTerms {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub and: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub or: Vec<String>,
}

impl SearchTerms {
    pub fn or(terms: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            and: Vec::new(),
            or: terms.into_iter().map(Into::into).collect(),
        }
    }

    pub fn and(terms: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            and: terms.into_iter().map(Into::into).collect(),
            or: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty()
    }
}

/// Everything a list endpoint reads from the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub criteria: Criteria,
    pub order_by: OrderBy,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub search: SearchTerms,
}
