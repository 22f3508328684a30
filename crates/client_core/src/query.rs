//! Filter and sort state, and its serialization into the backend's query grammar.
//!
//! Filters serialize to a flat map of `field` / `field[op]` keys; sort fields
//! serialize to one `sortBy` parameter each, with `-field` for descending.

use std::{collections::BTreeMap, fmt, str::FromStr};

use shared::domain::{Color, Country};
use thiserror::Error;

use crate::forms::parse_number;

pub const SORT_PARAM: &str = "sortBy";

/// Flat map of query keys to values.
pub type QueryMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    #[error("unknown filter field '{0}'")]
    UnknownField(String),
    #[error("unknown sort field '{0}'")]
    UnknownSortField(String),
    #[error("filter expression '{0}' has no comparison operator")]
    MissingOperator(String),
    #[error("filter expression '{0}' has no value")]
    MissingValue(String),
    #[error("filter expression '{0}' does not compare against a number")]
    InvalidValue(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    #[default]
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
}

impl Operator {
    pub const NUMERIC: &'static [Operator] = &[
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Like => "like",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "≠",
            Operator::Gt => ">",
            Operator::Gte => "≥",
            Operator::Lt => "<",
            Operator::Lte => "≤",
            Operator::Like => "~",
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "eq" | "=" | "==" => Ok(Operator::Eq),
            "ne" | "!=" | "≠" => Ok(Operator::Ne),
            "gt" | ">" => Ok(Operator::Gt),
            "gte" | ">=" | "≥" => Ok(Operator::Gte),
            "lt" | "<" => Ok(Operator::Lt),
            "lte" | "<=" | "≤" => Ok(Operator::Lte),
            "like" | "~" => Ok(Operator::Like),
            _ => Err(QueryError::UnknownOperator(raw.to_string())),
        }
    }
}

/// Query key for a criterion: the bare field for `eq`, `field[op]` otherwise.
pub fn criterion_key(field: &str, operator: Operator) -> String {
    match operator {
        Operator::Eq => field.to_string(),
        other => format!("{field}[{}]", other.as_str()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    CoordinatesX,
    CoordinatesY,
    Height,
    Weight,
}

impl NumericField {
    pub const ALL: &'static [NumericField] = &[
        NumericField::CoordinatesX,
        NumericField::CoordinatesY,
        NumericField::Height,
        NumericField::Weight,
    ];

    pub fn path(self) -> &'static str {
        match self {
            NumericField::CoordinatesX => "coordinates.x",
            NumericField::CoordinatesY => "coordinates.y",
            NumericField::Height => "height",
            NumericField::Weight => "weight",
        }
    }
}

impl FromStr for NumericField {
    type Err = QueryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "coordinates.x" | "x" => Ok(NumericField::CoordinatesX),
            "coordinates.y" | "y" => Ok(NumericField::CoordinatesY),
            "height" => Ok(NumericField::Height),
            "weight" => Ok(NumericField::Weight),
            other => Err(QueryError::UnknownField(other.to_string())),
        }
    }
}

/// Operator and raw value of one numeric filter row. An empty value is inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericFilter {
    pub operator: Operator,
    pub value: String,
}

impl NumericFilter {
    pub fn new(operator: Operator, value: impl Into<String>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

/// A parsed `field<op>value` expression such as `height>=170`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericCondition {
    pub field: NumericField,
    pub filter: NumericFilter,
}

impl FromStr for NumericCondition {
    type Err = QueryError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        // Earliest match wins; ties go to the longer symbol so `>=` is not read as `>`.
        const SYMBOLS: &[&str] = &[">=", "<=", "!=", "==", "≥", "≤", "≠", ">", "<", "="];

        let (at, symbol) = SYMBOLS
            .iter()
            .filter_map(|symbol| expr.find(symbol).map(|at| (at, *symbol)))
            .min_by_key(|(at, symbol)| (*at, usize::MAX - symbol.len()))
            .ok_or_else(|| QueryError::MissingOperator(expr.to_string()))?;

        let field = expr[..at].parse::<NumericField>()?;
        let value = expr[at + symbol.len()..].trim();
        if value.is_empty() {
            return Err(QueryError::MissingValue(expr.to_string()));
        }
        if parse_number(value).is_none() {
            return Err(QueryError::InvalidValue(expr.to_string()));
        }
        Ok(Self {
            field,
            filter: NumericFilter::new(symbol.parse()?, value),
        })
    }
}

/// Local filter selections, mirroring the advanced filter panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub name_search: String,
    pub coordinates_x: NumericFilter,
    pub coordinates_y: NumericFilter,
    pub height: NumericFilter,
    pub weight: NumericFilter,
    pub hair_color: Option<Color>,
    pub eye_color: Option<Color>,
    pub nationality: Option<Country>,
    pub location_name: String,
}

impl FilterState {
    pub fn numeric(&self, field: NumericField) -> &NumericFilter {
        match field {
            NumericField::CoordinatesX => &self.coordinates_x,
            NumericField::CoordinatesY => &self.coordinates_y,
            NumericField::Height => &self.height,
            NumericField::Weight => &self.weight,
        }
    }

    pub fn numeric_mut(&mut self, field: NumericField) -> &mut NumericFilter {
        match field {
            NumericField::CoordinatesX => &mut self.coordinates_x,
            NumericField::CoordinatesY => &mut self.coordinates_y,
            NumericField::Height => &mut self.height,
            NumericField::Weight => &mut self.weight,
        }
    }

    pub fn set_condition(&mut self, condition: NumericCondition) {
        *self.numeric_mut(condition.field) = condition.filter;
    }

    pub fn to_query(&self) -> QueryMap {
        let mut query = QueryMap::new();

        let name = self.name_search.trim();
        if !name.is_empty() {
            query.insert(criterion_key("name", Operator::Like), name.to_string());
        }

        for field in NumericField::ALL {
            let filter = self.numeric(*field);
            if filter.is_active() {
                query.insert(
                    criterion_key(field.path(), filter.operator),
                    filter.value.trim().to_string(),
                );
            }
        }

        if let Some(color) = self.hair_color {
            query.insert("hairColor".into(), color.as_str().into());
        }
        if let Some(color) = self.eye_color {
            query.insert("eyeColor".into(), color.as_str().into());
        }
        if let Some(country) = self.nationality {
            query.insert("nationality".into(), country.as_str().into());
        }

        let location_name = self.location_name.trim();
        if !location_name.is_empty() {
            query.insert(
                criterion_key("location.name", Operator::Like),
                location_name.to_string(),
            );
        }

        query
    }

    /// Active criteria other than the name search.
    pub fn active_filter_count(&self) -> usize {
        let name_key = criterion_key("name", Operator::Like);
        self.to_query().keys().filter(|key| **key != name_key).count()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Name,
    CoordinatesX,
    CoordinatesY,
    CreationDate,
    Height,
    Weight,
    HairColor,
    EyeColor,
    Nationality,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::CoordinatesX => "coordinates.x",
            SortField::CoordinatesY => "coordinates.y",
            SortField::CreationDate => "creationDate",
            SortField::Height => "height",
            SortField::Weight => "weight",
            SortField::HairColor => "hairColor",
            SortField::EyeColor => "eyeColor",
            SortField::Nationality => "nationality",
        }
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "id" => Ok(SortField::Id),
            "name" => Ok(SortField::Name),
            "coordinates.x" => Ok(SortField::CoordinatesX),
            "coordinates.y" => Ok(SortField::CoordinatesY),
            "creationDate" | "creation_date" | "date" => Ok(SortField::CreationDate),
            "height" => Ok(SortField::Height),
            "weight" => Ok(SortField::Weight),
            "hairColor" | "hair_color" => Ok(SortField::HairColor),
            "eyeColor" | "eye_color" => Ok(SortField::EyeColor),
            "nationality" => Ok(SortField::Nationality),
            other => Err(QueryError::UnknownSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => f.write_str(self.field.as_str()),
            SortDirection::Descending => write!(f, "-{}", self.field.as_str()),
        }
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let (direction, field) = match raw.strip_prefix('-') {
            Some(field) => (SortDirection::Descending, field),
            None => (SortDirection::Ascending, raw),
        };
        Ok(Self {
            field: field.parse()?,
            direction,
        })
    }
}

/// Ordered multi-field sort list. Each field appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Builds a spec from keys; a repeated field keeps its first position and
    /// its last direction.
    pub fn from_keys(keys: impl IntoIterator<Item = SortKey>) -> Self {
        let mut spec = Self::default();
        for key in keys {
            match spec.position(key.field) {
                Some(at) => spec.keys[at].direction = key.direction,
                None => spec.keys.push(key),
            }
        }
        spec
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn direction(&self, field: SortField) -> Option<SortDirection> {
        self.position(field).map(|at| self.keys[at].direction)
    }

    /// unsorted → ascending → descending → unsorted.
    pub fn toggle(&mut self, field: SortField) -> Option<SortDirection> {
        match self.position(field) {
            None => {
                self.keys.push(SortKey {
                    field,
                    direction: SortDirection::Ascending,
                });
                Some(SortDirection::Ascending)
            }
            Some(at) if self.keys[at].direction == SortDirection::Ascending => {
                self.keys[at].direction = SortDirection::Descending;
                Some(SortDirection::Descending)
            }
            Some(at) => {
                self.keys.remove(at);
                None
            }
        }
    }

    pub fn remove(&mut self, field: SortField) -> bool {
        match self.position(field) {
            Some(at) => {
                self.keys.remove(at);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn params(&self) -> Vec<(String, String)> {
        self.keys
            .iter()
            .map(|key| (SORT_PARAM.to_string(), key.to_string()))
            .collect()
    }

    pub fn joined(&self) -> String {
        self.keys
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn position(&self, field: SortField) -> Option<usize> {
        self.keys.iter().position(|key| key.field == field)
    }
}

/// Everything needed for one `GET /persons` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    pub filters: QueryMap,
    pub sort: SortSpec,
}

impl ListQuery {
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ];
        params.extend(
            self.filters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        params.extend(self.sort.params());
        params
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
