//! Query-string translation for list endpoints.
//!
//! List endpoints accept a small query language:
//!
//! ```text
//! GET /api/v1/bootcamps?averageCost[gte]=1000&careers[in]=Business,UI/UX
//!                      &select=name,description&sort=-averageCost,name
//!                      &page=2&limit=5
//! ```
//!
//! - `select`, `sort`, `page` and `limit` are reserved; every other
//!   parameter is a filter term.
//! - A filter is `field=value` (equality) or `field[op]=value` where `op`
//!   is one of `gt`, `gte`, `lt`, `lte`, `in`. `in` takes a comma list.
//! - `sort` is a comma list; a leading `-` sorts descending. Without it the
//!   newest records come first.
//! - `page` is 1-indexed (default 1); `limit` defaults to 25 and is clamped
//!   to 1..=100.
//!
//! Parsing happens in two steps. [`QuerySpec::parse`] splits the raw pairs
//! without knowing anything about the resource. [`QuerySpec::resolve`] then
//! checks every field and operator against the resource's [`FieldDef`]
//! allow-list and converts values to typed [`FilterValue`]s, so nothing
//! from the query string is ever spliced into SQL.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 25;
pub const MAX_LIMIT: i64 = 100;

/// Highest page whose offset still fits an `i64` at any limit.
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT - 1;

const RESERVED: [&str; 4] = ["select", "sort", "page", "limit"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid query parameter `{0}`")]
    MalformedKey(String),
    #[error("Unknown query operator `{0}`")]
    UnknownOperator(String),
    #[error("Field `{0}` cannot be used to filter")]
    UnknownFilterField(String),
    #[error("Field `{0}` cannot be used to sort")]
    UnknownSortField(String),
    #[error("Field `{0}` cannot be selected")]
    UnknownSelectField(String),
    #[error("Operator `{op}` is not supported for field `{field}`")]
    UnsupportedOperator { field: String, op: Operator },
    #[error("Invalid value `{value}` for field `{field}`")]
    InvalidValue { field: String, value: String },
    #[error("`{name}` must be a whole number, got `{value}`")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl Operator {
    fn parse(raw: &str) -> Result<Self, QueryError> {
        match raw {
            "eq" => Ok(Self::Eq),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            "in" => Ok(Self::In),
            other => Err(QueryError::UnknownOperator(other.to_string())),
        }
    }

    /// SQL comparison for scalar operators. `In` is rendered by the caller.
    pub fn sql(self) -> &'static str {
        match self {
            Self::Eq | Self::In => " = ",
            Self::Gt => " > ",
            Self::Gte => " >= ",
            Self::Lt => " < ",
            Self::Lte => " <= ",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Eq => "eq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::In => "in",
        };
        f.write_str(name)
    }
}

/// Storage type of a queryable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Integer,
    Boolean,
    Timestamp,
    Uuid,
    /// A `TEXT[]` column; equality means "contains".
    TextArray,
}

impl FieldKind {
    fn supports(self, op: Operator) -> bool {
        match self {
            Self::Boolean | Self::Uuid | Self::TextArray => {
                matches!(op, Operator::Eq | Operator::In)
            }
            _ => true,
        }
    }
}

/// One entry of a resource's query allow-list.
///
/// `name` is the public (JSON) name, `column` the SQL expression it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
    pub filterable: bool,
    pub sortable: bool,
}

impl FieldDef {
    pub const fn new(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column,
            kind,
            filterable: true,
            sortable: true,
        }
    }

    /// A field that may appear in `select` but not in filters or `sort`.
    pub const fn select_only(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column,
            kind,
            filterable: false,
            sortable: false,
        }
    }

    /// Top-level JSON key this field lives under (`location.city` -> `location`).
    pub fn json_key(&self) -> &'static str {
        self.name.split('.').next().unwrap_or(self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    TextList(Vec<String>),
    NumberList(Vec<f64>),
    IntegerList(Vec<i64>),
    BooleanList(Vec<bool>),
    TimestampList(Vec<DateTime<Utc>>),
    UuidList(Vec<Uuid>),
}

/// A raw filter term as it appeared in the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTerm {
    pub field: String,
    pub op: Operator,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Resource-agnostic parse of a list query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub filters: Vec<FilterTerm>,
    pub select: Option<Vec<String>>,
    pub sort: Vec<SortKey>,
    pub page: i64,
    pub limit: i64,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            select: None,
            sort: Vec::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl QuerySpec {
    /// Splits query pairs into reserved parameters and filter terms.
    ///
    /// When a reserved parameter repeats, the last occurrence wins.
    pub fn parse<I, K, V>(params: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut spec = QuerySpec::default();

        for (key, value) in params {
            let key = key.as_ref().trim();
            let value = value.as_ref().trim();

            if RESERVED.contains(&key) {
                match key {
                    "select" => spec.select = Some(split_list(value)),
                    "sort" => spec.sort = parse_sort(value),
                    "page" => spec.page = parse_whole("page", value)?.clamp(1, MAX_PAGE),
                    "limit" => spec.limit = parse_whole("limit", value)?.clamp(1, MAX_LIMIT),
                    _ => unreachable!("reserved parameter list is exhaustive"),
                }
                continue;
            }

            let (field, op) = split_key(key)?;
            spec.filters.push(FilterTerm {
                field: field.to_string(),
                op,
                value: value.to_string(),
            });
        }

        Ok(spec)
    }

    pub fn skip(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Validates the parsed query against a resource allow-list.
    pub fn resolve(&self, fields: &'static [FieldDef]) -> Result<ResolvedQuery, QueryError> {
        let lookup = |name: &str| fields.iter().find(|def| def.name == name);

        let mut predicates = Vec::with_capacity(self.filters.len());
        for term in &self.filters {
            let def = lookup(&term.field)
                .filter(|def| def.filterable)
                .ok_or_else(|| QueryError::UnknownFilterField(term.field.clone()))?;

            if !def.kind.supports(term.op) {
                return Err(QueryError::UnsupportedOperator {
                    field: term.field.clone(),
                    op: term.op,
                });
            }

            predicates.push(Predicate {
                column: def.column,
                kind: def.kind,
                op: term.op,
                value: convert_value(def, term.op, &term.value)?,
            });
        }

        let mut order = Vec::with_capacity(self.sort.len() + 1);
        for key in &self.sort {
            let def = lookup(&key.field)
                .filter(|def| def.sortable)
                .ok_or_else(|| QueryError::UnknownSortField(key.field.clone()))?;
            order.push(OrderBy {
                column: def.column,
                direction: key.direction,
            });
        }
        if order.is_empty() {
            order.push(OrderBy {
                column: "created_at",
                direction: SortDirection::Desc,
            });
        }
        if !order.iter().any(|o| o.column == "id") {
            order.push(OrderBy {
                column: "id",
                direction: SortDirection::Asc,
            });
        }

        let select = match &self.select {
            None => None,
            Some(names) => {
                let mut keys: Vec<&'static str> = Vec::with_capacity(names.len());
                for name in names {
                    let def = lookup(name)
                        .ok_or_else(|| QueryError::UnknownSelectField(name.clone()))?;
                    if !keys.contains(&def.json_key()) {
                        keys.push(def.json_key());
                    }
                }
                Some(keys)
            }
        };

        Ok(ResolvedQuery {
            predicates,
            order,
            select,
            page: self.page,
            limit: self.limit,
        })
    }
}

/// A validated, typed filter ready to be bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub kind: FieldKind,
    pub op: Operator,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    pub predicates: Vec<Predicate>,
    pub order: Vec<OrderBy>,
    /// JSON keys to keep in each returned object; `None` keeps everything.
    pub select: Option<Vec<&'static str>>,
    pub page: i64,
    pub limit: i64,
}

impl ResolvedQuery {
    pub fn skip(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn links(&self, total: i64) -> PaginationLinks {
        PaginationLinks::new(self.page, self.limit, total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageLink {
    pub page: i64,
    pub limit: i64,
}

/// `pagination` object of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl PaginationLinks {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let start_index = page.saturating_sub(1).saturating_mul(limit);
        let end_index = page.saturating_mul(limit);

        Self {
            next: (end_index < total).then_some(PageLink {
                page: page + 1,
                limit,
            }),
            prev: (start_index > 0).then_some(PageLink {
                page: page - 1,
                limit,
            }),
        }
    }
}

fn split_key(key: &str) -> Result<(&str, Operator), QueryError> {
    match key.find('[') {
        None if key.is_empty() => Err(QueryError::MalformedKey(key.to_string())),
        None => Ok((key, Operator::Eq)),
        Some(open) => {
            let field = &key[..open];
            let op = key[open + 1..]
                .strip_suffix(']')
                .ok_or_else(|| QueryError::MalformedKey(key.to_string()))?;
            if field.is_empty() || op.is_empty() {
                return Err(QueryError::MalformedKey(key.to_string()));
            }
            Ok((field, Operator::parse(op)?))
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_sort(raw: &str) -> Vec<SortKey> {
    split_list(raw)
        .into_iter()
        .map(|part| match part.strip_prefix('-') {
            Some(field) => SortKey {
                field: field.to_string(),
                direction: SortDirection::Desc,
            },
            None => SortKey {
                field: part.trim_start_matches('+').to_string(),
                direction: SortDirection::Asc,
            },
        })
        .collect()
}

fn parse_whole(name: &'static str, raw: &str) -> Result<i64, QueryError> {
    raw.parse::<i64>().map_err(|_| QueryError::InvalidNumber {
        name,
        value: raw.to_string(),
    })
}

fn convert_value(def: &FieldDef, op: Operator, raw: &str) -> Result<FilterValue, QueryError> {
    let invalid = || QueryError::InvalidValue {
        field: def.name.to_string(),
        value: raw.to_string(),
    };

    if op == Operator::In {
        let items = split_list(raw);
        if items.is_empty() {
            return Err(invalid());
        }
        let parse_all = |parse: fn(&str) -> Option<FilterValue>| -> Result<Vec<FilterValue>, QueryError> {
            items.iter().map(|item| parse(item).ok_or_else(invalid)).collect()
        };

        return Ok(match def.kind {
            FieldKind::Text | FieldKind::TextArray => FilterValue::TextList(items.clone()),
            FieldKind::Number => FilterValue::NumberList(
                parse_all(parse_number)?.into_iter().filter_map(as_number).collect(),
            ),
            FieldKind::Integer => FilterValue::IntegerList(
                parse_all(parse_integer)?.into_iter().filter_map(as_integer).collect(),
            ),
            FieldKind::Boolean => FilterValue::BooleanList(
                parse_all(parse_boolean)?.into_iter().filter_map(as_boolean).collect(),
            ),
            FieldKind::Timestamp => FilterValue::TimestampList(
                parse_all(parse_timestamp)?.into_iter().filter_map(as_timestamp).collect(),
            ),
            FieldKind::Uuid => FilterValue::UuidList(
                parse_all(parse_uuid)?.into_iter().filter_map(as_uuid).collect(),
            ),
        });
    }

    let parsed = match def.kind {
        FieldKind::Text | FieldKind::TextArray => Some(FilterValue::Text(raw.to_string())),
        FieldKind::Number => parse_number(raw),
        FieldKind::Integer => parse_integer(raw),
        FieldKind::Boolean => parse_boolean(raw),
        FieldKind::Timestamp => parse_timestamp(raw),
        FieldKind::Uuid => parse_uuid(raw),
    };
    parsed.ok_or_else(invalid)
}

fn parse_number(raw: &str) -> Option<FilterValue> {
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(FilterValue::Number)
}

fn parse_integer(raw: &str) -> Option<FilterValue> {
    raw.parse::<i64>().ok().map(FilterValue::Integer)
}

fn parse_boolean(raw: &str) -> Option<FilterValue> {
    match raw {
        "true" => Some(FilterValue::Boolean(true)),
        "false" => Some(FilterValue::Boolean(false)),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<FilterValue> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(FilterValue::Timestamp(ts.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| FilterValue::Timestamp(dt.and_utc()))
}

fn parse_uuid(raw: &str) -> Option<FilterValue> {
    Uuid::parse_str(raw).ok().map(FilterValue::Uuid)
}

fn as_number(value: FilterValue) -> Option<f64> {
    match value {
        FilterValue::Number(n) => Some(n),
        _ => None,
    }
}

fn as_integer(value: FilterValue) -> Option<i64> {
    match value {
        FilterValue::Integer(n) => Some(n),
        _ => None,
    }
}

fn as_boolean(value: FilterValue) -> Option<bool> {
    match value {
        FilterValue::Boolean(b) => Some(b),
        _ => None,
    }
}

fn as_timestamp(value: FilterValue) -> Option<DateTime<Utc>> {
    match value {
        FilterValue::Timestamp(ts) => Some(ts),
        _ => None,
    }
}

fn as_uuid(value: FilterValue) -> Option<Uuid> {
    match value {
        FilterValue::Uuid(id) => Some(id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FIELDS: &[FieldDef] = &[
        FieldDef::new("name", "name", FieldKind::Text),
        FieldDef::new("averageCost", "average_cost", FieldKind::Number),
        FieldDef::new("weeks", "weeks", FieldKind::Integer),
        FieldDef::new("housing", "housing", FieldKind::Boolean),
        FieldDef::new("careers", "careers", FieldKind::TextArray),
        FieldDef::new("createdAt", "created_at", FieldKind::Timestamp),
        FieldDef::new("user", "user_id", FieldKind::Uuid),
        FieldDef::new("location.state", "location_state", FieldKind::Text),
        FieldDef::select_only("description", "description", FieldKind::Text),
    ];

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let spec = QuerySpec::parse(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(spec.page, 1);
        assert_eq!(spec.limit, 25);
        assert_eq!(spec.skip(), 0);

        let resolved = spec.resolve(FIELDS).unwrap();
        assert_eq!(
            resolved.order,
            vec![
                OrderBy {
                    column: "created_at",
                    direction: SortDirection::Desc
                },
                OrderBy {
                    column: "id",
                    direction: SortDirection::Asc
                },
            ]
        );
        assert!(resolved.select.is_none());
    }

    #[test]
    fn test_cost_filter_sort_and_second_page() {
        let spec = QuerySpec::parse(pairs(&[
            ("averageCost[gte]", "1000"),
            ("sort", "-name"),
            ("page", "2"),
            ("limit", "5"),
        ]))
        .unwrap();
        let resolved = spec.resolve(FIELDS).unwrap();

        assert_eq!(
            resolved.predicates,
            vec![Predicate {
                column: "average_cost",
                kind: FieldKind::Number,
                op: Operator::Gte,
                value: FilterValue::Number(1000.0),
            }]
        );
        assert_eq!(
            resolved.order[0],
            OrderBy {
                column: "name",
                direction: SortDirection::Desc
            }
        );
        assert_eq!(resolved.skip(), 5);
        assert_eq!(resolved.limit, 5);

        let links = resolved.links(7);
        assert_eq!(links.prev, Some(PageLink { page: 1, limit: 5 }));
        assert_eq!(links.next, None);
    }

    #[test]
    fn test_links_on_first_and_middle_pages() {
        let first = PaginationLinks::new(1, 10, 25);
        assert_eq!(first.prev, None);
        assert_eq!(first.next, Some(PageLink { page: 2, limit: 10 }));

        let middle = PaginationLinks::new(2, 10, 25);
        assert_eq!(middle.prev, Some(PageLink { page: 1, limit: 10 }));
        assert_eq!(middle.next, Some(PageLink { page: 3, limit: 10 }));

        let exact = PaginationLinks::new(1, 10, 10);
        assert_eq!(exact, PaginationLinks::default());
    }

    #[test]
    fn test_links_serialize_without_missing_sides() {
        let json = serde_json::to_value(PaginationLinks::new(1, 25, 30)).unwrap();
        assert_eq!(json, serde_json::json!({ "next": { "page": 2, "limit": 25 } }));
    }

    #[test]
    fn test_limit_is_clamped_and_page_floor_is_one() {
        let spec = QuerySpec::parse(pairs(&[("limit", "500"), ("page", "0")])).unwrap();
        assert_eq!(spec.limit, MAX_LIMIT);
        assert_eq!(spec.page, 1);

        let spec = QuerySpec::parse(pairs(&[("limit", "0")])).unwrap();
        assert_eq!(spec.limit, 1);
    }

    #[test]
    fn test_huge_page_is_capped_without_overflow() {
        let spec =
            QuerySpec::parse(pairs(&[("page", "9223372036854775807"), ("limit", "100")])).unwrap();
        assert_eq!(spec.page, MAX_PAGE);

        let resolved = spec.resolve(FIELDS).unwrap();
        assert!(resolved.skip() > 0);

        let links = resolved.links(10);
        assert!(links.next.is_none());
        assert_eq!(links.prev.map(|link| link.page), Some(MAX_PAGE - 1));
    }

    #[test]
    fn test_non_numeric_page_is_rejected() {
        let err = QuerySpec::parse(pairs(&[("page", "two")])).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidNumber {
                name: "page",
                value: "two".to_string()
            }
        );
    }

    #[test]
    fn test_multi_key_sort() {
        let spec = QuerySpec::parse(pairs(&[("sort", "name,-averageCost")])).unwrap();
        assert_eq!(
            spec.sort,
            vec![
                SortKey {
                    field: "name".to_string(),
                    direction: SortDirection::Asc
                },
                SortKey {
                    field: "averageCost".to_string(),
                    direction: SortDirection::Desc
                },
            ]
        );
        let resolved = spec.resolve(FIELDS).unwrap();
        assert_eq!(resolved.order.len(), 3);
        assert_eq!(resolved.order[1].column, "average_cost");
    }

    #[test]
    fn test_select_keeps_order_and_collapses_nested_fields() {
        let spec = QuerySpec::parse(pairs(&[(
            "select",
            "name,description,location.state,name",
        )]))
        .unwrap();
        let resolved = spec.resolve(FIELDS).unwrap();
        assert_eq!(
            resolved.select,
            Some(vec!["name", "description", "location"])
        );
    }

    #[test]
    fn test_in_operator_builds_typed_list() {
        let spec = QuerySpec::parse(pairs(&[
            ("careers[in]", "Business, UI/UX"),
            ("weeks[in]", "4,8"),
        ]))
        .unwrap();
        let resolved = spec.resolve(FIELDS).unwrap();
        assert_eq!(
            resolved.predicates[0].value,
            FilterValue::TextList(vec!["Business".to_string(), "UI/UX".to_string()])
        );
        assert_eq!(
            resolved.predicates[1].value,
            FilterValue::IntegerList(vec![4, 8])
        );
    }

    #[test]
    fn test_equality_values_are_typed() {
        let spec = QuerySpec::parse(pairs(&[
            ("housing", "true"),
            ("createdAt[lt]", "2024-01-31"),
            ("location.state", "MA"),
        ]))
        .unwrap();
        let resolved = spec.resolve(FIELDS).unwrap();
        assert_eq!(resolved.predicates[0].value, FilterValue::Boolean(true));
        assert!(matches!(
            resolved.predicates[1].value,
            FilterValue::Timestamp(_)
        ));
        assert_eq!(resolved.predicates[2].column, "location_state");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let spec = QuerySpec::parse(pairs(&[("password", "x")])).unwrap();
        assert_eq!(
            spec.resolve(FIELDS).unwrap_err(),
            QueryError::UnknownFilterField("password".to_string())
        );

        let spec = QuerySpec::parse(pairs(&[("description", "x")])).unwrap();
        assert!(matches!(
            spec.resolve(FIELDS),
            Err(QueryError::UnknownFilterField(_))
        ));

        let spec = QuerySpec::parse(pairs(&[("sort", "password")])).unwrap();
        assert!(matches!(
            spec.resolve(FIELDS),
            Err(QueryError::UnknownSortField(_))
        ));

        let spec = QuerySpec::parse(pairs(&[("select", "name,password")])).unwrap();
        assert!(matches!(
            spec.resolve(FIELDS),
            Err(QueryError::UnknownSelectField(_))
        ));
    }

    #[test]
    fn test_bad_operators_and_values() {
        assert_eq!(
            QuerySpec::parse(pairs(&[("averageCost[ne]", "1")])).unwrap_err(),
            QueryError::UnknownOperator("ne".to_string())
        );
        assert!(matches!(
            QuerySpec::parse(pairs(&[("averageCost[gte", "1")])),
            Err(QueryError::MalformedKey(_))
        ));

        let spec = QuerySpec::parse(pairs(&[("housing[gt]", "true")])).unwrap();
        assert!(matches!(
            spec.resolve(FIELDS),
            Err(QueryError::UnsupportedOperator { .. })
        ));

        let spec = QuerySpec::parse(pairs(&[("averageCost[gte]", "cheap")])).unwrap();
        assert_eq!(
            spec.resolve(FIELDS).unwrap_err(),
            QueryError::InvalidValue {
                field: "averageCost".to_string(),
                value: "cheap".to_string()
            }
        );

        let spec = QuerySpec::parse(pairs(&[("user", "not-a-uuid")])).unwrap();
        assert!(matches!(
            spec.resolve(FIELDS),
            Err(QueryError::InvalidValue { .. })
        ));
    }
}
