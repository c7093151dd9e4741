//! Executes a resolved list query against Postgres and builds the
//! `{ success, count, pagination, data }` envelope.
//!
//! A list endpoint takes [`AdvancedResults<R>`] as an argument; by the time
//! the handler runs the page has been fetched, populated and projected.

use std::collections::HashSet;
use std::future::Future;
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Query, RawPathParams},
    http::request::Parts,
};
use devcamper_core::AppError;
use devcamper_core::query::{
    FieldDef, FieldKind, FilterValue, Operator, OrderBy, Predicate, QuerySpec, ResolvedQuery,
};
use devcamper_db::PgPool;
use devcamper_models::ListResponse;
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, Postgres, QueryBuilder, postgres::PgRow};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::state::AppState;

/// A table exposed through the list query language.
pub trait Resource: Send + Sync + 'static {
    const TABLE: &'static str;
    /// Public field names and the columns they map to.
    const FIELDS: &'static [FieldDef];
    /// Path parameter that narrows the list, and the column it matches.
    const SCOPE: Option<(&'static str, &'static str)> = None;
    /// Keys added by [`Resource::populate`]; kept regardless of `select`.
    const EMBEDDED: &'static [&'static str] = &[];

    type Row: for<'r> FromRow<'r, PgRow> + Serialize + Send + Unpin;

    /// Turns fetched rows into response objects, embedding related records.
    fn populate(
        db: &PgPool,
        rows: Vec<Self::Row>,
    ) -> impl Future<Output = Result<Vec<Value>, AppError>> + Send;
}

pub fn to_json<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(AppError::unexpected)
}

/// Rows serialized as-is.
pub fn rows_to_json<T: Serialize>(rows: &[T]) -> Result<Vec<Value>, AppError> {
    rows.iter().map(to_json).collect()
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Text(v) => builder.push_bind(v.clone()),
        FilterValue::Number(v) => builder.push_bind(*v),
        FilterValue::Integer(v) => builder.push_bind(*v),
        FilterValue::Boolean(v) => builder.push_bind(*v),
        FilterValue::Timestamp(v) => builder.push_bind(*v),
        FilterValue::Uuid(v) => builder.push_bind(*v),
        FilterValue::TextList(v) => builder.push_bind(v.clone()),
        FilterValue::NumberList(v) => builder.push_bind(v.clone()),
        FilterValue::IntegerList(v) => builder.push_bind(v.clone()),
        FilterValue::BooleanList(v) => builder.push_bind(v.clone()),
        FilterValue::TimestampList(v) => builder.push_bind(v.clone()),
        FilterValue::UuidList(v) => builder.push_bind(v.clone()),
    };
}

fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match (predicate.kind, predicate.op) {
        // `careers=Business`: the array contains the value
        (FieldKind::TextArray, Operator::Eq) => {
            push_value(builder, &predicate.value);
            builder.push(" = ANY(").push(predicate.column).push(")");
        }
        // `careers[in]=Business,Other`: the arrays overlap
        (FieldKind::TextArray, _) => {
            builder.push(predicate.column).push(" && ");
            push_value(builder, &predicate.value);
        }
        (_, Operator::In) => {
            builder.push(predicate.column).push(" = ANY(");
            push_value(builder, &predicate.value);
            builder.push(")");
        }
        (_, op) => {
            builder.push(predicate.column).push(op.sql());
            push_value(builder, &predicate.value);
        }
    }
}

pub fn push_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    predicates: &[Predicate],
    scope: Option<(&'static str, Uuid)>,
) {
    let mut separator = " WHERE ";

    if let Some((column, id)) = scope {
        builder.push(separator).push(column).push(" = ").push_bind(id);
        separator = " AND ";
    }

    for predicate in predicates {
        builder.push(separator);
        push_predicate(builder, predicate);
        separator = " AND ";
    }
}

fn push_order(builder: &mut QueryBuilder<'_, Postgres>, order: &[OrderBy]) {
    let mut separated = builder.separated(", ");
    separated.push_unseparated(" ORDER BY ");
    for key in order {
        separated.push(format!("{} {}", key.column, key.direction.sql()));
    }
}

pub fn page_query<'a>(
    table: &str,
    query: &ResolvedQuery,
    scope: Option<(&'static str, Uuid)>,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT * FROM {}", table));
    push_filters(&mut builder, &query.predicates, scope);
    push_order(&mut builder, &query.order);
    builder
        .push(" LIMIT ")
        .push_bind(query.limit)
        .push(" OFFSET ")
        .push_bind(query.skip());
    builder
}

pub fn count_query<'a>(
    table: &str,
    query: &ResolvedQuery,
    scope: Option<(&'static str, Uuid)>,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", table));
    push_filters(&mut builder, &query.predicates, scope);
    builder
}

/// One page of rows plus the total under the same filters.
#[instrument(skip(db, query), fields(db.table = R::TABLE, page = query.page, limit = query.limit))]
pub async fn fetch_page<R: Resource>(
    db: &PgPool,
    query: &ResolvedQuery,
    scope: Option<(&'static str, Uuid)>,
) -> Result<(Vec<R::Row>, i64), AppError> {
    let total: i64 = count_query(R::TABLE, query, scope)
        .build_query_scalar()
        .fetch_one(db)
        .await?;

    let rows = page_query(R::TABLE, query, scope)
        .build_query_as::<R::Row>()
        .fetch_all(db)
        .await?;

    debug!(total, returned = rows.len(), "Fetched list page");
    Ok((rows, total))
}

/// Keeps `id`, the selected keys and the embedded keys of each object.
pub fn project(items: Vec<Value>, select: Option<&[&str]>, embedded: &[&str]) -> Vec<Value> {
    let Some(select) = select else {
        return items;
    };

    let keep: HashSet<&str> = select
        .iter()
        .chain(embedded)
        .copied()
        .chain(std::iter::once("id"))
        .collect();

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .filter(|(key, _)| keep.contains(key.as_str()))
                    .collect(),
            ),
            other => other,
        })
        .collect()
}

/// A fully executed list query for resource `R`.
#[derive(Debug)]
pub struct AdvancedResults<R> {
    pub response: ListResponse<Value>,
    resource: PhantomData<fn() -> R>,
}

impl<R> AdvancedResults<R> {
    pub fn into_inner(self) -> ListResponse<Value> {
        self.response
    }
}

async fn scope_of<R: Resource>(
    parts: &mut Parts,
    state: &AppState,
) -> Result<Option<(&'static str, Uuid)>, AppError> {
    let Some((param, column)) = R::SCOPE else {
        return Ok(None);
    };

    // Unscoped mounts of the same list have no path parameters at all.
    let Ok(params) = RawPathParams::from_request_parts(parts, state).await else {
        return Ok(None);
    };

    match params.iter().find(|(name, _)| *name == param) {
        Some((_, raw)) => raw
            .parse::<Uuid>()
            .map(|id| Some((column, id)))
            .map_err(|_| AppError::bad_request(format!("Invalid {}: {}", param, raw))),
        None => Ok(None),
    }
}

impl<R: Resource> FromRequestParts<AppState> for AdvancedResults<R> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::bad_request(format!("Invalid query string: {}", e.body_text())))?;

        let resolved = QuerySpec::parse(pairs)?.resolve(R::FIELDS)?;
        let scope = scope_of::<R>(parts, state).await?;

        let (rows, total) = fetch_page::<R>(&state.db, &resolved, scope).await?;
        let data = R::populate(&state.db, rows).await?;
        let data = project(data, resolved.select.as_deref(), R::EMBEDDED);

        Ok(Self {
            response: ListResponse::new(data, resolved.links(total)),
            resource: PhantomData,
        })
    }
}
