use devcamper_core::AppError;
use devcamper_core::query::{FieldDef, FieldKind};
use devcamper_db::PgPool;
use devcamper_models::Review;
use serde_json::Value;

use crate::modules::bootcamps::service::BootcampService;
use crate::query::Resource;

pub const REVIEW_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", "id", FieldKind::Uuid),
    FieldDef::new("title", "title", FieldKind::Text),
    FieldDef::new("text", "text", FieldKind::Text),
    FieldDef::new("rating", "rating", FieldKind::Integer),
    FieldDef::new("createdAt", "created_at", FieldKind::Timestamp),
    FieldDef::new("bootcamp", "bootcamp_id", FieldKind::Uuid),
    FieldDef::new("user", "user_id", FieldKind::Uuid),
];

/// Reviews, optionally scoped to `/bootcamps/{bootcampId}/reviews`.
pub struct ReviewResource;

impl Resource for ReviewResource {
    const TABLE: &'static str = "reviews";
    const FIELDS: &'static [FieldDef] = REVIEW_FIELDS;
    const SCOPE: Option<(&'static str, &'static str)> = Some(("bootcampId", "bootcamp_id"));
    const EMBEDDED: &'static [&'static str] = &["bootcamp"];

    type Row = Review;

    async fn populate(db: &PgPool, rows: Vec<Review>) -> Result<Vec<Value>, AppError> {
        BootcampService::embed_summaries(db, &rows, |review| review.bootcamp_id).await
    }
}
