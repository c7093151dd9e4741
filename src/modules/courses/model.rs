use devcamper_core::AppError;
use devcamper_core::query::{FieldDef, FieldKind};
use devcamper_db::PgPool;
use devcamper_models::Course;
use serde_json::Value;

use crate::modules::bootcamps::service::BootcampService;
use crate::query::Resource;

pub const COURSE_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", "id", FieldKind::Uuid),
    FieldDef::new("title", "title", FieldKind::Text),
    FieldDef::new("description", "description", FieldKind::Text),
    FieldDef::new("weeks", "weeks", FieldKind::Integer),
    FieldDef::new("tuition", "tuition", FieldKind::Number),
    FieldDef::new("minimumSkill", "minimum_skill::text", FieldKind::Text),
    FieldDef::new("scholarshipAvailable", "scholarship_available", FieldKind::Boolean),
    FieldDef::new("createdAt", "created_at", FieldKind::Timestamp),
    FieldDef::new("bootcamp", "bootcamp_id", FieldKind::Uuid),
    FieldDef::new("user", "user_id", FieldKind::Uuid),
];

/// Courses, optionally scoped to `/bootcamps/{bootcampId}/courses`.
pub struct CourseResource;

impl Resource for CourseResource {
    const TABLE: &'static str = "courses";
    const FIELDS: &'static [FieldDef] = COURSE_FIELDS;
    const SCOPE: Option<(&'static str, &'static str)> = Some(("bootcampId", "bootcamp_id"));
    const EMBEDDED: &'static [&'static str] = &["bootcamp"];

    type Row = Course;

    async fn populate(db: &PgPool, rows: Vec<Course>) -> Result<Vec<Value>, AppError> {
        BootcampService::embed_summaries(db, &rows, |course| course.bootcamp_id).await
    }
}
