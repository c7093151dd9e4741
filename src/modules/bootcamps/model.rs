use devcamper_core::AppError;
use devcamper_core::query::{FieldDef, FieldKind};
use devcamper_db::PgPool;
use devcamper_models::{Bootcamp, BootcampWithCourses};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::modules::courses::service::CourseService;
use crate::query::{Resource, to_json};

pub const BOOTCAMP_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", "id", FieldKind::Uuid),
    FieldDef::new("name", "name", FieldKind::Text),
    FieldDef::new("slug", "slug", FieldKind::Text),
    FieldDef::new("description", "description", FieldKind::Text),
    FieldDef::new("careers", "careers", FieldKind::TextArray),
    FieldDef::new("averageRating", "average_rating", FieldKind::Number),
    FieldDef::new("averageCost", "average_cost", FieldKind::Number),
    FieldDef::new("housing", "housing", FieldKind::Boolean),
    FieldDef::new("jobAssistance", "job_assistance", FieldKind::Boolean),
    FieldDef::new("jobGuarantee", "job_guarantee", FieldKind::Boolean),
    FieldDef::new("acceptGi", "accept_gi", FieldKind::Boolean),
    FieldDef::new("createdAt", "created_at", FieldKind::Timestamp),
    FieldDef::new("user", "user_id", FieldKind::Uuid),
    FieldDef::new("location.city", "location_city", FieldKind::Text),
    FieldDef::new("location.state", "location_state", FieldKind::Text),
    FieldDef::new("location.zipcode", "location_zipcode", FieldKind::Text),
    FieldDef::select_only("location", "location_formatted_address", FieldKind::Text),
    FieldDef::select_only("website", "website", FieldKind::Text),
    FieldDef::select_only("phone", "phone", FieldKind::Text),
    FieldDef::select_only("email", "email", FieldKind::Text),
    FieldDef::select_only("photo", "photo", FieldKind::Text),
];

/// Bootcamps with their courses embedded.
pub struct BootcampResource;

impl Resource for BootcampResource {
    const TABLE: &'static str = "bootcamps";
    const FIELDS: &'static [FieldDef] = BOOTCAMP_FIELDS;
    const EMBEDDED: &'static [&'static str] = &["courses"];

    type Row = Bootcamp;

    async fn populate(db: &PgPool, rows: Vec<Bootcamp>) -> Result<Vec<Value>, AppError> {
        let ids: Vec<_> = rows.iter().map(|bootcamp| bootcamp.id).collect();
        let mut courses = CourseService::find_by_bootcamps(db, &ids).await?;

        rows.into_iter()
            .map(|bootcamp| {
                let courses = courses.remove(&bootcamp.id).unwrap_or_default();
                to_json(&BootcampWithCourses { bootcamp, courses })
            })
            .collect()
    }
}

/// `{ success, count, data }` of the radius search. Unpaginated.
#[derive(Debug, Serialize, ToSchema)]
pub struct RadiusResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Bootcamp>,
}

impl RadiusResponse {
    pub fn new(data: Vec<Bootcamp>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// A photo as it arrived in the multipart body.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image"))
    }
}
