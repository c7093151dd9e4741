use devcamper_core::AppError;
use devcamper_core::query::{FieldDef, FieldKind};
use devcamper_db::PgPool;
use devcamper_models::User;
use serde_json::Value;

use crate::query::{Resource, rows_to_json};

pub const USER_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", "id", FieldKind::Uuid),
    FieldDef::new("name", "name", FieldKind::Text),
    FieldDef::new("email", "email", FieldKind::Text),
    FieldDef::new("role", "role::text", FieldKind::Text),
    FieldDef::new("createdAt", "created_at", FieldKind::Timestamp),
    FieldDef::select_only("avatar", "avatar", FieldKind::Text),
];

pub struct UserResource;

impl Resource for UserResource {
    const TABLE: &'static str = "users";
    const FIELDS: &'static [FieldDef] = USER_FIELDS;

    type Row = User;

    async fn populate(_db: &PgPool, rows: Vec<User>) -> Result<Vec<Value>, AppError> {
        rows_to_json(&rows)
    }
}
