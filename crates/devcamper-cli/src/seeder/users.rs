//! Fake accounts.

use std::time::Instant;

use devcamper_models::users::gravatar_url;
use devcamper_models::{Role, UserId};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use sqlx::{Postgres, QueryBuilder, Transaction};

use super::SEED_EMAIL_DOMAIN;
use super::models::UserSeed;

/// Rows per multi-value INSERT.
const BATCH_SIZE: usize = 1000;

pub fn generate_users(count: usize, role: Role, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let id = UserId::new();
            let tag = id.into_inner().simple().to_string();

            UserSeed {
                id,
                name: format!("{} {}", first_name, last_name),
                email: format!(
                    "{}.{}+{}{}-{}@{}",
                    first_name.to_lowercase(),
                    last_name.to_lowercase(),
                    role,
                    idx,
                    &tag[..8],
                    SEED_EMAIL_DOMAIN
                ),
                role,
                password_hash: password_hash.to_string(),
            }
        })
        .collect()
}

pub async fn insert_users(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let mut inserted = 0;

    for chunk in users.chunks(BATCH_SIZE) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO users (id, name, email, role, avatar, password_hash) ");
        builder.push_values(chunk, |mut row, user| {
            row.push_bind(user.id)
                .push_bind(user.name.clone())
                .push_bind(user.email.clone())
                .push_bind(user.role)
                .push_bind(gravatar_url(&user.email))
                .push_bind(user.password_hash.clone());
        });
        inserted += builder.build().execute(&mut **tx).await?.rows_affected();
    }

    println!("   ✓ Inserted {} users in {:?}", inserted, start_time.elapsed());
    Ok(inserted)
}
