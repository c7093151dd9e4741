//! Development data: publishers with one bootcamp each, reviewers, courses
//! and reviews. Seeded accounts live under [`SEED_EMAIL_DOMAIN`] so they can
//! be cleared without touching real data.

use std::time::Instant;

use devcamper_models::Role;
use sqlx::PgPool;

pub mod bootcamps;
pub mod models;
pub mod users;

pub use models::SeedConfig;

pub const SEED_EMAIL_DOMAIN: &str = "example.com";

/// Every seeded account shares this password.
pub const SEED_PASSWORD: &str = "123456";

/// Low bcrypt cost; seed accounts are throwaway.
const SEED_BCRYPT_COST: u32 = 4;

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "🌱 Seeding {} publishers, {} users, {} courses and {} reviews per bootcamp...",
        config.publishers,
        config.users,
        config.courses_per_bootcamp,
        config.effective_reviews()
    );

    let password_hash = bcrypt::hash(SEED_PASSWORD, SEED_BCRYPT_COST)?;

    let publishers = users::generate_users(config.publishers, Role::Publisher, &password_hash);
    let reviewers = users::generate_users(config.users, Role::User, &password_hash);
    let (bootcamps, courses, reviews) =
        bootcamps::generate_catalog(&publishers, &reviewers, &config);

    let mut tx = db.begin().await?;
    users::insert_users(&mut tx, &publishers).await?;
    users::insert_users(&mut tx, &reviewers).await?;
    bootcamps::insert_bootcamps(&mut tx, &bootcamps).await?;
    bootcamps::insert_courses(&mut tx, &courses).await?;
    bootcamps::insert_reviews(&mut tx, &reviews).await?;
    tx.commit().await?;

    println!("\n✅ Seeding finished in {:?}", start_time.elapsed());
    println!(
        "   Log in as any seeded account with password \"{}\"",
        SEED_PASSWORD
    );
    Ok(())
}

/// Removes seeded accounts along with their bootcamps, courses and reviews.
/// Admin accounts are kept.
pub async fn clear_all(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let pattern = format!("%@{}", SEED_EMAIL_DOMAIN);
    let mut tx = db.begin().await?;

    let seeded_users = "SELECT id FROM users WHERE email LIKE $1 AND role <> 'admin'";
    let seeded_bootcamps = format!("SELECT id FROM bootcamps WHERE user_id IN ({})", seeded_users);

    let reviews = sqlx::query(&format!(
        "DELETE FROM reviews WHERE user_id IN ({}) OR bootcamp_id IN ({})",
        seeded_users, seeded_bootcamps
    ))
    .bind(&pattern)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let courses = sqlx::query(&format!(
        "DELETE FROM courses WHERE user_id IN ({}) OR bootcamp_id IN ({})",
        seeded_users, seeded_bootcamps
    ))
    .bind(&pattern)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let bootcamps = sqlx::query(&format!(
        "DELETE FROM bootcamps WHERE user_id IN ({})",
        seeded_users
    ))
    .bind(&pattern)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let users = sqlx::query("DELETE FROM users WHERE email LIKE $1 AND role <> 'admin'")
        .bind(&pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} users, {} bootcamps, {} courses, {} reviews in {:?}",
        users,
        bootcamps,
        courses,
        reviews,
        start_time.elapsed()
    );
    Ok(users)
}
