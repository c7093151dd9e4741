use devcamper_core::AppError;
use devcamper_db::PgPool;
use devcamper_models::{BootcampId, CreateReviewDto, Review, ReviewId, UpdateReviewDto, User};
use serde_json::Value;
use sqlx::PgConnection;
use tracing::{debug, info, instrument};

use crate::modules::bootcamps::service::BootcampService;
use crate::utils::ownership::ensure_owner_or_admin;

pub struct ReviewService;

impl ReviewService {
    fn not_found(id: ReviewId) -> AppError {
        AppError::not_found(format!("No review found with the id of {}", id))
    }

    pub async fn find_by_id(db: &PgPool, id: ReviewId) -> Result<Review, AppError> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    #[instrument(skip(db))]
    pub async fn get_review(db: &PgPool, id: ReviewId) -> Result<Value, AppError> {
        let review = Self::find_by_id(db, id).await?;
        let mut embedded =
            BootcampService::embed_summaries(db, std::slice::from_ref(&review), |r| r.bootcamp_id)
                .await?;
        embedded.pop().ok_or_else(|| Self::not_found(id))
    }

    /// Recomputes a bootcamp's mean rating from its current reviews.
    pub async fn refresh_average_rating(
        conn: &mut PgConnection,
        bootcamp_id: BootcampId,
    ) -> Result<(), AppError> {
        let rating: Option<f64> = sqlx::query_scalar(
            "UPDATE bootcamps
             SET average_rating = (SELECT AVG(rating)::DOUBLE PRECISION FROM reviews WHERE bootcamp_id = $1)
             WHERE id = $1
             RETURNING average_rating",
        )
        .bind(bootcamp_id)
        .fetch_optional(&mut *conn)
        .await?
        .flatten();

        debug!(bootcamp.id = %bootcamp_id, average_rating = ?rating, "Average rating refreshed");
        Ok(())
    }

    /// One review per user and bootcamp; a second attempt is a conflict.
    #[instrument(skip(db, user, dto), fields(user.id = %user.id))]
    pub async fn create_review(
        db: &PgPool,
        bootcamp_id: BootcampId,
        user: &User,
        dto: CreateReviewDto,
    ) -> Result<Review, AppError> {
        let mut tx = db.begin().await?;

        BootcampService::lock(&mut tx, bootcamp_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No bootcamp with the id of {}", bootcamp_id))
            })?;

        let review = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (id, title, text, rating, bootcamp_id, user_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(ReviewId::new())
        .bind(dto.title.trim())
        .bind(&dto.text)
        .bind(dto.rating)
        .bind(bootcamp_id)
        .bind(user.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if devcamper_core::errors::unique_violation(&e).is_some() {
                return AppError::conflict("You have already reviewed this bootcamp");
            }
            AppError::from(e)
        })?;

        Self::refresh_average_rating(&mut tx, bootcamp_id).await?;
        tx.commit().await?;

        info!(review.id = %review.id, bootcamp.id = %bootcamp_id, "Review created");
        Ok(review)
    }

    #[instrument(skip(db, user, dto), fields(user.id = %user.id))]
    pub async fn update_review(
        db: &PgPool,
        id: ReviewId,
        user: &User,
        dto: UpdateReviewDto,
    ) -> Result<Review, AppError> {
        let existing = Self::find_by_id(db, id).await?;
        ensure_owner_or_admin(existing.user_id, user, &format!("update review {}", id))?;

        let mut tx = db.begin().await?;
        BootcampService::lock(&mut tx, existing.bootcamp_id).await?;

        let review = sqlx::query_as::<_, Review>(
            "UPDATE reviews SET
                title = COALESCE($2, title),
                text = COALESCE($3, text),
                rating = COALESCE($4, rating)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(dto.text)
        .bind(dto.rating)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Self::not_found(id))?;

        Self::refresh_average_rating(&mut tx, review.bootcamp_id).await?;
        tx.commit().await?;

        info!(review.id = %review.id, "Review updated");
        Ok(review)
    }

    #[instrument(skip(db, user), fields(user.id = %user.id))]
    pub async fn delete_review(db: &PgPool, id: ReviewId, user: &User) -> Result<(), AppError> {
        let existing = Self::find_by_id(db, id).await?;
        ensure_owner_or_admin(existing.user_id, user, &format!("delete review {}", id))?;

        let mut tx = db.begin().await?;
        BootcampService::lock(&mut tx, existing.bootcamp_id).await?;

        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::refresh_average_rating(&mut tx, existing.bootcamp_id).await?;
        tx.commit().await?;

        info!(review.id = %id, "Review deleted");
        Ok(())
    }
}
