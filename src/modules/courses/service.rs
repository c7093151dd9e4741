use std::collections::HashMap;

use devcamper_core::AppError;
use devcamper_db::PgPool;
use devcamper_models::courses::average_cost;
use devcamper_models::{BootcampId, Course, CourseId, CreateCourseDto, UpdateCourseDto, User};
use serde_json::Value;
use sqlx::PgConnection;
use tracing::{debug, info, instrument};

use crate::modules::bootcamps::service::BootcampService;
use crate::utils::ownership::ensure_owner_or_admin;

pub struct CourseService;

impl CourseService {
    fn not_found(id: CourseId) -> AppError {
        AppError::not_found(format!("No course with the id of {}", id))
    }

    pub async fn find_by_id(db: &PgPool, id: CourseId) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// The course with its bootcamp's `{ id, name, description }` embedded.
    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, id: CourseId) -> Result<Value, AppError> {
        let course = Self::find_by_id(db, id).await?;
        let mut embedded =
            BootcampService::embed_summaries(db, std::slice::from_ref(&course), |c| c.bootcamp_id)
                .await?;
        embedded.pop().ok_or_else(|| Self::not_found(id))
    }

    /// Courses of each bootcamp, oldest first.
    pub async fn find_by_bootcamps(
        db: &PgPool,
        bootcamp_ids: &[BootcampId],
    ) -> Result<HashMap<BootcampId, Vec<Course>>, AppError> {
        let ids: Vec<uuid::Uuid> = bootcamp_ids.iter().map(|id| id.into_inner()).collect();

        let courses = sqlx::query_as::<_, Course>(
            "SELECT * FROM courses WHERE bootcamp_id = ANY($1) ORDER BY created_at, id",
        )
        .bind(ids)
        .fetch_all(db)
        .await?;

        let mut grouped: HashMap<BootcampId, Vec<Course>> = HashMap::new();
        for course in courses {
            grouped.entry(course.bootcamp_id).or_default().push(course);
        }
        Ok(grouped)
    }

    /// Recomputes a bootcamp's average tuition from its current courses.
    pub async fn refresh_average_cost(
        conn: &mut PgConnection,
        bootcamp_id: BootcampId,
    ) -> Result<(), AppError> {
        let tuitions: Vec<f64> =
            sqlx::query_scalar("SELECT tuition FROM courses WHERE bootcamp_id = $1")
                .bind(bootcamp_id)
                .fetch_all(&mut *conn)
                .await?;

        let cost = average_cost(&tuitions);

        sqlx::query("UPDATE bootcamps SET average_cost = $2 WHERE id = $1")
            .bind(bootcamp_id)
            .bind(cost)
            .execute(&mut *conn)
            .await?;

        debug!(bootcamp.id = %bootcamp_id, average_cost = ?cost, "Average cost refreshed");
        Ok(())
    }

    #[instrument(skip(db, user, dto), fields(user.id = %user.id))]
    pub async fn create_course(
        db: &PgPool,
        bootcamp_id: BootcampId,
        user: &User,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        let mut tx = db.begin().await?;

        let bootcamp = BootcampService::lock(&mut tx, bootcamp_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No bootcamp with the id of {}", bootcamp_id))
            })?;

        ensure_owner_or_admin(
            bootcamp.user_id,
            user,
            &format!("add a course to bootcamp {}", bootcamp_id),
        )?;

        let course = sqlx::query_as::<_, Course>(
            "INSERT INTO courses
                (id, title, description, weeks, tuition, minimum_skill,
                 scholarship_available, bootcamp_id, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(CourseId::new())
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.weeks)
        .bind(dto.tuition)
        .bind(dto.minimum_skill)
        .bind(dto.scholarship_available)
        .bind(bootcamp_id)
        .bind(user.id)
        .fetch_one(&mut *tx)
        .await?;

        Self::refresh_average_cost(&mut tx, bootcamp_id).await?;
        tx.commit().await?;

        info!(course.id = %course.id, bootcamp.id = %bootcamp_id, "Course created");
        Ok(course)
    }

    #[instrument(skip(db, user, dto), fields(user.id = %user.id))]
    pub async fn update_course(
        db: &PgPool,
        id: CourseId,
        user: &User,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let existing = Self::find_by_id(db, id).await?;
        ensure_owner_or_admin(
            existing.user_id,
            user,
            &format!("update course {}", id),
        )?;

        let mut tx = db.begin().await?;
        BootcampService::lock(&mut tx, existing.bootcamp_id).await?;

        let course = sqlx::query_as::<_, Course>(
            "UPDATE courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                weeks = COALESCE($4, weeks),
                tuition = COALESCE($5, tuition),
                minimum_skill = COALESCE($6, minimum_skill),
                scholarship_available = COALESCE($7, scholarship_available)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(dto.description)
        .bind(dto.weeks)
        .bind(dto.tuition)
        .bind(dto.minimum_skill)
        .bind(dto.scholarship_available)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Self::not_found(id))?;

        Self::refresh_average_cost(&mut tx, course.bootcamp_id).await?;
        tx.commit().await?;

        info!(course.id = %course.id, "Course updated");
        Ok(course)
    }

    #[instrument(skip(db, user), fields(user.id = %user.id))]
    pub async fn delete_course(db: &PgPool, id: CourseId, user: &User) -> Result<(), AppError> {
        let existing = Self::find_by_id(db, id).await?;
        ensure_owner_or_admin(
            existing.user_id,
            user,
            &format!("delete course {}", id),
        )?;

        let mut tx = db.begin().await?;
        BootcampService::lock(&mut tx, existing.bootcamp_id).await?;

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::refresh_average_cost(&mut tx, existing.bootcamp_id).await?;
        tx.commit().await?;

        info!(course.id = %id, "Course deleted");
        Ok(())
    }
}
