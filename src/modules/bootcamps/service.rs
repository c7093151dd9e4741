use std::collections::HashMap;

use devcamper_core::AppError;
use devcamper_core::errors::unique_violation;
use devcamper_core::file_storage::FileStorage;
use devcamper_db::PgPool;
use devcamper_models::bootcamps::{DEFAULT_PHOTO, career_names, slugify};
use devcamper_models::{
    Bootcamp, BootcampId, BootcampSummary, CreateBootcampDto, Location, UpdateBootcampDto, User,
    UserId,
};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgConnection;
use tracing::{debug, error, info, instrument, warn};

use crate::query::to_json;
use crate::utils::geo::{latitude_band, radius_radians, within_radius};
use crate::utils::geocoder::Geocoder;
use crate::utils::image::{ImageProcessor, output_format};
use crate::utils::ownership::ensure_owner_or_admin;

use super::model::PhotoUpload;

/// Constraint limiting non-admin owners to a single bootcamp.
pub(crate) const ONE_PER_PUBLISHER: &str = "bootcamps_one_per_publisher";

pub struct BootcampService;

impl BootcampService {
    fn not_found(id: BootcampId) -> AppError {
        AppError::not_found(format!("Bootcamp not found with id of {}", id))
    }

    fn already_published(user_id: UserId) -> AppError {
        AppError::conflict(format!(
            "The user with ID {} has already published a bootcamp",
            user_id
        ))
    }

    pub async fn find_by_id(db: &PgPool, id: BootcampId) -> Result<Bootcamp, AppError> {
        sqlx::query_as::<_, Bootcamp>("SELECT * FROM bootcamps WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// The bootcamp, provided `user` may modify it.
    pub async fn find_owned(
        db: &PgPool,
        id: BootcampId,
        user: &User,
        action: &str,
    ) -> Result<Bootcamp, AppError> {
        let bootcamp = Self::find_by_id(db, id).await?;
        ensure_owner_or_admin(bootcamp.user_id, user, action)?;
        Ok(bootcamp)
    }

    /// Row-locks a bootcamp for the rest of the transaction.
    pub async fn lock(
        conn: &mut PgConnection,
        id: BootcampId,
    ) -> Result<Option<Bootcamp>, AppError> {
        let bootcamp =
            sqlx::query_as::<_, Bootcamp>("SELECT * FROM bootcamps WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(bootcamp)
    }

    /// Serializes `rows` and replaces each `bootcamp` id with the bootcamp's
    /// `{ id, name, description }`.
    pub async fn embed_summaries<T, F>(
        db: &PgPool,
        rows: &[T],
        bootcamp_of: F,
    ) -> Result<Vec<Value>, AppError>
    where
        T: Serialize + Sync,
        F: Fn(&T) -> BootcampId + Send,
    {
        let ids: Vec<uuid::Uuid> = rows
            .iter()
            .map(|row| bootcamp_of(row).into_inner())
            .collect();

        let summaries: HashMap<BootcampId, BootcampSummary> =
            sqlx::query_as::<_, BootcampSummary>(
                "SELECT id, name, description FROM bootcamps WHERE id = ANY($1)",
            )
            .bind(ids)
            .fetch_all(db)
            .await?
            .into_iter()
            .map(|summary| (summary.id, summary))
            .collect();

        rows.iter()
            .map(|row| {
                let mut value = to_json(row)?;
                if let (Some(summary), Value::Object(map)) =
                    (summaries.get(&bootcamp_of(row)), &mut value)
                {
                    map.insert("bootcamp".to_string(), to_json(summary)?);
                }
                Ok(value)
            })
            .collect()
    }

    #[instrument(skip(db, geocoder, user, dto), fields(user.id = %user.id))]
    pub async fn create_bootcamp(
        db: &PgPool,
        geocoder: &dyn Geocoder,
        user: &User,
        dto: CreateBootcampDto,
    ) -> Result<Bootcamp, AppError> {
        let owner_is_admin = user.role.is_admin();

        if !owner_is_admin {
            let published: Option<BootcampId> =
                sqlx::query_scalar("SELECT id FROM bootcamps WHERE user_id = $1 LIMIT 1")
                    .bind(user.id)
                    .fetch_optional(db)
                    .await?;
            if published.is_some() {
                return Err(Self::already_published(user.id));
            }
        }

        let location: Location = geocoder.geocode(&dto.address).await?.into();

        let bootcamp = sqlx::query_as::<_, Bootcamp>(
            "INSERT INTO bootcamps
                (id, user_id, owner_is_admin, name, slug, description, website, phone, email,
                 location_lat, location_lng, location_formatted_address, location_street,
                 location_city, location_state, location_zipcode, location_country,
                 careers, photo, housing, job_assistance, job_guarantee, accept_gi)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     $17, $18, $19, $20, $21, $22, $23)
             RETURNING *",
        )
        .bind(BootcampId::new())
        .bind(user.id)
        .bind(owner_is_admin)
        .bind(dto.name.trim())
        .bind(slugify(&dto.name))
        .bind(&dto.description)
        .bind(&dto.website)
        .bind(&dto.phone)
        .bind(&dto.email)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(&location.formatted_address)
        .bind(&location.street)
        .bind(&location.city)
        .bind(&location.state)
        .bind(&location.zipcode)
        .bind(&location.country)
        .bind(career_names(&dto.careers))
        .bind(DEFAULT_PHOTO)
        .bind(dto.housing)
        .bind(dto.job_assistance)
        .bind(dto.job_guarantee)
        .bind(dto.accept_gi)
        .fetch_one(db)
        .await
        .map_err(|e| match unique_violation(&e).as_deref() {
            Some(ONE_PER_PUBLISHER) => Self::already_published(user.id),
            _ => AppError::from(e),
        })?;

        info!(bootcamp.id = %bootcamp.id, bootcamp.slug = %bootcamp.slug, "Bootcamp created");
        Ok(bootcamp)
    }

    /// Applies the present fields. A new address is geocoded again and a
    /// new name produces a new slug.
    #[instrument(skip(db, geocoder, user, dto), fields(user.id = %user.id))]
    pub async fn update_bootcamp(
        db: &PgPool,
        geocoder: &dyn Geocoder,
        id: BootcampId,
        user: &User,
        dto: UpdateBootcampDto,
    ) -> Result<Bootcamp, AppError> {
        Self::find_owned(db, id, user, "update this bootcamp").await?;

        let location: Option<Location> = match dto.address.as_deref() {
            Some(address) => Some(geocoder.geocode(address).await?.into()),
            None => None,
        };
        let relocated = location.is_some();
        let location = location.unwrap_or(Location {
            latitude: 0.0,
            longitude: 0.0,
            formatted_address: None,
            street: None,
            city: None,
            state: None,
            zipcode: None,
            country: None,
        });

        let bootcamp = sqlx::query_as::<_, Bootcamp>(
            "UPDATE bootcamps SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                website = COALESCE($5, website),
                phone = COALESCE($6, phone),
                email = COALESCE($7, email),
                careers = COALESCE($8, careers),
                housing = COALESCE($9, housing),
                job_assistance = COALESCE($10, job_assistance),
                job_guarantee = COALESCE($11, job_guarantee),
                accept_gi = COALESCE($12, accept_gi),
                location_lat = CASE WHEN $13 THEN $14 ELSE location_lat END,
                location_lng = CASE WHEN $13 THEN $15 ELSE location_lng END,
                location_formatted_address = CASE WHEN $13 THEN $16 ELSE location_formatted_address END,
                location_street = CASE WHEN $13 THEN $17 ELSE location_street END,
                location_city = CASE WHEN $13 THEN $18 ELSE location_city END,
                location_state = CASE WHEN $13 THEN $19 ELSE location_state END,
                location_zipcode = CASE WHEN $13 THEN $20 ELSE location_zipcode END,
                location_country = CASE WHEN $13 THEN $21 ELSE location_country END
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.name.as_deref().map(slugify))
        .bind(dto.description)
        .bind(dto.website)
        .bind(dto.phone)
        .bind(dto.email)
        .bind(dto.careers.as_deref().map(career_names))
        .bind(dto.housing)
        .bind(dto.job_assistance)
        .bind(dto.job_guarantee)
        .bind(dto.accept_gi)
        .bind(relocated)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(location.formatted_address)
        .bind(location.street)
        .bind(location.city)
        .bind(location.state)
        .bind(location.zipcode)
        .bind(location.country)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| Self::not_found(id))?;

        info!(bootcamp.id = %bootcamp.id, relocated, "Bootcamp updated");
        Ok(bootcamp)
    }

    /// Deletes the bootcamp together with its courses and reviews, then
    /// removes its uploaded photo.
    #[instrument(skip(db, storage, user), fields(user.id = %user.id))]
    pub async fn delete_bootcamp(
        db: &PgPool,
        storage: &dyn FileStorage,
        id: BootcampId,
        user: &User,
    ) -> Result<(), AppError> {
        let bootcamp = Self::find_owned(db, id, user, "delete this bootcamp").await?;

        let mut tx = db.begin().await?;

        let reviews = sqlx::query("DELETE FROM reviews WHERE bootcamp_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let courses = sqlx::query("DELETE FROM courses WHERE bootcamp_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM bootcamps WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(Self::not_found(id));
        }

        tx.commit().await?;

        if bootcamp.photo != DEFAULT_PHOTO {
            if let Err(e) = storage.delete(&bootcamp.photo).await {
                warn!(error = %e, photo = %bootcamp.photo, "Failed to remove bootcamp photo");
            }
        }

        info!(bootcamp.id = %id, courses, reviews, "Bootcamp deleted");
        Ok(())
    }

    /// Bootcamps whose great-circle distance from `zipcode` is at most
    /// `distance_miles`, newest first.
    #[instrument(skip(db, geocoder))]
    pub async fn list_by_radius(
        db: &PgPool,
        geocoder: &dyn Geocoder,
        zipcode: &str,
        distance_miles: f64,
    ) -> Result<Vec<Bootcamp>, AppError> {
        let center = geocoder.geocode(zipcode).await?;
        let center = (center.latitude, center.longitude);

        let radius = radius_radians(distance_miles);
        let (low, high) = latitude_band(center.0, radius);

        let candidates = sqlx::query_as::<_, Bootcamp>(
            "SELECT * FROM bootcamps
             WHERE location_lat BETWEEN $1 AND $2
             ORDER BY created_at DESC, id ASC",
        )
        .bind(low)
        .bind(high)
        .fetch_all(db)
        .await?;

        let scanned = candidates.len();
        let bootcamps: Vec<Bootcamp> = candidates
            .into_iter()
            .filter(|b| within_radius(center, (b.location.latitude, b.location.longitude), radius))
            .collect();

        debug!(scanned, matched = bootcamps.len(), "Radius search");
        Ok(bootcamps)
    }

    /// Resizes and stores an uploaded photo as `photo_<id>.<ext>` and
    /// points the bootcamp at it. Returns the stored file name.
    ///
    /// The record is only updated once the file is on disk.
    #[instrument(skip(db, processor, storage, bootcamp, upload), fields(bootcamp.id = %bootcamp.id, bytes = upload.bytes.len()))]
    pub async fn upload_photo(
        db: &PgPool,
        processor: &dyn ImageProcessor,
        storage: &dyn FileStorage,
        bootcamp: &Bootcamp,
        upload: PhotoUpload,
        max_size: usize,
    ) -> Result<String, AppError> {
        if !upload.is_image() {
            return Err(AppError::bad_request("Please upload an image file"));
        }
        if upload.bytes.len() > max_size {
            return Err(AppError::bad_request(format!(
                "Please upload an image less than {} bytes",
                max_size
            )));
        }

        let (format, extension) = output_format(upload.file_name.as_deref());
        let file_name = format!("photo_{}.{}", bootcamp.id, extension);

        let resized = processor.resize(upload.bytes, format).await.map_err(|e| {
            error!(error = %e, "Photo processing failed");
            AppError::internal_error("Problem with file upload")
        })?;

        storage.save(&file_name, &resized).await.map_err(|e| {
            error!(error = %e, file = %file_name, "Photo storage failed");
            AppError::internal_error("Problem with file upload")
        })?;

        sqlx::query("UPDATE bootcamps SET photo = $2 WHERE id = $1")
            .bind(bootcamp.id)
            .bind(&file_name)
            .execute(db)
            .await?;

        if bootcamp.photo != DEFAULT_PHOTO && bootcamp.photo != file_name {
            if let Err(e) = storage.delete(&bootcamp.photo).await {
                warn!(error = %e, photo = %bootcamp.photo, "Failed to remove previous photo");
            }
        }

        info!(photo = %file_name, "Bootcamp photo uploaded");
        Ok(file_name)
    }
}
