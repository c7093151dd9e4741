//! Bootcamps, their geocoded location and the DTOs that write them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::courses::Course;
use crate::ids::{BootcampId, UserId};

/// Photo reference of a bootcamp that has no upload yet.
pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Career {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "UI/UX")]
    UiUx,
    #[serde(rename = "Data Science")]
    DataScience,
    Business,
    Other,
}

impl Career {
    pub const ALL: [Career; 6] = [
        Career::WebDevelopment,
        Career::MobileDevelopment,
        Career::UiUx,
        Career::DataScience,
        Career::Business,
        Career::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebDevelopment => "Web Development",
            Self::MobileDevelopment => "Mobile Development",
            Self::UiUx => "UI/UX",
            Self::DataScience => "Data Science",
            Self::Business => "Business",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Career {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geocoded point plus the address parts the provider returned.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[sqlx(rename = "location_lat")]
    pub latitude: f64,
    #[sqlx(rename = "location_lng")]
    pub longitude: f64,
    #[sqlx(rename = "location_formatted_address")]
    pub formatted_address: Option<String>,
    #[sqlx(rename = "location_street")]
    pub street: Option<String>,
    #[sqlx(rename = "location_city")]
    pub city: Option<String>,
    #[sqlx(rename = "location_state")]
    pub state: Option<String>,
    #[sqlx(rename = "location_zipcode")]
    pub zipcode: Option<String>,
    #[sqlx(rename = "location_country")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    pub id: BootcampId,
    #[serde(rename = "user")]
    pub user_id: UserId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[sqlx(flatten)]
    pub location: Location,
    pub careers: Vec<String>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub photo: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub created_at: DateTime<Utc>,
}

/// Embedded form of a bootcamp on course and review listings.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, ToSchema)]
pub struct BootcampSummary {
    pub id: BootcampId,
    pub name: String,
    pub description: String,
}

/// A bootcamp with its courses, as returned by the bootcamp listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BootcampWithCourses {
    #[serde(flatten)]
    pub bootcamp: Bootcamp,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBootcampDto {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Please add a name of no more than 50 characters"
    ))]
    pub name: String,
    #[validate(length(
        min = 1,
        max = 500,
        message = "Please add a description of no more than 500 characters"
    ))]
    pub description: String,
    #[validate(url(message = "Please use a valid URL with HTTP or HTTPS"))]
    pub website: Option<String>,
    #[validate(length(max = 20, message = "Phone number can not be longer than 20 characters"))]
    pub phone: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Please add an address"))]
    pub address: String,
    #[validate(length(min = 1, message = "Please add at least one career"))]
    pub careers: Vec<Career>,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBootcampDto {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Please add a name of no more than 50 characters"
    ))]
    pub name: Option<String>,
    #[validate(length(
        min = 1,
        max = 500,
        message = "Please add a description of no more than 500 characters"
    ))]
    pub description: Option<String>,
    #[validate(url(message = "Please use a valid URL with HTTP or HTTPS"))]
    pub website: Option<String>,
    #[validate(length(max = 20, message = "Phone number can not be longer than 20 characters"))]
    pub phone: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Please add an address"))]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "Please add at least one career"))]
    pub careers: Option<Vec<Career>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

/// Careers as stored in the `careers TEXT[]` column.
pub fn career_names(careers: &[Career]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(careers.len());
    for career in careers {
        let name = career.as_str().to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// URL-safe slug derived from a bootcamp name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}
