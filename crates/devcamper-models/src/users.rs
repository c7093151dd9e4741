//! Accounts and the DTOs that create or change them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
    Publisher,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Publisher => "publisher",
        }
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "publisher" => Ok(Self::Publisher),
            _ => Err("Role is either: admin, user, publisher".to_string()),
        }
    }
}

/// A stored account. Credential columns never serialize.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub avatar: Option<String>,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(skip)]
    pub password_changed_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub reset_password_token: Option<String>,
    #[serde(skip)]
    pub reset_password_expire: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the password changed after a token issued at `iat`
    /// (Unix seconds). Compared at whole-second precision.
    pub fn changed_password_after(&self, iat: i64) -> bool {
        self.password_changed_at
            .map(|changed| iat < changed.timestamp())
            .unwrap_or(false)
    }
}

/// Lowercases and trims an email before it is stored or looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Gravatar URL for an email: 200px, PG rated, mystery-person fallback.
pub fn gravatar_url(email: &str) -> String {
    let digest = hex::encode(Sha256::digest(normalize_email(email).as_bytes()));
    format!("https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm", digest)
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDto {
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: String,
    #[validate(email(message = "Please add a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirm: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginDto {
    #[validate(email(message = "Please provide an email and password"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please provide an email and password"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateDetailsDto {
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordDto {
    #[validate(length(min = 1, message = "Please provide your current password"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordDto {
    #[validate(email(message = "Please add a valid email"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordDto {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Admin-side account creation. Any role may be assigned.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: String,
    #[validate(email(message = "Please add a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub success: bool,
    pub data: String,
    /// Only populated in development, since no mail is sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user_changed_at(changed: Option<DateTime<Utc>>) -> User {
        User {
            id: UserId::new(),
            name: "Jane".to_string(),
            email: "jane@gmail.com".to_string(),
            role: Role::Publisher,
            avatar: None,
            password_hash: "hash".to_string(),
            password_changed_at: changed,
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_changed_password_after() {
        let changed = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let user = user_changed_at(Some(changed));

        assert!(user.changed_password_after(changed.timestamp() - 1));
        assert!(!user.changed_password_after(changed.timestamp()));
        assert!(!user.changed_password_after(changed.timestamp() + 60));
        assert!(!user_changed_at(None).changed_password_after(0));
    }

    #[test]
    fn test_sub_second_change_counts_as_same_second() {
        let changed = Utc.timestamp_opt(1_700_000_000, 900_000_000).unwrap();
        assert!(!user_changed_at(Some(changed)).changed_password_after(1_700_000_000));
    }

    #[test]
    fn test_serialized_user_hides_credentials() {
        let json = serde_json::to_value(user_changed_at(Some(Utc::now()))).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("createdAt"));
        assert!(!obj.contains_key("passwordHash"));
        assert!(!obj.contains_key("passwordChangedAt"));
        assert!(!obj.contains_key("resetPasswordToken"));
        assert_eq!(obj["role"], "publisher");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("publisher".parse::<Role>(), Ok(Role::Publisher));
        assert!("superuser".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_gravatar_is_case_insensitive() {
        let url = gravatar_url(" John@Gmail.com ");
        assert_eq!(url, gravatar_url("john@gmail.com"));
        assert!(url.starts_with("https://www.gravatar.com/avatar/"));
        assert!(url.ends_with("?s=200&r=pg&d=mm"));
    }

    #[test]
    fn test_register_validation() {
        let dto = RegisterDto {
            name: "John".to_string(),
            email: "john@gmail.com".to_string(),
            password: "123456".to_string(),
            password_confirm: "654321".to_string(),
            role: Some(Role::Publisher),
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_confirm"));

        let dto = RegisterDto {
            password_confirm: "123456".to_string(),
            ..dto
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_details_allows_partial() {
        let dto = UpdateDetailsDto {
            name: None,
            email: Some("new@gmail.com".to_string()),
        };
        assert!(dto.validate().is_ok());

        let dto = UpdateDetailsDto {
            name: None,
            email: Some("nope".to_string()),
        };
        assert!(dto.validate().is_err());
    }
}
