use devcamper_core::AppError;
use devcamper_models::{User, UserId};

/// Passes when `user` owns the resource or is an admin.
///
/// `action` reads as the rest of "not authorized to ...", for example
/// `"update this bootcamp"`.
pub fn ensure_owner_or_admin(owner: UserId, user: &User, action: &str) -> Result<(), AppError> {
    if owner == user.id || user.role.is_admin() {
        return Ok(());
    }

    Err(AppError::forbidden(format!(
        "User {} is not authorized to {}",
        user.id, action
    )))
}
