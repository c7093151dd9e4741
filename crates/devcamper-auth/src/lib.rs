//! # DevCamper Auth
//!
//! Stateless credential handling:
//!
//! - [`claims`]: what a signed token carries
//! - [`jwt`]: issuing and verifying tokens
//! - [`reset`]: single-use password reset tokens
//!
//! ```ignore
//! use devcamper_auth::{create_token, verify_token};
//!
//! let token = create_token(user_id, "Jane", "jane@gmail.com", "publisher", &jwt_config)?;
//! let claims = verify_token(&token, &jwt_config)?;
//! ```

pub mod claims;
pub mod jwt;
pub mod reset;

pub use claims::Claims;
pub use jwt::{TokenError, create_token, verify_token};
pub use reset::{ResetToken, hash_reset_token};
