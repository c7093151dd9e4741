//! # DevCamper Core
//!
//! Foundational types shared by every DevCamper crate:
//!
//! - [`errors`]: the application error type and its HTTP response
//! - [`password`]: bcrypt hashing and verification
//! - [`query`]: the list-endpoint query language (filters, select, sort, paging)
//! - [`file_storage`]: where uploaded photos end up
//!
//! ```ignore
//! use devcamper_core::errors::AppError;
//! use devcamper_core::query::QuerySpec;
//!
//! let spec = QuerySpec::parse([("averageCost[lte]", "10000"), ("limit", "5")])?;
//! let resolved = spec.resolve(BOOTCAMP_FIELDS)?;
//! ```

pub mod errors;
pub mod file_storage;
pub mod password;
pub mod query;

pub use errors::AppError;
pub use password::{hash_password, verify_password};
