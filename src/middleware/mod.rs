//! Request middleware and the extractors that go with it.
//!
//! - [`auth`]: bearer/cookie token gate and the [`auth::CurrentUser`] extractor
//! - [`role`]: role gates, as route layers and as extractors
//! - [`rate_limit`]: per-client request ceiling
//! - [`error`]: development-mode error detail
//!
//! ```ignore
//! use crate::middleware::auth::CurrentUser;
//! use crate::middleware::role::PublisherOrAdmin;
//!
//! // any signed-in user
//! async fn me(CurrentUser(user): CurrentUser) -> Json<DataResponse<User>> { .. }
//!
//! // signed in and publisher or admin
//! async fn create(PublisherOrAdmin(user): PublisherOrAdmin) -> .. { .. }
//! ```

pub mod auth;
pub mod error;
pub mod rate_limit;
pub mod role;
