//! # DevCamper Models
//!
//! Database rows, request DTOs and response envelopes.
//!
//! - [`ids`]: typed UUID ids
//! - [`users`]: accounts, roles and auth DTOs
//! - [`bootcamps`]: bootcamps, careers, location
//! - [`courses`]: courses and skill levels
//! - [`reviews`]: reviews
//! - [`responses`]: `{ success, data }` envelopes
//!
//! Rows serialize with camelCase keys; foreign keys are exposed as
//! `user` / `bootcamp`.

pub mod bootcamps;
pub mod courses;
pub mod ids;
pub mod responses;
pub mod reviews;
pub mod users;

pub use bootcamps::{
    Bootcamp, BootcampSummary, BootcampWithCourses, Career, CreateBootcampDto, Location,
    UpdateBootcampDto,
};
pub use courses::{Course, CreateCourseDto, MinimumSkill, UpdateCourseDto};
pub use ids::{BootcampId, CourseId, ReviewId, UserId};
pub use responses::{DataResponse, Empty, ListResponse};
pub use reviews::{CreateReviewDto, Review, UpdateReviewDto};
pub use users::{
    CreateUserDto, ForgotPasswordDto, ForgotPasswordResponse, LoginDto, RegisterDto,
    ResetPasswordDto, Role, TokenResponse, UpdateDetailsDto, UpdatePasswordDto, UpdateUserDto,
    User,
};
