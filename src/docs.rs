use devcamper_core::errors::ErrorBody;
use devcamper_core::query::{PageLink, PaginationLinks};
use devcamper_models::{
    Bootcamp, BootcampSummary, BootcampWithCourses, Career, Course, CreateBootcampDto,
    CreateCourseDto, CreateReviewDto, CreateUserDto, Empty, ForgotPasswordDto,
    ForgotPasswordResponse, Location, LoginDto, MinimumSkill, RegisterDto, ResetPasswordDto,
    Review, Role, TokenResponse, UpdateBootcampDto, UpdateCourseDto, UpdateDetailsDto,
    UpdatePasswordDto, UpdateReviewDto, UpdateUserDto, User,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::bootcamps::model::RadiusResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::bootcamps::controller::get_bootcamps,
        crate::modules::bootcamps::controller::get_bootcamp,
        crate::modules::bootcamps::controller::get_bootcamps_in_radius,
        crate::modules::bootcamps::controller::create_bootcamp,
        crate::modules::bootcamps::controller::update_bootcamp,
        crate::modules::bootcamps::controller::delete_bootcamp,
        crate::modules::bootcamps::controller::upload_bootcamp_photo,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_bootcamp_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::add_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::reviews::controller::get_reviews,
        crate::modules::reviews::controller::get_bootcamp_reviews,
        crate::modules::reviews::controller::get_review,
        crate::modules::reviews::controller::add_review,
        crate::modules::reviews::controller::update_review,
        crate::modules::reviews::controller::delete_review,
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::get_me,
        crate::modules::auth::controller::update_details,
        crate::modules::auth::controller::update_password,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
    ),
    components(
        schemas(
            Bootcamp,
            BootcampSummary,
            BootcampWithCourses,
            Career,
            Location,
            CreateBootcampDto,
            UpdateBootcampDto,
            RadiusResponse,
            Course,
            MinimumSkill,
            CreateCourseDto,
            UpdateCourseDto,
            Review,
            CreateReviewDto,
            UpdateReviewDto,
            User,
            Role,
            CreateUserDto,
            UpdateUserDto,
            RegisterDto,
            LoginDto,
            UpdateDetailsDto,
            UpdatePasswordDto,
            ForgotPasswordDto,
            ForgotPasswordResponse,
            ResetPasswordDto,
            TokenResponse,
            PaginationLinks,
            PageLink,
            Empty,
            ErrorBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Bootcamps", description = "Bootcamp listing, search and management"),
        (name = "Courses", description = "Courses offered by bootcamps"),
        (name = "Reviews", description = "User reviews of bootcamps"),
        (name = "Authentication", description = "Registration, login and password management"),
        (name = "Users", description = "Account administration (admin only)")
    ),
    info(
        title = "DevCamper API",
        version = "1.0.0",
        description = "Bootcamp directory API: bootcamps, courses, reviews and accounts. List endpoints accept `field[op]=value` filters with `select`, `sort`, `page` and `limit`.",
        contact(
            name = "API Support",
            email = "support@devcamper.io"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
