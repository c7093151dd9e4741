//! Seed rows and the knobs that size a seeding run.

use devcamper_models::{BootcampId, MinimumSkill, Role, UserId};

pub struct UserSeed {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

pub struct BootcampSeed {
    pub id: BootcampId,
    pub user_id: UserId,
    pub name: String,
    pub description: String,
    pub website: String,
    pub phone: String,
    pub email: String,
    pub latitude: f64,
    pub longitude: f64,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub careers: Vec<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub average_cost: Option<f64>,
    pub average_rating: Option<f64>,
}

pub struct CourseSeed {
    pub bootcamp_id: BootcampId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub weeks: i32,
    pub tuition: f64,
    pub minimum_skill: MinimumSkill,
    pub scholarship_available: bool,
}

pub struct ReviewSeed {
    pub bootcamp_id: BootcampId,
    pub user_id: UserId,
    pub title: String,
    pub text: String,
    pub rating: i32,
}

/// Size of a seeding run. Every publisher owns exactly one bootcamp.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub publishers: usize,
    pub users: usize,
    pub courses_per_bootcamp: usize,
    pub reviews_per_bootcamp: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            publishers: 4,
            users: 10,
            courses_per_bootcamp: 3,
            reviews_per_bootcamp: 2,
        }
    }
}

impl SeedConfig {
    pub fn new(publishers: usize) -> Self {
        Self {
            publishers,
            ..Default::default()
        }
    }

    pub fn with_users(mut self, users: usize) -> Self {
        self.users = users;
        self
    }

    pub fn with_courses(mut self, courses_per_bootcamp: usize) -> Self {
        self.courses_per_bootcamp = courses_per_bootcamp;
        self
    }

    pub fn with_reviews(mut self, reviews_per_bootcamp: usize) -> Self {
        self.reviews_per_bootcamp = reviews_per_bootcamp;
        self
    }

    /// Reviews actually written per bootcamp; a user reviews a bootcamp once.
    pub fn effective_reviews(&self) -> usize {
        self.reviews_per_bootcamp.min(self.users)
    }
}
