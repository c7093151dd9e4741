//! # DevCamper CLI
//!
//! Account bootstrap and database seeding for development.
//!
//! ```ignore
//! use devcamper_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(10); // 10 publishers, one bootcamp each
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
