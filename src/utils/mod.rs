//! Collaborators and helpers shared by the resource modules.
//!
//! - [`geocoder`]: address to coordinates
//! - [`geo`]: great-circle distance for radius search
//! - [`image`]: photo resizing
//! - [`ownership`]: owner-or-admin checks

pub mod geo;
pub mod geocoder;
pub mod image;
pub mod ownership;
