//! Account administration. Every route is admin-only; the gate is applied
//! where the router is mounted.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
