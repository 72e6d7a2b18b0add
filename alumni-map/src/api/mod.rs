//! HTTP API handlers for alumni-map

pub mod health;
pub mod import;
pub mod students;

pub use health::health_routes;
pub use import::import_routes;
pub use students::student_routes;
