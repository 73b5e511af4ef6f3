// API module for the promotions service
pub mod api;

// Re-export api modules at crate root so internal code and tests can use
// crate::models, crate::routes, etc.
pub use api::middleware;
pub use api::models;
pub use api::routes;
pub use api::services;
pub use api::storage;
