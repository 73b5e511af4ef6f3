//! Services module - business logic that sits between routes and storage.

pub mod filter_service;

pub use filter_service::{resolve_filter, FilterError, ListParams, PromotionFilter};
