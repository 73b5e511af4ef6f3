// Models module - contains the Promotion record and its validation errors

pub mod promotion;

pub use promotion::{Promotion, ValidationError};
