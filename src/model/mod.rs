//! Data models for weightlog.
//!
//! - Record (one dated weight/calorie entry)

pub mod record;

pub use record::{line_has_date, Record, DELIMITER};
