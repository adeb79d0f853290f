//! Computations over loaded records.
//!
//! - [`trend`] - least-squares trend line for the weight chart
//! - [`aggregate`] - average loss per interval and average calories

pub mod aggregate;
pub mod trend;

pub use aggregate::{average_calories, average_loss, compute_averages, Averages};
pub use trend::{compute_trend, prepare_series, trend_series, TrendPoint};
