//! Record model for the weight log.
//!
//! A record is one day's entry: a calendar date, a weight, and a calorie
//! count. All three are kept as the caller supplied them (text); the log
//! file never interprets the numbers.

use serde::{Deserialize, Serialize};

/// Field delimiter used by the line format.
pub const DELIMITER: char = ',';

/// One entry in the weight log.
///
/// On disk a record is a single line `date,weight,calorie` with no header
/// and no escaping, so no field may contain the delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Calendar date in whatever format the caller uses (also the lookup key)
    pub date: String,

    /// Weight as decimal text
    pub weight: String,

    /// Calorie intake as decimal text
    pub calorie: String,
}

impl Record {
    /// Create a new record.
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        weight: impl Into<String>,
        calorie: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            weight: weight.into(),
            calorie: calorie.into(),
        }
    }

    /// Parse a stored line.
    ///
    /// Returns `None` unless the line splits into exactly three fields.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.split(DELIMITER);
        let date = fields.next()?;
        let weight = fields.next()?;
        let calorie = fields.next()?;
        if fields.next().is_some() {
            return None;
        }
        Some(Self::new(date, weight, calorie))
    }

    /// Render the record as a stored line (without line terminator).
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "{}{DELIMITER}{}{DELIMITER}{}",
            self.date, self.weight, self.calorie
        )
    }

    /// Weight parsed as a number, if it is one.
    #[must_use]
    pub fn weight_value(&self) -> Option<f64> {
        self.weight.trim().parse().ok()
    }

    /// Calorie count parsed as a number, if it is one.
    #[must_use]
    pub fn calorie_value(&self) -> Option<f64> {
        self.calorie.trim().parse().ok()
    }
}

/// Whether a stored line belongs to `date`.
///
/// Matches on the date prefix followed by the delimiter, so `2024-01-1`
/// never matches a line for `2024-01-10`.
#[must_use]
pub fn line_has_date(line: &str, date: &str) -> bool {
    line.strip_prefix(date).is_some_and(|rest| rest.starts_with(DELIMITER))
}
