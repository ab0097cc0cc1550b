use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a planning request is refused before any agent runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in the destination and dates.")]
    MissingFields,

    #[error("End date {end} is before start date {start}.")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// Destination value object
///
/// # Invariants
/// - Not empty after trimming surrounding whitespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination(String);

impl Destination {
    /// Creates a destination, returning `None` for blank input
    ///
    /// # Example
    /// ```
    /// use tripcrew_api::domain::trip::Destination;
    ///
    /// assert_eq!(Destination::new("  Kyoto ").unwrap().as_str(), "Kyoto");
    /// assert!(Destination::new("   ").is_none());
    /// ```
    pub fn new(destination: impl AsRef<str>) -> Option<Self> {
        let trimmed = destination.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Destination(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive travel window
///
/// # Invariants
/// - `end` is never before `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDates {
    start: NaiveDate,
    end: NaiveDate,
}

impl TripDates {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Validated inputs for one planning run
///
/// Interests and question are optional free text and are kept as (possibly
/// empty) trimmed strings, since every task template placeholder needs a
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInputs {
    destination: Destination,
    dates: TripDates,
    interests: String,
    question: String,
}

impl RunInputs {
    /// Validates raw inputs
    ///
    /// # Returns
    /// * `Ok(RunInputs)` - Destination and both dates present, end ≥ start
    /// * `Err(ValidationError)` - Otherwise; no run must be attempted
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use tripcrew_api::domain::trip::RunInputs;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 6, 1);
    /// let end = NaiveDate::from_ymd_opt(2024, 6, 3);
    /// let inputs = RunInputs::new("Paris", start, end, "food", "").unwrap();
    ///
    /// assert!(!inputs.has_question());
    /// assert_eq!(inputs.dates().days(), 3);
    /// ```
    pub fn new(
        destination: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        interests: &str,
        question: &str,
    ) -> Result<Self, ValidationError> {
        let (Some(destination), Some(start), Some(end)) =
            (Destination::new(destination), start_date, end_date)
        else {
            return Err(ValidationError::MissingFields);
        };

        Ok(Self {
            destination,
            dates: TripDates::new(start, end)?,
            interests: interests.trim().to_string(),
            question: question.trim().to_string(),
        })
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn dates(&self) -> TripDates {
        self.dates
    }

    pub fn interests(&self) -> &str {
        &self.interests
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Whether the local expert's answer should be shown
    pub fn has_question(&self) -> bool {
        !self.question.is_empty()
    }

    /// Placeholder values for task templates; dates use `YYYY-MM-DD`
    pub fn variables(&self) -> HashMap<String, String> {
        HashMap::from([
            ("destination".to_string(), self.destination.to_string()),
            ("interests".to_string(), self.interests.clone()),
            (
                "start_date".to_string(),
                self.dates.start.format("%Y-%m-%d").to_string(),
            ),
            (
                "end_date".to_string(),
                self.dates.end.format("%Y-%m-%d").to_string(),
            ),
            ("question".to_string(), self.question.clone()),
        ])
    }
}
