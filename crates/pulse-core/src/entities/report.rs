use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::UserId;
use crate::enums::TaskPriority;
use crate::errors::CoreError;

/// Monthly KPI for one user, aggregated server-side over tasks due that month.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MonthlyKpi {
    pub user_id: UserId,
    /// `YYYY-MM`.
    pub month: String,
    pub total: u32,
    pub done: u32,
    pub done_on_time: u32,
    pub done_late: u32,
    #[serde(default)]
    pub by_priority: Vec<PriorityKpi>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PriorityKpi {
    pub priority: TaskPriority,
    pub total: u32,
    pub done: u32,
    pub done_on_time: u32,
    pub done_late: u32,
}

impl MonthlyKpi {
    /// Share of done tasks finished on time, in percent. `None` when nothing is done.
    #[must_use]
    pub fn on_time_rate(&self) -> Option<f64> {
        (self.done > 0).then(|| f64::from(self.done_on_time) * 100.0 / f64::from(self.done))
    }
}

/// Whose report to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportSubject {
    #[default]
    Me,
    User(UserId),
}

impl ReportSubject {
    /// Value of the `user` query parameter.
    #[must_use]
    pub fn as_param(self) -> String {
        match self {
            Self::Me => "me".to_string(),
            Self::User(id) => id.to_string(),
        }
    }
}

/// Check that `raw` is a `YYYY-MM` month and return it trimmed.
///
/// # Errors
///
/// Returns `CoreError::InvalidValue` for anything else.
pub fn parse_month(raw: &str) -> Result<String, CoreError> {
    let raw = raw.trim();
    let invalid = || CoreError::InvalidValue {
        field: "month".into(),
        value: raw.to_string(),
    };
    let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
    let well_formed = year.len() == 4
        && month.len() == 2
        && year.chars().all(|c| c.is_ascii_digit())
        && month.parse::<u8>().is_ok_and(|m| (1..=12).contains(&m));
    if well_formed { Ok(raw.to_string()) } else { Err(invalid()) }
}
