//! Election lifecycle status and tally evaluation.
//!
//! Everything here is pure: the only notion of "now" is the instant an
//! [`LifecycleEvaluator`] was pinned to, and all comparisons are made in UTC.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::api::{Election, ElectionResult};
use crate::model::common::timestamp::parse_timestamp;

mod report;
mod tally;

pub use report::{ResultReport, Standing};
pub use tally::{tally, CandidateShare, Tally};

/// Where an election is in its scheduled window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ElectionStatus {
    /// The window has not opened yet.
    Upcoming,
    /// Inside the window, both ends included.
    Ongoing,
    /// The window has closed.
    Completed,
}

impl Display for ElectionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElectionStatus::Upcoming => "upcoming",
            ElectionStatus::Ongoing => "ongoing",
            ElectionStatus::Completed => "completed",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ElectionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(ElectionStatus::Upcoming),
            "ongoing" => Ok(ElectionStatus::Ongoing),
            "completed" => Ok(ElectionStatus::Completed),
            other => Err(Error::invalid(
                "status",
                format!("`{other}` is not one of upcoming, ongoing, completed"),
            )),
        }
    }
}

/// Status of an election with window `[start, end]` at instant `now`.
pub fn resolve_status(
    now: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ElectionStatus {
    if now < start {
        ElectionStatus::Upcoming
    } else if now <= end {
        ElectionStatus::Ongoing
    } else {
        ElectionStatus::Completed
    }
}

/// As [`resolve_status`], from raw wire strings. Zone-less timestamps are UTC.
pub fn resolve_status_str(now: &str, start: &str, end: &str) -> Result<ElectionStatus> {
    Ok(resolve_status(
        parse_timestamp("now", now)?,
        parse_timestamp("startDate", start)?,
        parse_timestamp("endDate", end)?,
    ))
}

/// Evaluates elections against one fixed instant, so that every status shown
/// in the same listing agrees.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LifecycleEvaluator {
    now: DateTime<Utc>,
}

impl LifecycleEvaluator {
    /// Pin to the current wall-clock instant.
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// The instant this evaluator is pinned to.
    pub fn instant(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn status(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> ElectionStatus {
        resolve_status(self.now, start, end)
    }

    pub fn status_of(&self, election: &Election) -> ElectionStatus {
        self.status(election.start_date, election.end_date)
    }

    /// Whether ballots can currently be cast in `election`.
    pub fn is_open(&self, election: &Election) -> bool {
        self.status_of(election) == ElectionStatus::Ongoing
    }

    /// Recompute a backend result and decide what may be shown.
    pub fn report(&self, result: &ElectionResult) -> Result<ResultReport> {
        let status = self.status(result.start_date, result.end_date);
        ResultReport::build(result, status)
    }
}
