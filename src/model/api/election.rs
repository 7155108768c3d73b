use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    api::candidate::Candidate,
    common::{timestamp::naive_utc, ElectionId},
};

/// The status column the backend stores alongside each election.
///
/// This is whatever an admin last saved; it is *not* kept in step with the
/// clock. Use [`crate::lifecycle::ElectionStatus`] for anything time-based.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElectionState {
    NotStarted,
    Ongoing,
    Completed,
    Cancelled,
}

impl Display for ElectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElectionState::NotStarted => "NOT_STARTED",
            ElectionState::Ongoing => "ONGOING",
            ElectionState::Completed => "COMPLETED",
            ElectionState::Cancelled => "CANCELLED",
        };
        write!(f, "{name}")
    }
}

/// An election as described by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    /// Election unique ID.
    pub id: ElectionId,
    /// Election title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Scheduled opening, UTC.
    #[serde(with = "naive_utc")]
    pub start_date: DateTime<Utc>,
    /// Scheduled close, UTC.
    #[serde(with = "naive_utc")]
    pub end_date: DateTime<Utc>,
    /// Stored status column.
    #[serde(default)]
    pub status: Option<ElectionState>,
    /// Upper bound on the eligibility list, if any.
    #[serde(default)]
    pub max_voters: Option<u32>,
    /// Candidates standing, when the endpoint embeds them.
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
    #[serde(default, with = "naive_utc::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "naive_utc::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Election {
    /// Candidates standing in this election; empty if none were embedded.
    pub fn candidates(&self) -> &[Candidate] {
        self.candidates.as_deref().unwrap_or_default()
    }
}

/// An election specification, sent when creating or editing an election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionSpec {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "naive_utc")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "naive_utc")]
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ElectionState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_voters: Option<u32>,
}

impl ElectionSpec {
    /// Check the spec before it is sent.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::invalid("title", "title must not be empty"));
        }
        if self.start_date >= self.end_date {
            return Err(Error::invalid(
                "endDate",
                format!(
                    "election must end after it starts ({} is not after {})",
                    self.end_date, self.start_date
                ),
            ));
        }
        if self.max_voters == Some(0) {
            return Err(Error::invalid("maxVoters", "must be a positive number"));
        }
        Ok(())
    }
}

/// Start editing an existing election from its current values.
impl From<&Election> for ElectionSpec {
    fn from(election: &Election) -> Self {
        Self {
            title: election.title.clone(),
            description: election.description.clone(),
            start_date: election.start_date,
            end_date: election.end_date,
            status: election.status,
            max_voters: election.max_voters,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn decodes_backend_record() {
        let election: Election = serde_json::from_value(json!({
            "id": 12,
            "title": "Lok Sabha Mock Poll",
            "description": null,
            "startDate": "2024-06-01T09:00:00",
            "endDate": "2024-06-01T11:00:00",
            "status": "NOT_STARTED",
            "candidates": null,
            "createdAt": "2024-05-20T08:12:45.123456",
            "updatedAt": null,
            "maxVoters": null
        }))
        .unwrap();
        assert_eq!(election.id, 12);
        assert_eq!(election.status, Some(ElectionState::NotStarted));
        assert_eq!(
            election.start_date,
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
        );
        assert!(election.candidates().is_empty());
        assert!(election.max_voters.is_none());
        assert!(election.created_at.is_some());
    }

    #[test]
    fn spec_wire_format() {
        let json = serde_json::to_value(ElectionSpec::example()).unwrap();
        assert_eq!(json["startDate"], "2024-06-01T09:00:00");
        assert_eq!(json["endDate"], "2024-06-01T11:00:00");
        assert_eq!(json["maxVoters"], 500);
        assert!(json.get("status").is_none());
    }

    #[test]
    fn spec_validation() {
        ElectionSpec::example().validate().unwrap();

        let mut untitled = ElectionSpec::example();
        untitled.title = "   ".into();
        assert!(matches!(
            untitled.validate(),
            Err(Error::InvalidInput { field, .. }) if field == "title"
        ));

        let mut backwards = ElectionSpec::example();
        std::mem::swap(&mut backwards.start_date, &mut backwards.end_date);
        assert!(matches!(
            backwards.validate(),
            Err(Error::InvalidInput { field, .. }) if field == "endDate"
        ));

        let mut instant = ElectionSpec::example();
        instant.end_date = instant.start_date;
        assert!(instant.validate().is_err());

        let mut nobody = ElectionSpec::example();
        nobody.max_voters = Some(0);
        assert!(matches!(
            nobody.validate(),
            Err(Error::InvalidInput { field, .. }) if field == "maxVoters"
        ));
    }
}
