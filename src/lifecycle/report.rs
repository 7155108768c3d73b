use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;

use crate::error::Result;
use crate::lifecycle::{tally, ElectionStatus};
use crate::model::api::{CandidateTally, ElectionResult};
use crate::model::common::{timestamp::format_ist, CandidateId, ElectionId};

/// Percentages from the backend are compared to ours within this margin.
const PERCENTAGE_TOLERANCE: f64 = 1e-6;

/// One candidate's line in a [`ResultReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub party_name: Option<String>,
    pub vote_count: u64,
    pub percentage: f64,
}

impl Display for Standing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.candidate_name)?;
        if let Some(party) = &self.party_name {
            write!(f, " ({party})")?;
        }
        write!(
            f,
            ": {} vote{} ({:.2}%)",
            self.vote_count,
            if self.vote_count != 1 { "s" } else { "" },
            self.percentage
        )
    }
}

/// An election result, recomputed from its raw counts and gated on status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultReport {
    pub election_id: ElectionId,
    pub title: String,
    pub status: ElectionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Zero when the counts are withheld.
    pub total_votes: u64,
    /// In the order the backend listed the candidates.
    pub standings: Vec<Standing>,
    /// Only ever present once the election has completed.
    pub winner: Option<Standing>,
    /// Set when the counts were dropped because the viewer may not see them yet.
    pub withheld: bool,
}

impl ResultReport {
    pub(crate) fn build(result: &ElectionResult, status: ElectionStatus) -> Result<Self> {
        let tally = tally(result.vote_counts())?;

        if i64::try_from(tally.total_votes()).ok() != Some(result.total_votes) {
            warn!(
                "Election {} reports {} total votes but its candidates add up to {}",
                result.election_id,
                result.total_votes,
                tally.total_votes()
            );
        }

        let standings: Vec<Standing> = result
            .candidate_results
            .iter()
            .zip(tally.shares())
            .map(|(reported, share)| {
                if (reported.percentage - share.percentage).abs() > PERCENTAGE_TOLERANCE {
                    warn!(
                        "Election {} candidate {}: reported {:.4}% but counts give {:.4}%",
                        result.election_id,
                        reported.candidate_id,
                        reported.percentage,
                        share.percentage
                    );
                }
                standing(reported, share.vote_count, share.percentage)
            })
            .collect();

        let winner = tally
            .winner_index(status)
            .and_then(|i| standings.get(i))
            .cloned();
        check_reported_winner(result, status, winner.as_ref());

        Ok(Self {
            election_id: result.election_id,
            title: result.title.clone(),
            status,
            start_date: result.start_date,
            end_date: result.end_date,
            total_votes: tally.total_votes(),
            standings,
            winner,
            withheld: false,
        })
    }

    /// The report as a voter may see it: counts stay hidden until the
    /// election has completed.
    pub fn for_voter(mut self) -> Self {
        if self.status != ElectionStatus::Completed {
            self.total_votes = 0;
            self.standings.clear();
            self.winner = None;
            self.withheld = true;
        }
        self
    }
}

fn standing(reported: &CandidateTally, vote_count: u64, percentage: f64) -> Standing {
    Standing {
        candidate_id: reported.candidate_id,
        candidate_name: reported.candidate_name.clone(),
        party_name: reported.party_name.clone(),
        vote_count,
        percentage,
    }
}

fn check_reported_winner(
    result: &ElectionResult,
    status: ElectionStatus,
    winner: Option<&Standing>,
) {
    let reported = result.winner.as_ref().map(|w| w.candidate_id);
    if status != ElectionStatus::Completed {
        if let Some(id) = reported {
            debug!(
                "Ignoring winner {id} declared for {status} election {}",
                result.election_id
            );
        }
        return;
    }
    let ours = winner.map(|w| w.candidate_id);
    if reported.is_some() && reported != ours {
        warn!(
            "Election {}: backend declared winner {:?}, counts give {:?}",
            result.election_id, reported, ours
        );
    }
}

impl Display for ResultReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} [{}]", self.title, self.status)?;
        writeln!(
            f,
            "  {} to {}",
            format_ist(self.start_date),
            format_ist(self.end_date)
        )?;
        if self.withheld {
            return write!(f, "  Results will be available after the election ends");
        }
        writeln!(f, "  Total votes: {}", self.total_votes)?;
        for standing in &self.standings {
            writeln!(f, "  {standing}")?;
        }
        match (&self.winner, self.status) {
            (Some(winner), _) => {
                write!(f, "  Winner: {}", winner.candidate_name)?;
                if let Some(party) = &winner.party_name {
                    write!(f, " ({party})")?;
                }
                Ok(())
            }
            (None, ElectionStatus::Ongoing) => write!(f, "  Election is ongoing"),
            (None, ElectionStatus::Upcoming) => write!(f, "  Election has not started"),
            (None, ElectionStatus::Completed) => write!(f, "  No winner (no votes cast)"),
        }
    }
}
