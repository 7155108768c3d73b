use serde::Serialize;

use crate::error::{Error, Result};
use crate::lifecycle::ElectionStatus;
use crate::model::common::CandidateId;

/// One candidate's slice of the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateShare {
    pub candidate_id: CandidateId,
    pub vote_count: u64,
    /// 0–100. Zero for every candidate when no votes were cast.
    pub percentage: f64,
}

/// Aggregated vote counts and derived percentages for one election.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    total_votes: u64,
    shares: Vec<CandidateShare>,
    /// Index into `shares` of the first candidate holding the maximum.
    #[serde(skip)]
    leader: Option<usize>,
}

impl Tally {
    pub fn total_votes(&self) -> u64 {
        self.total_votes
    }

    /// Shares in input order.
    pub fn shares(&self) -> &[CandidateShare] {
        &self.shares
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// The winner, if the election has completed and anyone voted.
    ///
    /// Ties on the maximum go to the candidate listed first. An ongoing
    /// election's front-runner is never returned here.
    pub fn winner(&self, status: ElectionStatus) -> Option<&CandidateShare> {
        self.winner_index(status).map(|i| &self.shares[i])
    }

    /// Position in [`Tally::shares`] of the winner, under the same rules as
    /// [`Tally::winner`].
    pub fn winner_index(&self, status: ElectionStatus) -> Option<usize> {
        if status != ElectionStatus::Completed {
            return None;
        }
        self.leader
    }
}

/// Tally `(candidate, votes)` pairs.
///
/// Fails with [`Error::InvalidInput`] on the first negative count, naming the
/// candidate it belongs to.
pub fn tally<I>(votes: I) -> Result<Tally>
where
    I: IntoIterator<Item = (CandidateId, i64)>,
{
    let counts = votes
        .into_iter()
        .map(|(candidate_id, count)| {
            u64::try_from(count)
                .map(|count| (candidate_id, count))
                .map_err(|_| {
                    Error::invalid(
                        format!("voteCount[candidate {candidate_id}]"),
                        format!("vote count must not be negative (got {count})"),
                    )
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let total_votes = counts
        .iter()
        .try_fold(0_u64, |sum, (_, count)| sum.checked_add(*count))
        .ok_or_else(|| Error::invalid("voteCount", "total vote count overflows"))?;

    let shares: Vec<CandidateShare> = counts
        .into_iter()
        .map(|(candidate_id, vote_count)| CandidateShare {
            candidate_id,
            vote_count,
            percentage: percentage(vote_count, total_votes),
        })
        .collect();

    // Strictly greater, so the earliest of several tied maxima is kept.
    let leader = if total_votes == 0 {
        None
    } else {
        shares
            .iter()
            .enumerate()
            .fold(None::<(usize, u64)>, |best, (i, share)| match best {
                Some((_, max)) if share.vote_count <= max => best,
                _ => Some((i, share.vote_count)),
            })
            .map(|(i, _)| i)
    };

    Ok(Tally {
        total_votes,
        shares,
        leader,
    })
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}
