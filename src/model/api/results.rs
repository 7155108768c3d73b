use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{
    image::Image, timestamp::naive_utc, CandidateId, ElectionId, PartyId,
};

/// Per-candidate results as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTally {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    #[serde(default)]
    pub party_name: Option<String>,
    #[serde(default)]
    pub candidate_photo: Option<Image>,
    #[serde(default)]
    pub party_logo: Option<Image>,
    /// Signed so that a corrupt negative count can be reported rather than
    /// failing the whole decode.
    pub vote_count: i64,
    /// Share of the total, 0–100, as computed by the backend.
    #[serde(default)]
    pub percentage: f64,
    // Admin results only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub election_id: Option<ElectionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_id: Option<PartyId>,
}

/// Results for one election, from either the voter or the admin endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResult {
    pub election_id: ElectionId,
    pub title: String,
    #[serde(with = "naive_utc")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "naive_utc")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub total_votes: i64,
    #[serde(default)]
    pub candidate_results: Vec<CandidateTally>,
    /// The backend's pick. Not trusted for display; see
    /// [`crate::lifecycle::LifecycleEvaluator::report`].
    #[serde(default)]
    pub winner: Option<CandidateTally>,
}

impl ElectionResult {
    /// The `(candidate, votes)` pairs in the order the backend listed them.
    pub fn vote_counts(&self) -> impl Iterator<Item = (CandidateId, i64)> + '_ {
        self.candidate_results
            .iter()
            .map(|tally| (tally.candidate_id, tally.vote_count))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn decodes_admin_results() {
        let result: ElectionResult = serde_json::from_value(json!({
            "electionId": 7,
            "title": "Student Council 2024",
            "startDate": "2024-06-01T09:00:00",
            "endDate": "2024-06-01T11:00:00",
            "totalVotes": 3,
            "candidateResults": [
                {
                    "candidateId": 1, "candidateName": "Asha Verma", "partyName": "People's Alliance",
                    "candidatePhoto": null, "partyLogo": "AAEC", "voteCount": 2,
                    "percentage": 66.66666666666667, "candidateBio": "Councillor",
                    "electionId": 7, "partyId": 1
                },
                {
                    "candidateId": 2, "candidateName": "Rohan Iyer", "partyName": "Progressive Union",
                    "voteCount": 1, "percentage": 33.333333333333336
                }
            ],
            "winner": null
        }))
        .unwrap();
        assert_eq!(result.candidate_results.len(), 2);
        assert_eq!(result.candidate_results[0].party_id, Some(1));
        assert_eq!(
            result.candidate_results[0].party_logo.as_ref().map(Image::len),
            Some(3)
        );
        assert_eq!(result.vote_counts().collect::<Vec<_>>(), vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn voter_results_omit_admin_fields() {
        let json = serde_json::to_value(ElectionResult::example()).unwrap();
        let first = &json["candidateResults"][0];
        assert!(first.get("candidateBio").is_none());
        assert!(first.get("partyId").is_none());
        assert_eq!(json["startDate"], "2024-06-01T09:00:00");
        assert_eq!(json["winner"]["candidateId"], 2);
    }
}
