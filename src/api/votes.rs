use log::info;

use crate::error::Result;
use crate::model::api::{Election, VoteReceipt, VoteRequest};
use crate::model::common::{CandidateId, ElectionId, Role};

use super::ApiClient;

impl ApiClient {
    /// Cast the signed-in voter's ballot. The backend refuses a second
    /// ballot in the same election.
    pub async fn cast_vote(&self, election: ElectionId, candidate: CandidateId) -> Result<VoteReceipt> {
        let voter_id = self.require(Role::Voter)?.voter_id()?;
        let request = VoteRequest {
            voter_id: voter_id.to_string(),
            candidate_id: candidate,
            election_id: election,
        };
        let receipt: VoteReceipt = self.post(&["votes"], &request).await?;
        info!("Vote {} cast in election {election}", receipt.id);
        Ok(receipt)
    }

    /// Elections the signed-in voter has already cast a ballot in.
    pub async fn participated_elections(&self) -> Result<Vec<Election>> {
        let voter_id = self.require(Role::Voter)?.voter_id()?;
        self.get(&["votes", "voter", voter_id, "participated-elections"])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::error::Error;

    #[api_test(voter)]
    async fn vote_uses_session_voter_id(server: MockServer, client: ApiClient) {
        Mock::given(method("POST"))
            .and(path("/api/votes"))
            .and(body_json(json!({ "voterId": "VTR-1001", "candidateId": 2, "electionId": 7 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 31,
                "castAt": "2024-06-01T10:15:00",
                "candidate": null,
                "election": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = client.cast_vote(7, 2).await.unwrap();
        assert_eq!(receipt.id, 31);
        assert!(receipt.cast_at.is_some());
    }

    #[api_test(voter)]
    async fn second_vote_refused(server: MockServer, client: ApiClient) {
        Mock::given(method("POST"))
            .and(path("/api/votes"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "message": "Voter has already voted in this election" })),
            )
            .mount(&server)
            .await;

        assert!(matches!(
            client.cast_vote(7, 2).await,
            Err(Error::Server { status: 500, message }) if message.contains("already voted")
        ));
    }

    #[api_test(voter)]
    async fn participated(server: MockServer, client: ApiClient) {
        Mock::given(method("GET"))
            .and(path("/api/votes/voter/VTR-1001/participated-elections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![Election::past_example()]))
            .mount(&server)
            .await;

        let elections = client.participated_elections().await.unwrap();
        assert_eq!(elections[0].title, "Panchayat Election");
    }

    #[api_test(admin)]
    async fn admins_cannot_vote(server: MockServer, client: ApiClient) {
        assert!(matches!(
            client.cast_vote(7, 2).await,
            Err(Error::Unauthorized(_))
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
