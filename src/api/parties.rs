use crate::error::Result;
use crate::model::api::{Party, PartySpec};
use crate::model::common::{PartyId, Role};

use super::ApiClient;

impl ApiClient {
    pub async fn parties(&self) -> Result<Vec<Party>> {
        self.signed_in()?;
        self.get(&["parties"]).await
    }

    pub async fn create_party(&self, spec: &PartySpec) -> Result<Party> {
        self.require(Role::Admin)?;
        spec.validate()?;
        self.post(&["parties"], spec).await
    }

    pub async fn update_party(&self, id: PartyId, spec: &PartySpec) -> Result<Party> {
        self.require(Role::Admin)?;
        spec.validate()?;
        self.put(&["parties", &id.to_string()], spec).await
    }

    pub async fn delete_party(&self, id: PartyId) -> Result<()> {
        self.require(Role::Admin)?;
        self.delete(&["parties", &id.to_string()]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::error::Error;

    #[api_test(admin)]
    async fn party_lifecycle(server: MockServer, client: ApiClient) {
        Mock::given(method("GET"))
            .and(path("/api/parties"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(vec![Party::example1(), Party::example2()]),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/parties"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Party::example2()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/parties/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Party::example2()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/parties/2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Party deleted"))
            .expect(1)
            .mount(&server)
            .await;

        let parties = client.parties().await.unwrap();
        assert_eq!(parties[1].logo.as_ref().map(|logo| logo.len()), Some(3));

        let created = client.create_party(&PartySpec::example()).await.unwrap();
        client.update_party(created.id, &PartySpec::example()).await.unwrap();
        client.delete_party(created.id).await.unwrap();
    }

    #[api_test(voter)]
    async fn voters_cannot_edit(server: MockServer, client: ApiClient) {
        assert!(matches!(
            client.create_party(&PartySpec::example()).await,
            Err(Error::Unauthorized(_))
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
