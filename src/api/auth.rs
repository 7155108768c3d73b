use log::info;

use crate::error::{Error, Result};
use crate::model::api::{AuthResponse, Credentials, User, UserSpec};
use crate::session::Session;

use super::ApiClient;

impl ApiClient {
    /// Sign in. The new session replaces any attached to this client and is
    /// returned so the caller can persist it.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<Session> {
        if credentials.email.trim().is_empty() {
            return Err(Error::invalid("email", "email must not be empty"));
        }
        if credentials.password.is_empty() {
            return Err(Error::invalid("password", "password must not be empty"));
        }

        self.session = None;
        let auth: AuthResponse = self.post(&["auth", "login"], credentials).await?;
        let session = Session::from(auth);
        info!(
            "Signed in as {} ({})",
            session.email().unwrap_or(&credentials.email),
            session.role()
        );
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Create an account. Open to anyone.
    pub async fn register(&self, user: &UserSpec) -> Result<User> {
        user.validate()?;
        self.post(&["users", "register"], user).await
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

    use crate::model::common::Role;

    #[api_test]
    async fn login_attaches_session(server: MockServer, mut client: ApiClient) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "email": "priya@example.org", "password": "correct horse" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "opaque-token",
                "role": "VOTER",
                "voterId": "VTR-1001",
                "username": "priya",
                "email": "priya@example.org"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = client.login(&Credentials::example()).await.unwrap();
        assert_eq!(session.role(), Role::Voter);
        assert_eq!(session.voter_id().unwrap(), "VTR-1001");
        assert_eq!(client.session(), Some(&session));
    }

    #[api_test(admin)]
    async fn failed_login_signs_out(server: MockServer, mut client: ApiClient) {
        Mock::given(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        assert!(matches!(
            client.login(&Credentials::example()).await,
            Err(Error::Unauthorized(_))
        ));
        assert_eq!(client.session(), None);
    }

    #[api_test]
    async fn empty_credentials_rejected_locally(server: MockServer, mut client: ApiClient) {
        let credentials = Credentials {
            email: " ".into(),
            password: "x".into(),
        };
        assert!(matches!(
            client.login(&credentials).await,
            Err(Error::InvalidInput { field, .. }) if field == "email"
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[api_test]
    async fn register_voter(server: MockServer, client: ApiClient) {
        Mock::given(method("POST"))
            .and(path("/api/users/register"))
            .and(body_json(serde_json::to_value(UserSpec::example()).unwrap()))
            .respond_with(ResponseTemplate::new(200).set_body_json(User::example_voter()))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(
            client.register(&UserSpec::example()).await.unwrap(),
            User::example_voter()
        );

        let mut bad = UserSpec::example();
        bad.voter_id = None;
        assert!(matches!(
            client.register(&bad).await,
            Err(Error::InvalidInput { .. })
        ));
    }
}
