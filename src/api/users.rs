use crate::error::Result;
use crate::model::api::{User, UserSpec};
use crate::model::common::{Role, UserId};

use super::ApiClient;

/// Account management. Admin only.
impl ApiClient {
    pub async fn users(&self) -> Result<Vec<User>> {
        self.require(Role::Admin)?;
        self.get(&["users"]).await
    }

    pub async fn user(&self, id: UserId) -> Result<User> {
        self.require(Role::Admin)?;
        self.get(&["users", &id.to_string()]).await
    }

    pub async fn user_by_email(&self, email: &str) -> Result<User> {
        self.require(Role::Admin)?;
        self.get(&["users", "email", email]).await
    }

    /// Replace the account registered under `email`.
    pub async fn update_user(&self, email: &str, user: &UserSpec) -> Result<User> {
        self.require(Role::Admin)?;
        user.validate()?;
        self.put(&["users", email], user).await
    }

    pub async fn delete_user(&self, email: &str) -> Result<()> {
        self.require(Role::Admin)?;
        self.delete(&["users", "delete", email]).await
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
    async fn list_and_find(server: MockServer, client: ApiClient) {
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(vec![User::example_admin(), User::example_voter()]),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/users/email/priya@example.org"))
            .respond_with(ResponseTemplate::new(200).set_body_json(User::example_voter()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/users/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(User::example_admin()))
            .mount(&server)
            .await;

        assert_eq!(client.users().await.unwrap().len(), 2);
        assert_eq!(
            client.user_by_email("priya@example.org").await.unwrap(),
            User::example_voter()
        );
        assert_eq!(client.user(1).await.unwrap().role, Role::Admin);
    }

    #[api_test(admin)]
    async fn update_and_delete(server: MockServer, client: ApiClient) {
        Mock::given(method("PUT"))
            .and(path("/api/users/priya@example.org"))
            .respond_with(ResponseTemplate::new(200).set_body_json(User::example_voter()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/delete/priya@example.org"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User deleted successfully"))
            .expect(1)
            .mount(&server)
            .await;

        client
            .update_user("priya@example.org", &UserSpec::example())
            .await
            .unwrap();
        client.delete_user("priya@example.org").await.unwrap();
    }

    #[api_test(voter)]
    async fn voters_cannot_manage_users(server: MockServer, client: ApiClient) {
        assert!(matches!(client.users().await, Err(Error::Unauthorized(_))));
        assert!(matches!(
            client.delete_user("officer@example.org").await,
            Err(Error::Unauthorized(_))
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
