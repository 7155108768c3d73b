//! Typed client for the election backend's REST API.
//!
//! Every operation checks the attached [`Session`]'s role locally before any
//! request is made, so a voter asking for admin data fails with
//! [`Error::Unauthorized`] without touching the network.

use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, Method, Url,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{log_request, log_response};
use crate::model::common::Role;
use crate::session::Session;

mod auth;
mod candidates;
mod dashboard;
mod elections;
mod parties;
mod results;
mod users;
mod voters;
mod votes;

pub use dashboard::Dashboard;

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    /// Always ends in `/`.
    base_url: Url,
    session: Option<Session>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_url()?,
            session: None,
        })
    }

    /// Send subsequent requests as the holder of `session`.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Forget the current session, returning it.
    pub fn sign_out(&mut self) -> Option<Session> {
        self.session.take()
    }

    fn signed_in(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| Error::Unauthorized("not signed in".into()))
    }

    fn require(&self, role: Role) -> Result<&Session> {
        let session = self.signed_in()?;
        session.require(role)?;
        Ok(session)
    }

    /// The URL of the endpoint at `segments` beneath the base URL. Each
    /// segment is percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::invalid("api_url", "cannot be a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and return the body of a successful response.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<String> {
        let url = self.url(segments)?;
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(session) = &self.session {
            request = request.bearer_auth(session.token());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let id = log_request(&method, &url);
        let response = request.send().await?;
        let status = response.status();
        log_response(id, status, &url);

        let text = response.text().await?;
        if status.is_success() {
            Ok(text)
        } else {
            Err(Error::from_status(status, text))
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        decode(&self.send::<()>(Method::GET, segments, None).await?)
    }

    async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(&self.send(Method::POST, segments, Some(body)).await?)
    }

    async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(&self.send(Method::PUT, segments, Some(body)).await?)
    }

    /// Deletions answer with a plain-text confirmation, which is discarded.
    async fn delete(&self, segments: &[&str]) -> Result<()> {
        self.send::<()>(Method::DELETE, segments, None).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}
