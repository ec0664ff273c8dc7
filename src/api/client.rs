use log::{debug, warn};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::error::ApiError;
use crate::api::models::{
    Credentials, Job, JobDraft, LoginResponse, Message, NewMessage, Profile, ProfileDraft,
    Registration, User, UserId, UserUpdate,
};
use crate::conversation::ConversationKey;

pub struct ApiClient {
    http: HttpClient,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            base: Self::base_api(base_url)?,
            token,
        })
    }

    /// Resolves the versioned API root, accepting a bare host, `.../api` or
    /// `.../api/v1`.
    fn base_api(base_url: &str) -> Result<Url, ApiError> {
        let normalized = crate::utils::normalize_url(base_url);
        let trimmed = normalized.trim_end_matches('/');
        let root = if trimmed.ends_with("/api/v1") {
            trimmed.to_string()
        } else if trimmed.ends_with("/api") {
            format!("{}/v1", trimmed)
        } else {
            format!("{}/api/v1", trimmed)
        };
        Url::parse(&root).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base.as_str().trim_end_matches('/'), path.trim_start_matches('/'))
    }

    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    fn require_auth(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
        Ok(req.bearer_auth(token))
    }

    async fn send_raw(&self, req: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            warn!("API responded {}: {}", status, body);
            return Err(ApiError::from_body(status, &body));
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send_raw(req).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        debug!("logging in as {}", email);
        self.send_json(self.http.post(self.endpoint("login")).json(&body)).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.send_raw(self.http.post(self.endpoint("users")).json(registration))
            .await
            .map(|_| ())
    }

    pub async fn jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.send_json(self.with_auth(self.http.get(self.endpoint("jobs")))).await
    }

    /// Jobs posted by one company.
    pub async fn company_jobs(&self, company_id: UserId) -> Result<Vec<Job>, ApiError> {
        let req = self
            .http
            .get(self.endpoint("jobs"))
            .query(&[("company_id", company_id)]);
        self.send_json(self.with_auth(req)).await
    }

    pub async fn job(&self, id: i64) -> Result<Job, ApiError> {
        let req = self.http.get(self.endpoint(&format!("jobs/{}", id)));
        self.send_json(self.with_auth(req)).await
    }

    pub async fn create_job(&self, draft: &JobDraft) -> Result<Job, ApiError> {
        let req = self.require_auth(self.http.post(self.endpoint("jobs")).json(draft))?;
        self.send_json(req).await
    }

    pub async fn update_job(&self, id: i64, draft: &JobDraft) -> Result<Job, ApiError> {
        let req = self.http.put(self.endpoint(&format!("jobs/{}", id))).json(draft);
        self.send_json(self.require_auth(req)?).await
    }

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        let req = self.require_auth(self.http.get(self.endpoint("users")))?;
        self.send_json(req).await
    }

    pub async fn user(&self, id: UserId) -> Result<User, ApiError> {
        let req = self.require_auth(self.http.get(self.endpoint(&format!("users/{}", id))))?;
        self.send_json(req).await
    }

    pub async fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<User, ApiError> {
        let req = self.http.put(self.endpoint(&format!("users/{}", id))).json(update);
        self.send_json(self.require_auth(req)?).await
    }

    pub async fn profile(&self, user_id: UserId) -> Result<Profile, ApiError> {
        let req = self.http.get(self.endpoint(&format!("profiles/{}", user_id)));
        self.send_json(self.with_auth(req)).await
    }

    pub async fn create_profile(
        &self,
        user_id: UserId,
        draft: &ProfileDraft,
    ) -> Result<Profile, ApiError> {
        let req = self
            .http
            .post(self.endpoint(&format!("users/{}/profiles", user_id)))
            .json(draft);
        self.send_json(self.require_auth(req)?).await
    }

    /// Users own a single profile, which the backend addresses as `profiles/1`
    /// under the user.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        draft: &ProfileDraft,
    ) -> Result<Profile, ApiError> {
        let req = self
            .http
            .put(self.endpoint(&format!("users/{}/profiles/1", user_id)))
            .json(draft);
        self.send_json(self.require_auth(req)?).await
    }

    /// Every message the current user sent or received.
    pub async fn messages(&self) -> Result<Vec<Message>, ApiError> {
        let req = self.require_auth(self.http.get(self.endpoint("messages")))?;
        self.send_json(req).await
    }

    pub async fn conversation(&self, key: ConversationKey) -> Result<Vec<Message>, ApiError> {
        let req = self.require_auth(self.http.get(self.endpoint(&format!("messages/{}", key))))?;
        self.send_json(req).await
    }

    pub async fn send_message(&self, message: &NewMessage) -> Result<(), ApiError> {
        let req = self.require_auth(self.http.post(self.endpoint("messages")).json(message))?;
        self.send_raw(req).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_api_accepts_common_forms() {
        for input in [
            "http://localhost:3001",
            "http://localhost:3001/",
            "http://localhost:3001/api",
            "http://localhost:3001/api/v1/",
        ] {
            assert_eq!(
                ApiClient::base_api(input).unwrap().as_str(),
                "http://localhost:3001/api/v1",
                "{input}"
            );
        }
        assert_eq!(
            ApiClient::base_api("jobs.example.com").unwrap().as_str(),
            "https://jobs.example.com/api/v1"
        );
    }

    #[test]
    fn endpoints_join_under_api_root() {
        let client = ApiClient::new("http://localhost:3001", None).unwrap();
        assert_eq!(
            client.endpoint(&format!("messages/{}", ConversationKey::new(9, 2))),
            "http://localhost:3001/api/v1/messages/2-9"
        );
    }

    #[test]
    fn messaging_requires_a_token() {
        let client = ApiClient::new("http://localhost:3001", None).unwrap();
        let req = client.http.get(client.endpoint("messages"));
        assert!(matches!(client.require_auth(req), Err(ApiError::MissingToken)));
    }
}
