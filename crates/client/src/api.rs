use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::models::*;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

/// Thin wrapper over the backend's REST routes.
///
/// Every call is a single request: a transport error or a non-2xx status
/// is returned as an error and never retried.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `BACKEND_URL` from the environment, falling back to localhost.
    pub fn from_env() -> Self {
        let url = std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        Self::new(url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let response = self.http.get(self.url(path)).send().await?;
        decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    pub async fn health(&self) -> anyhow::Result<Health> {
        self.get("/health").await
    }

    // ----- Users -----

    pub async fn create_user(
        &self,
        username: &str,
        guiding_values: Vec<String>,
    ) -> anyhow::Result<User> {
        let req = CreateUserRequest {
            username: username.to_string(),
            guiding_values,
        };
        self.post("/users", &req).await
    }

    pub async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        self.get("/users").await
    }

    pub async fn get_user(&self, id: &str) -> anyhow::Result<User> {
        self.get(&format!("/users/{id}")).await
    }

    // ----- Elements -----

    pub async fn create_element(
        &self,
        title: &str,
        element_type: Option<&str>,
    ) -> anyhow::Result<Element> {
        let req = CreateElementRequest {
            title: title.to_string(),
            element_type: element_type.map(str::to_string),
        };
        self.post("/elements", &req).await
    }

    pub async fn list_elements(&self) -> anyhow::Result<Vec<Element>> {
        self.get("/elements").await
    }

    pub async fn get_element(&self, id: &str) -> anyhow::Result<Element> {
        self.get(&format!("/elements/{id}")).await
    }

    pub async fn search_elements(&self, query: &str) -> anyhow::Result<Vec<Element>> {
        let response = self
            .http
            .get(self.url("/elements/search"))
            .query(&[("query", query)])
            .send()
            .await?;
        decode(response).await
    }

    pub async fn link_elements(&self, first: &str, second: &str) -> anyhow::Result<String> {
        let req = LinkRequest {
            element_id_1: first.to_string(),
            element_id_2: second.to_string(),
        };
        let message: Message = self.post("/elements/link", &req).await?;
        Ok(message.message)
    }

    // ----- Actions -----

    pub async fn create_action(&self, req: &CreateActionRequest) -> anyhow::Result<Action> {
        self.post("/actions", req).await
    }

    pub async fn list_actions(&self) -> anyhow::Result<Vec<Action>> {
        self.get("/actions").await
    }

    pub async fn get_action(&self, id: &str) -> anyhow::Result<Action> {
        self.get(&format!("/actions/{id}")).await
    }

    pub async fn vote(&self, action_id: &str, user_id: &str, value: i64) -> anyhow::Result<Vote> {
        let req = VoteRequest {
            user_id: user_id.to_string(),
            value,
        };
        self.post(&format!("/actions/{action_id}/vote"), &req).await
    }

    pub async fn decision(&self, action_id: &str) -> anyhow::Result<Decision> {
        self.get(&format!("/decisions/{action_id}")).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> anyhow::Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await?;
        anyhow::bail!("API error ({}): {}", status, text);
    }

    Ok(response.json().await?)
}
