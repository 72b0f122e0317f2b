use anyhow::{Context, Result};
use reqwest::{Client, Method};
use serde_json::{json, Value};

use crate::auth::AuthenticatedUser;

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub async fn create_board(&self, user: &AuthenticatedUser, name: &str) -> Result<Value> {
        self.send(user, Method::POST, "/api/board", Some(json!({ "name": name })))
            .await
    }

    pub async fn open_board(&self, user: &AuthenticatedUser, board_id: &str) -> Result<Value> {
        self.send(user, Method::GET, &format!("/api/boards/{board_id}"), None)
            .await
    }

    pub async fn create_column(
        &self,
        user: &AuthenticatedUser,
        board_id: &str,
        name: &str,
    ) -> Result<Value> {
        self.send(
            user,
            Method::POST,
            "/api/column",
            Some(json!({ "name": name, "board_id": board_id })),
        )
        .await
    }

    pub async fn rename_column(
        &self,
        user: &AuthenticatedUser,
        column_id: &str,
        name: &str,
    ) -> Result<Value> {
        self.send(
            user,
            Method::PUT,
            &format!("/api/column/{column_id}"),
            Some(json!({ "name": name })),
        )
        .await
    }

    pub async fn create_card(
        &self,
        user: &AuthenticatedUser,
        column_id: &str,
        title: &str,
    ) -> Result<Value> {
        self.send(
            user,
            Method::POST,
            "/api/cards",
            Some(json!({
                "title": title,
                "description": "Created by sse-test-client",
                "column_id": column_id,
            })),
        )
        .await
    }

    pub async fn join_card(&self, user: &AuthenticatedUser, card_id: &str) -> Result<Value> {
        self.send(
            user,
            Method::POST,
            &format!("/api/cards/{card_id}/members"),
            None,
        )
        .await
    }

    pub async fn delete_card(&self, user: &AuthenticatedUser, card_id: &str) -> Result<Value> {
        self.send(user, Method::DELETE, &format!("/api/cards/{card_id}"), None)
            .await
    }

    // Sends an authorized request and unwraps the `data` member of the response envelope.
    async fn send(
        &self,
        user: &AuthenticatedUser,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", user.bearer());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send {method} {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            anyhow::bail!("{method} {path} failed: {status} - Response: {body}");
        }

        let mut api_response: Value = response.json().await.context("Failed to parse response")?;

        Ok(api_response["data"].take())
    }
}
