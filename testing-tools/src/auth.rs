use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub username: String,
    pub password: String,
}

impl UserCredentials {
    pub fn parse(input: &str) -> Result<Self> {
        match input.split_once(':') {
            Some((username, password)) if !username.is_empty() && !password.is_empty() => {
                Ok(Self {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
            _ => anyhow::bail!("Invalid credentials format. Expected username:password"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub token: String,
    pub credentials: UserCredentials,
}

impl AuthenticatedUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    data: Jwt,
}

#[derive(Debug, Deserialize)]
struct Jwt {
    token: String,
    sub: String,
}

pub async fn login(
    client: &Client,
    base_url: &str,
    credentials: &UserCredentials,
) -> Result<AuthenticatedUser> {
    let url = format!("{}/api/login", base_url);

    let response = client
        .post(&url)
        .json(&LoginRequest {
            username: &credentials.username,
            password: &credentials.password,
        })
        .send()
        .await
        .context("Failed to send login request")?;

    if !response.status().is_success() {
        anyhow::bail!("Login failed: {}", response.status());
    }

    let login_response: LoginResponse = response
        .json()
        .await
        .context("Failed to parse login response")?;

    Ok(AuthenticatedUser {
        user_id: login_response.data.sub,
        token: login_response.data.token,
        credentials: credentials.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_split_on_the_first_colon() {
        let creds = UserCredentials::parse("ada:pass:word").unwrap();
        assert_eq!(creds.username, "ada");
        assert_eq!(creds.password, "pass:word");
    }

    #[test]
    fn credentials_without_both_parts_are_rejected() {
        assert!(UserCredentials::parse("ada").is_err());
        assert!(UserCredentials::parse(":password").is_err());
        assert!(UserCredentials::parse("ada:").is_err());
    }
}
