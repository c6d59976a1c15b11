//! Thin HTTP client for the Hearth server API.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use hearth_core::{ActionOutcome, CookAction, CookView, NewRecipe, Recipe, SaveStatus};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub ingredient_count: usize,
    pub step_count: usize,
}

#[derive(Debug, Deserialize)]
struct ListRecipesResponse {
    recipes: Vec<RecipeSummary>,
}

#[derive(Debug, Deserialize)]
struct CreateRecipeResponse {
    id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookActionResponse {
    pub state: CookView,
    #[serde(flatten)]
    pub outcome: ActionOutcome,
    pub save: SaveStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    confirmation_required: bool,
}

/// Server's answer to a cook action.
#[derive(Debug, Clone)]
pub enum CookReply {
    Applied(CookActionResponse),
    /// A gate blocked the action; nothing was saved
    Rejected {
        message: String,
        confirmation_required: bool,
    },
}

pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(server: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: server.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(server: &str, token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..Self::new(server)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        self.authed(builder)
            .send()
            .await
            .with_context(|| format!("Failed to reach server at {}", self.base))
    }

    pub async fn signup(&self, username: &str, password: &str) -> Result<SessionResponse> {
        let response = self
            .send(
                self.http
                    .post(self.url("/api/auth/signup"))
                    .json(&Credentials { username, password }),
            )
            .await?;
        read_json(response).await.context("Signup failed")
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<SessionResponse> {
        let response = self
            .send(
                self.http
                    .post(self.url("/api/auth/login"))
                    .json(&Credentials { username, password }),
            )
            .await?;
        read_json(response).await.context("Login failed")
    }

    pub async fn logout(&self) -> Result<()> {
        let response = self
            .send(self.http.post(self.url("/api/auth/logout")))
            .await?;
        expect_success(response).await.context("Logout failed")
    }

    pub async fn list_recipes(&self) -> Result<Vec<RecipeSummary>> {
        let response = self.send(self.http.get(self.url("/api/recipes"))).await?;
        let list: ListRecipesResponse = read_json(response)
            .await
            .context("Failed to list recipes")?;
        Ok(list.recipes)
    }

    pub async fn get_recipe(&self, id: Uuid) -> Result<Recipe> {
        let response = self
            .send(self.http.get(self.url(&format!("/api/recipes/{}", id))))
            .await?;
        read_json(response)
            .await
            .with_context(|| format!("Failed to fetch recipe {}", id))
    }

    pub async fn create_recipe(&self, recipe: &NewRecipe) -> Result<Uuid> {
        let response = self
            .send(self.http.post(self.url("/api/recipes")).json(recipe))
            .await?;
        let created: CreateRecipeResponse = read_json(response)
            .await
            .context("Failed to create recipe")?;
        Ok(created.id)
    }

    pub async fn cook_state(&self, recipe_id: Uuid) -> Result<CookView> {
        let response = self
            .send(
                self.http
                    .get(self.url(&format!("/api/recipes/{}/cook", recipe_id))),
            )
            .await?;
        read_json(response)
            .await
            .context("Failed to load cook progress")
    }

    pub async fn cook_action(&self, recipe_id: Uuid, action: &CookAction) -> Result<CookReply> {
        let response = self
            .send(
                self.http
                    .post(self.url(&format!("/api/recipes/{}/cook", recipe_id)))
                    .json(action),
            )
            .await?;

        if response.status() == StatusCode::CONFLICT {
            let body: ErrorBody = response
                .json()
                .await
                .context("Failed to parse rejection")?;
            return Ok(CookReply::Rejected {
                message: body.error,
                confirmation_required: body.confirmation_required,
            });
        }

        let applied = read_json(response)
            .await
            .with_context(|| format!("Cook action {} failed", action.name()))?;
        Ok(CookReply::Applied(applied))
    }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn error_for(response: Response) -> anyhow::Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);
    anyhow::anyhow!("{} ({})", message, status)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    if !response.status().is_success() {
        return Err(error_for(response).await);
    }
    response
        .json()
        .await
        .context("Failed to parse server response")
}

async fn expect_success(response: Response) -> Result<()> {
    if !response.status().is_success() {
        return Err(error_for(response).await);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(
            client.url("/api/recipes"),
            "http://localhost:3000/api/recipes"
        );
    }

    #[test]
    fn test_action_response_flattens_outcome() {
        let body = serde_json::json!({
            "state": {
                "recipe_id": Uuid::nil(),
                "title": "Tea",
                "position": {"phase": "completed"},
                "current_step_index": 1,
                "step_count": 1,
                "ingredients": [],
                "steps": [],
                "updated_at": "2024-06-01T12:00:00Z"
            },
            "transition": {
                "from": {"phase": "step", "index": 0},
                "to": {"phase": "completed"},
                "celebrate": true
            },
            "save": {"status": "not_saved", "error": "Store unavailable: timeout"}
        });

        let response: CookActionResponse = serde_json::from_value(body).unwrap();
        assert!(response.outcome.transition.is_some_and(|t| t.celebrate));
        assert!(response.outcome.expired_timers.is_empty());
        assert!(!response.save.is_saved());
    }
}
