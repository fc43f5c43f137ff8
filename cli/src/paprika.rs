use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use pantry_core::error::RemoteError;
use pantry_core::remote::{Envelope, RecipeSource, RemoteRecipe, RemoteRecipeSummary};

/// HTTP client for the Paprika sync API.
///
/// Every request carries Basic auth; responses come wrapped in the
/// `{"result": ...}` envelope, which [`Envelope`] strips.
pub struct PaprikaClient {
    client: reqwest::Client,
    endpoint: String,
    username: String,
    password: String,
}

impl PaprikaClient {
    pub fn new(endpoint: &str, username: &str, password: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!("pantry/{} (recipe sync)", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| RemoteError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl RecipeSource for PaprikaClient {
    async fn list_recipes(&self) -> Result<Vec<RemoteRecipeSummary>, RemoteError> {
        let body: Envelope<Vec<RemoteRecipeSummary>> = self.get_json("sync/recipes/").await?;
        Ok(body.result)
    }

    async fn fetch_recipe(&self, uid: &str) -> Result<RemoteRecipe, RemoteError> {
        let path = format!("sync/recipe/{uid}/");
        let body: Envelope<Value> = self.get_json(&path).await?;
        RemoteRecipe::from_value(body.result).map_err(|message| RemoteError::Decode {
            url: self.url(&path),
            message,
        })
    }

    async fn list_meals(&self) -> Result<Vec<Value>, RemoteError> {
        let body: Envelope<Vec<Value>> = self.get_json("sync/meals/").await?;
        Ok(body.result)
    }
}
