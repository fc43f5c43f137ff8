use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::RemoteError;

/// Wire envelope: every sync API response wraps its payload in
/// `{"result": ...}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub result: T,
}

/// One entry of the remote recipe index. Listings carry more fields than
/// these two, but only the identity and the change hash are consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRecipeSummary {
    pub uid: String,
    pub hash: String,
}

/// A fully fetched recipe with the fields the store needs pulled out.
/// `data` keeps the payload verbatim, including the extracted fields.
#[derive(Debug, Clone)]
pub struct RemoteRecipe {
    pub uid: String,
    pub hash: String,
    pub name: String,
    pub data: Value,
}

impl RemoteRecipe {
    /// Extract identity, hash, and name from a raw recipe payload.
    pub fn from_value(data: Value) -> Result<Self, String> {
        let uid = required_str(&data, "uid")?;
        let hash = required_str(&data, "hash")?;
        let name = required_str(&data, "name")?;
        Ok(Self {
            uid,
            hash,
            name,
            data,
        })
    }
}

fn required_str(data: &Value, field: &str) -> Result<String, String> {
    data.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| format!("recipe payload has no string field `{field}`"))
}

/// A remote recipe box.
///
/// The CLI implements this with reqwest against the Paprika sync API; tests
/// implement it in-process. The sync engine only ever talks to this trait.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// The full remote index of `{uid, hash}` pairs.
    async fn list_recipes(&self) -> Result<Vec<RemoteRecipeSummary>, RemoteError>;

    /// One full recipe document by uid.
    async fn fetch_recipe(&self, uid: &str) -> Result<RemoteRecipe, RemoteError>;

    /// The remote meal plan, returned as raw JSON objects (the payload
    /// shape is not part of the sync contract).
    async fn list_meals(&self) -> Result<Vec<Value>, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_listing_envelope() {
        let body = r#"{"result": [
            {"uid": "abc-123", "hash": "deadbeef", "name": "Shakshuka", "photo_url": null},
            {"uid": "def-456", "hash": "cafef00d"}
        ]}"#;
        let listing: Envelope<Vec<RemoteRecipeSummary>> = serde_json::from_str(body).unwrap();
        assert_eq!(listing.result.len(), 2);
        assert_eq!(listing.result[0].uid, "abc-123");
        assert_eq!(listing.result[0].hash, "deadbeef");
        assert_eq!(listing.result[1].uid, "def-456");
    }

    #[test]
    fn test_listing_entry_missing_hash_is_an_error() {
        let body = r#"{"result": [{"uid": "abc-123"}]}"#;
        let listing: Result<Envelope<Vec<RemoteRecipeSummary>>, _> = serde_json::from_str(body);
        assert!(listing.is_err());
    }

    #[test]
    fn test_remote_recipe_from_value() {
        let payload = json!({
            "uid": "abc-123",
            "hash": "deadbeef",
            "name": "Shakshuka",
            "ingredients": "4 eggs\n1 can crushed tomatoes",
            "rating": 5
        });
        let recipe = RemoteRecipe::from_value(payload).unwrap();
        assert_eq!(recipe.uid, "abc-123");
        assert_eq!(recipe.hash, "deadbeef");
        assert_eq!(recipe.name, "Shakshuka");
        // The whole payload is retained, extracted fields included
        assert_eq!(recipe.data["rating"], 5);
        assert_eq!(recipe.data["name"], "Shakshuka");
    }

    #[test]
    fn test_remote_recipe_missing_field() {
        let payload = json!({ "uid": "abc-123", "name": "No Hash" });
        let err = RemoteRecipe::from_value(payload).unwrap_err();
        assert!(err.contains("hash"));
    }

    #[test]
    fn test_remote_recipe_non_string_name() {
        let payload = json!({ "uid": "abc-123", "hash": "deadbeef", "name": 7 });
        assert!(RemoteRecipe::from_value(payload).is_err());
    }
}
