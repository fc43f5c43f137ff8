use std::path::Path;

use crate::db::Database;
use crate::error::{StoreError, SyncError};
use crate::models::{Meal, Recipe};
use crate::remote::RecipeSource;
use crate::sync::{self, SyncSummary};

/// Search switches accepted by the CLI. Matching is deliberately name-only;
/// both flags parse but change nothing (see [`Pantry::search`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    pub ingredients: bool,
    pub description: bool,
}

/// The query and sync surface the CLI talks to. Owns the store; the remote
/// source is passed in per call.
pub struct Pantry {
    db: Database,
}

impl Pantry {
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let db = Database::open_in_memory()?;
        Ok(Self { db })
    }

    /// Incremental sync against `source` with at most `max_workers`
    /// concurrent downloads.
    pub async fn fetch<S>(&self, source: &S, max_workers: usize) -> Result<SyncSummary, SyncError>
    where
        S: RecipeSource + ?Sized,
    {
        sync::fetch_all(&self.db, source, max_workers).await
    }

    /// Case-sensitive substring search over recipe names. The `ingredients`
    /// and `description` switches exist for CLI compatibility but do not
    /// widen the match; only the name column is consulted.
    pub fn search(&self, query: &str, _options: SearchOptions) -> Result<Vec<Recipe>, StoreError> {
        self.db.search_by_name(query)
    }

    pub fn list(&self) -> Result<Vec<Recipe>, StoreError> {
        self.db.all()
    }

    pub fn get_by_id(&self, id: i64) -> Result<Recipe, StoreError> {
        self.db.get_by_id(id)
    }

    pub fn meals(&self) -> Result<Vec<Meal>, StoreError> {
        self.db.meals()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::error::RemoteError;
    use crate::remote::{RemoteRecipe, RemoteRecipeSummary};

    struct MockSource {
        recipes: Vec<RemoteRecipe>,
    }

    #[async_trait]
    impl RecipeSource for MockSource {
        async fn list_recipes(&self) -> Result<Vec<RemoteRecipeSummary>, RemoteError> {
            Ok(self
                .recipes
                .iter()
                .map(|r| RemoteRecipeSummary {
                    uid: r.uid.clone(),
                    hash: r.hash.clone(),
                })
                .collect())
        }

        async fn fetch_recipe(&self, uid: &str) -> Result<RemoteRecipe, RemoteError> {
            self.recipes
                .iter()
                .find(|r| r.uid == uid)
                .cloned()
                .ok_or_else(|| RemoteError::Status {
                    url: format!("mock://sync/recipe/{uid}/"),
                    status: 404,
                })
        }

        async fn list_meals(&self) -> Result<Vec<Value>, RemoteError> {
            Ok(Vec::new())
        }
    }

    fn sample_recipe(uid: &str, name: &str) -> RemoteRecipe {
        RemoteRecipe {
            uid: uid.to_string(),
            hash: "h1".to_string(),
            name: name.to_string(),
            data: json!({ "uid": uid, "hash": "h1", "name": name }),
        }
    }

    #[tokio::test]
    async fn test_fetch_then_query() {
        let pantry = Pantry::open_in_memory().unwrap();
        let source = MockSource {
            recipes: vec![sample_recipe("a", "Arepas"), sample_recipe("b", "Borscht")],
        };

        let summary = pantry.fetch(&source, 2).await.unwrap();
        assert_eq!(summary.created, 2);

        let all = pantry.list().unwrap();
        assert_eq!(all.len(), 2);

        let found = pantry.search("Bor", SearchOptions::default()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Borscht");

        let recipe = pantry.get_by_id(found[0].id).unwrap();
        assert_eq!(recipe.uid, "b");
    }

    #[tokio::test]
    async fn test_search_flags_do_not_widen_matching() {
        let pantry = Pantry::open_in_memory().unwrap();
        let mut recipe = sample_recipe("a", "Plain Bread");
        recipe.data["ingredients"] = json!("flour\nwater\nsalt");
        let source = MockSource {
            recipes: vec![recipe],
        };
        pantry.fetch(&source, 1).await.unwrap();

        let opts = SearchOptions {
            ingredients: true,
            description: true,
        };
        // An ingredient term never matches, flags or not
        assert!(pantry.search("flour", opts).unwrap().is_empty());
        assert_eq!(pantry.search("Bread", opts).unwrap().len(), 1);
    }

    #[test]
    fn test_get_by_id_missing_is_not_found() {
        let pantry = Pantry::open_in_memory().unwrap();
        let err = pantry.get_by_id(7).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 7 }));
    }

    #[test]
    fn test_meals_start_empty() {
        let pantry = Pantry::open_in_memory().unwrap();
        assert!(pantry.meals().unwrap().is_empty());
    }
}
