use serde::Serialize;
use serde_json::Value;

/// One row of the local mirror of the remote index: the stable identity
/// (`uid`) plus the hash used for change detection. `last_update` is
/// rewritten whenever the stored hash is.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeIndex {
    pub id: i64,
    pub uid: String,
    pub hash: String,
    pub last_update: String,
}

/// A cached recipe document. Shares its `id` with the owning `RecipeIndex`
/// row (1:1). `data` is the remote payload verbatim; `name` is denormalized
/// out of it for queries and display.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: i64,
    pub uid: String,
    pub name: String,
    pub data: Value,
}

/// A meal-plan slot. The table and model exist for the meal-plan endpoint,
/// but no sync path writes them yet.
#[derive(Debug, Clone, Serialize)]
pub struct Meal {
    pub id: i64,
    pub uid: String,
    pub recipe_uid: Option<String>,
    pub recipe_name: Option<String>,
    pub meal_date: Option<String>,
    pub meal_order: Option<i64>,
    pub meal_type: Option<i64>,
}
