use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use tracing::debug;

use crate::error::StoreError;
use crate::models::{Meal, Recipe, RecipeIndex};
use crate::remote::RemoteRecipe;

/// Local mirror of the remote recipe box.
///
/// The connection sits behind a mutex so a `Database` can be shared by
/// reference with the sync engine on a multi-threaded runtime. Every write
/// is a single short statement or transaction; the lock is never held
/// across a fetch.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        debug!("opening database {}", path.display());
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Lock)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS recipe_index (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    uid TEXT NOT NULL UNIQUE,
                    hash TEXT NOT NULL,
                    last_update TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS recipes (
                    id INTEGER PRIMARY KEY REFERENCES recipe_index(id),
                    name TEXT NOT NULL,
                    data TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS meals (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    uid TEXT NOT NULL UNIQUE,
                    recipe_uid TEXT,
                    recipe_name TEXT,
                    meal_date TEXT,
                    meal_order INTEGER,
                    meal_type INTEGER
                );

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    // --- Row mapping helpers ---

    fn index_from_row(row: &rusqlite::Row) -> rusqlite::Result<RecipeIndex> {
        Ok(RecipeIndex {
            id: row.get(0)?,
            uid: row.get(1)?,
            hash: row.get(2)?,
            last_update: row.get(3)?,
        })
    }

    // Expects columns: 0: r.id, 1: i.uid, 2: r.name, 3: r.data
    fn recipe_from_row(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
        let raw: String = row.get(3)?;
        let data = serde_json::from_str(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Recipe {
            id: row.get(0)?,
            uid: row.get(1)?,
            name: row.get(2)?,
            data,
        })
    }

    fn meal_from_row(row: &rusqlite::Row) -> rusqlite::Result<Meal> {
        Ok(Meal {
            id: row.get(0)?,
            uid: row.get(1)?,
            recipe_uid: row.get(2)?,
            recipe_name: row.get(3)?,
            meal_date: row.get(4)?,
            meal_order: row.get(5)?,
            meal_type: row.get(6)?,
        })
    }

    // --- Index ---

    pub fn get_index_by_uid(&self, uid: &str) -> Result<Option<RecipeIndex>, StoreError> {
        let conn = self.lock()?;
        Self::index_by_uid(&conn, uid)
    }

    fn index_by_uid(conn: &Connection, uid: &str) -> Result<Option<RecipeIndex>, StoreError> {
        let index = conn
            .query_row(
                "SELECT id, uid, hash, last_update FROM recipe_index WHERE uid = ?1",
                params![uid],
                Self::index_from_row,
            )
            .optional()?;
        Ok(index)
    }

    /// Insert an index row, or refresh `hash` and `last_update` in place.
    /// The id is stable across updates, so the recipe keyed by it is never
    /// orphaned.
    pub fn upsert_index(&self, uid: &str, hash: &str) -> Result<RecipeIndex, StoreError> {
        let conn = self.lock()?;
        Self::upsert_index_on(&conn, uid, hash)
    }

    fn upsert_index_on(conn: &Connection, uid: &str, hash: &str) -> Result<RecipeIndex, StoreError> {
        let now = Utc::now().to_rfc3339();
        // Not INSERT OR REPLACE: REPLACE re-inserts under a fresh id.
        conn.execute(
            "INSERT INTO recipe_index (uid, hash, last_update) VALUES (?1, ?2, ?3)
             ON CONFLICT(uid) DO UPDATE SET hash = excluded.hash, last_update = excluded.last_update",
            params![uid, hash, now],
        )?;
        let index = conn.query_row(
            "SELECT id, uid, hash, last_update FROM recipe_index WHERE uid = ?1",
            params![uid],
            Self::index_from_row,
        )?;
        Ok(index)
    }

    // --- Recipes ---

    /// Create or fully overwrite the document owned by `index`. Documents
    /// are never merged field-by-field.
    pub fn upsert_recipe(
        &self,
        index: &RecipeIndex,
        name: &str,
        data: &Value,
    ) -> Result<(), StoreError> {
        let conn = self.lock()?;
        Self::upsert_recipe_on(&conn, index.id, name, data)
    }

    fn upsert_recipe_on(
        conn: &Connection,
        id: i64,
        name: &str,
        data: &Value,
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(data)?;
        conn.execute(
            "INSERT OR REPLACE INTO recipes (id, name, data) VALUES (?1, ?2, ?3)",
            params![id, name, raw],
        )?;
        Ok(())
    }

    /// Apply one fetched recipe: index upsert plus document overwrite in a
    /// single transaction, so the pair can never tear. `name` and `data`
    /// both come from the fresh payload.
    pub fn apply_remote_recipe(&self, recipe: &RemoteRecipe) -> Result<RecipeIndex, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let index = Self::upsert_index_on(&tx, &recipe.uid, &recipe.hash)?;
        Self::upsert_recipe_on(&tx, index.id, &recipe.name, &recipe.data)?;
        tx.commit()?;
        Ok(index)
    }

    // --- Queries ---

    pub fn all(&self) -> Result<Vec<Recipe>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT r.id, i.uid, r.name, r.data
             FROM recipes r JOIN recipe_index i ON i.id = r.id
             ORDER BY r.id",
        )?;
        let recipes = stmt
            .query_map([], Self::recipe_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Recipe, StoreError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT r.id, i.uid, r.name, r.data
             FROM recipes r JOIN recipe_index i ON i.id = r.id
             WHERE r.id = ?1",
            params![id],
            Self::recipe_from_row,
        )
        .optional()?
        .ok_or(StoreError::NotFound { id })
    }

    /// Case-sensitive substring match on the recipe name. `instr` rather
    /// than `LIKE`: LIKE is case-insensitive for ASCII and would need
    /// wildcard escaping.
    pub fn search_by_name(&self, query: &str) -> Result<Vec<Recipe>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT r.id, i.uid, r.name, r.data
             FROM recipes r JOIN recipe_index i ON i.id = r.id
             WHERE instr(r.name, ?1) > 0
             ORDER BY r.id",
        )?;
        let recipes = stmt
            .query_map(params![query], Self::recipe_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    // --- Meals ---

    pub fn meals(&self) -> Result<Vec<Meal>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, uid, recipe_uid, recipe_name, meal_date, meal_order, meal_type
             FROM meals ORDER BY meal_date, meal_order",
        )?;
        let meals = stmt
            .query_map([], Self::meal_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(meals)
    }
}
