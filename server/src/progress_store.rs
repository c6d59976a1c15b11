//! Postgres-backed [`ProgressStore`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use hearth_core::{ProgressStore, Recipe, RecipeProgress, StoreError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{CookProgressRow, RecipeRow};
use crate::schema::{cook_progress, recipes};

/// Store scoped to one user's recipes. Built per request from the
/// authenticated user.
pub struct PgProgressStore {
    pool: Arc<DbPool>,
    owner: Uuid,
}

impl PgProgressStore {
    pub fn new(pool: Arc<DbPool>, owner: Uuid) -> Self {
        Self { pool, owner }
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>, StoreError>
    {
        self.pool
            .get()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

fn backend(e: diesel::result::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn load_recipe(&self, recipe_id: Uuid) -> Result<Option<Recipe>, StoreError> {
        let mut conn = self.conn()?;

        let row: Option<RecipeRow> = recipes::table
            .filter(recipes::id.eq(recipe_id))
            .filter(recipes::user_id.eq(self.owner))
            .filter(recipes::deleted_at.is_null())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(backend)?;

        row.map(RecipeRow::into_recipe)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn load_progress(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<Option<RecipeProgress>, StoreError> {
        let mut conn = self.conn()?;

        let stored: Option<serde_json::Value> = cook_progress::table
            .filter(cook_progress::user_id.eq(user_id))
            .filter(cook_progress::recipe_id.eq(recipe_id))
            .select(cook_progress::progress)
            .first(&mut conn)
            .optional()
            .map_err(backend)?;

        Ok(stored.map(serde_json::from_value).transpose()?)
    }

    /// Last write wins: the row is overwritten whole.
    async fn save_progress(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
        progress: &RecipeProgress,
    ) -> Result<(), StoreError> {
        let row = CookProgressRow {
            user_id,
            recipe_id,
            progress: serde_json::to_value(progress)?,
            updated_at: Utc::now(),
        };

        let mut conn = self.conn()?;

        diesel::insert_into(cook_progress::table)
            .values(&row)
            .on_conflict((cook_progress::user_id, cook_progress::recipe_id))
            .do_update()
            .set((
                cook_progress::progress.eq(excluded(cook_progress::progress)),
                cook_progress::updated_at.eq(excluded(cook_progress::updated_at)),
            ))
            .execute(&mut conn)
            .map_err(backend)?;

        Ok(())
    }
}
