//! Persistence boundary for recipes and cook-mode progress.
//!
//! The server implements [`ProgressStore`] over Postgres; [`MemoryStore`] is
//! used in tests and anywhere a throwaway store is enough.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::progress::RecipeProgress;
use crate::recipe::Recipe;

/// Saves are plain overwrites: whichever session writes last wins.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn load_recipe(&self, recipe_id: Uuid) -> Result<Option<Recipe>, StoreError>;

    async fn load_progress(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<Option<RecipeProgress>, StoreError>;

    async fn save_progress(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
        progress: &RecipeProgress,
    ) -> Result<(), StoreError>;
}

/// In-memory store. Saves can be made to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: RwLock<HashMap<Uuid, Recipe>>,
    progress: RwLock<HashMap<(Uuid, Uuid), RecipeProgress>>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipe(recipe: Recipe) -> Self {
        Self {
            recipes: RwLock::new(HashMap::from([(recipe.id, recipe)])),
            ..Self::default()
        }
    }

    pub fn insert_recipe(&self, recipe: Recipe) -> Result<(), StoreError> {
        let mut recipes = self.recipes.write().map_err(poisoned)?;
        recipes.insert(recipe.id, recipe);
        Ok(())
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    pub fn stored_progress(&self, user_id: Uuid, recipe_id: Uuid) -> Option<RecipeProgress> {
        self.progress
            .read()
            .ok()
            .and_then(|p| p.get(&(user_id, recipe_id)).cloned())
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("memory store lock poisoned".to_string())
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn load_recipe(&self, recipe_id: Uuid) -> Result<Option<Recipe>, StoreError> {
        let recipes = self.recipes.read().map_err(poisoned)?;
        Ok(recipes.get(&recipe_id).cloned())
    }

    async fn load_progress(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<Option<RecipeProgress>, StoreError> {
        let progress = self.progress.read().map_err(poisoned)?;
        Ok(progress.get(&(user_id, recipe_id)).cloned())
    }

    async fn save_progress(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
        progress: &RecipeProgress,
    ) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("saves disabled".to_string()));
        }
        let mut stored = self.progress.write().map_err(poisoned)?;
        stored.insert((user_id, recipe_id), progress.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_insert_recipe_makes_it_loadable() {
        let store = MemoryStore::new();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            title: "Toast".to_string(),
            ingredients: vec![],
            steps: vec![],
        };
        store.insert_recipe(recipe.clone()).unwrap();

        let loaded = store.load_recipe(recipe.id).await.unwrap();
        assert_eq!(loaded, Some(recipe));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = MemoryStore::new();
        let (user, recipe) = (Uuid::new_v4(), Uuid::new_v4());

        let mut first = RecipeProgress::new(Utc::now());
        first.ingredient_checked_ids.insert("a".to_string());
        let second = RecipeProgress::new(Utc::now());

        store.save_progress(user, recipe, &first).await.unwrap();
        store.save_progress(user, recipe, &second).await.unwrap();

        let loaded = store.load_progress(user, recipe).await.unwrap().unwrap();
        assert_eq!(loaded, second);
        assert_eq!(store.save_count(), 2);
    }

    #[tokio::test]
    async fn test_progress_is_per_user() {
        let store = MemoryStore::new();
        let recipe = Uuid::new_v4();
        store
            .save_progress(Uuid::new_v4(), recipe, &RecipeProgress::new(Utc::now()))
            .await
            .unwrap();
        assert!(store
            .load_progress(Uuid::new_v4(), recipe)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_failing_saves() {
        let store = MemoryStore::new();
        store.set_fail_saves(true);
        let result = store
            .save_progress(Uuid::new_v4(), Uuid::new_v4(), &RecipeProgress::new(Utc::now()))
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.save_count(), 0);
    }
}
