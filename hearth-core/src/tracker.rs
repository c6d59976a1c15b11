//! Ties cook sessions to a [`ProgressStore`].
//!
//! Every accepted action is applied to the in-memory session first and then
//! saved. A failed save does not undo the action; instead the caller gets a
//! [`SaveStatus::NotSaved`] so it can tell the cook and offer to save again.
//! Rejected actions never touch the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::action::{ActionOutcome, CookAction};
use crate::cook::CookSession;
use crate::error::{CookError, TrackerError};
use crate::progress::RecipeProgress;
use crate::recipe::Recipe;
use crate::store::ProgressStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveStatus {
    Saved,
    NotSaved { error: String },
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }
}

/// Result of an accepted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub outcome: ActionOutcome,
    pub save: SaveStatus,
}

pub struct ProgressTracker<S> {
    store: S,
}

impl<S: ProgressStore> ProgressTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn load(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<(Recipe, Option<RecipeProgress>), TrackerError> {
        let recipe = self
            .store
            .load_recipe(recipe_id)
            .await?
            .ok_or(TrackerError::RecipeNotFound(recipe_id))?;
        let stored = self.store.load_progress(user_id, recipe_id).await?;
        Ok((recipe, stored))
    }

    /// Load a recipe and the user's progress on it, deriving the position
    /// from what has been checked and completed.
    pub async fn open(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CookSession, TrackerError> {
        let (recipe, stored) = self.load(user_id, recipe_id).await?;
        tracing::debug!(
            %recipe_id,
            resumed = stored.is_some(),
            "opened cook session"
        );
        Ok(CookSession::start(recipe, stored, now))
    }

    /// Load the session at the position the last saved action left it.
    /// Used for each action after the first load.
    pub async fn resume(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CookSession, TrackerError> {
        let (recipe, stored) = self.load(user_id, recipe_id).await?;
        Ok(CookSession::resume(recipe, stored, now))
    }

    /// Write the session's progress. Failures are logged and reported, never
    /// retried here.
    pub async fn save(&self, user_id: Uuid, session: &CookSession) -> SaveStatus {
        let recipe_id = session.recipe().id;
        let result = self
            .store
            .save_progress(user_id, recipe_id, session.progress())
            .instrument(info_span!("save_progress", %recipe_id))
            .await;

        match result {
            Ok(()) => SaveStatus::Saved,
            Err(e) => {
                tracing::warn!(%recipe_id, "Failed to save cook progress: {}", e);
                SaveStatus::NotSaved {
                    error: e.to_string(),
                }
            }
        }
    }

    pub async fn apply(
        &self,
        user_id: Uuid,
        session: &mut CookSession,
        action: &CookAction,
        now: DateTime<Utc>,
    ) -> Result<Applied, CookError> {
        let outcome = match session.apply(action, now) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(action = action.name(), "cook action rejected: {}", e);
                return Err(e);
            }
        };

        if let Some(transition) = outcome.transition {
            tracing::info!(
                action = action.name(),
                from = %transition.from,
                to = %transition.to,
                celebrate = transition.celebrate,
                "cook position changed"
            );
        }

        let save = self.save(user_id, session).await;
        Ok(Applied { outcome, save })
    }
}
