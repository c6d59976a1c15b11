//! The persisted progress record and the position derived from it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recipe::Recipe;
use crate::timer::{StepTimer, TimerStatus};

/// Stored value of `current_step_index` while checking ingredients.
pub const INGREDIENTS_INDEX: i64 = -1;

/// Where the cook currently is in a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "phase", content = "index", rename_all = "snake_case")]
pub enum CookPosition {
    Ingredients,
    Step(usize),
    Completed,
}

impl CookPosition {
    /// -1 for the ingredient list, the step index, or `step_count` once done.
    pub fn index(self, step_count: usize) -> i64 {
        match self {
            CookPosition::Ingredients => INGREDIENTS_INDEX,
            CookPosition::Step(i) => i as i64,
            CookPosition::Completed => step_count as i64,
        }
    }

    /// Inverse of [`CookPosition::index`]. Out-of-range values are clamped.
    pub fn from_index(index: i64, step_count: usize) -> Self {
        if index < 0 {
            CookPosition::Ingredients
        } else if index as u64 >= step_count as u64 {
            CookPosition::Completed
        } else {
            CookPosition::Step(index as usize)
        }
    }
}

impl fmt::Display for CookPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookPosition::Ingredients => write!(f, "the ingredient list"),
            CookPosition::Step(i) => write!(f, "step {}", i + 1),
            CookPosition::Completed => write!(f, "the finish"),
        }
    }
}

/// Cook-mode progress for one user on one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeProgress {
    #[serde(default)]
    pub ingredient_checked_ids: BTreeSet<String>,
    #[serde(default)]
    pub step_completion: BTreeMap<String, bool>,
    #[serde(default)]
    pub timers: BTreeMap<String, StepTimer>,
    /// Last known position. Informational only; see [`derive_position`].
    #[serde(default = "default_step_index")]
    pub current_step_index: i64,
    pub updated_at: DateTime<Utc>,
}

fn default_step_index() -> i64 {
    INGREDIENTS_INDEX
}

impl RecipeProgress {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ingredient_checked_ids: BTreeSet::new(),
            step_completion: BTreeMap::new(),
            timers: BTreeMap::new(),
            current_step_index: INGREDIENTS_INDEX,
            updated_at: now,
        }
    }

    pub fn checked_count(&self, recipe: &Recipe) -> usize {
        recipe
            .ingredients
            .iter()
            .filter(|i| self.ingredient_checked_ids.contains(&i.id))
            .count()
    }

    pub fn all_ingredients_checked(&self, recipe: &Recipe) -> bool {
        self.checked_count(recipe) == recipe.ingredients.len()
    }

    pub fn is_step_complete(&self, step_id: &str) -> bool {
        self.step_completion.get(step_id).copied().unwrap_or(false)
    }

    /// True if nothing has been checked, completed or timed yet.
    pub fn is_pristine(&self) -> bool {
        self.ingredient_checked_ids.is_empty()
            && !self.step_completion.values().any(|done| *done)
            && self
                .timers
                .values()
                .all(|t| t.status() == TimerStatus::NotStarted)
    }

    /// Drop entries that refer to ingredients or steps the recipe no longer
    /// has, and timers whose step duration has changed.
    pub fn retain_known(&mut self, recipe: &Recipe) {
        self.ingredient_checked_ids
            .retain(|id| recipe.has_ingredient(id));
        self.step_completion
            .retain(|id, _| recipe.step_index(id).is_some());
        // A timer whose step changed duration starts over
        self.timers.retain(|id, timer| {
            recipe
                .step_index(id)
                .and_then(|i| recipe.steps[i].timer_secs)
                .is_some_and(|secs| secs == timer.duration_secs)
        });
    }
}

/// Work out where a cook should resume: the ingredient list until every
/// ingredient is checked, then the first unfinished step, then the finish.
pub fn derive_position(recipe: &Recipe, progress: &RecipeProgress) -> CookPosition {
    if !progress.all_ingredients_checked(recipe) {
        return CookPosition::Ingredients;
    }
    recipe
        .steps
        .iter()
        .position(|step| !progress.is_step_complete(&step.id))
        .map(CookPosition::Step)
        .unwrap_or(CookPosition::Completed)
}
