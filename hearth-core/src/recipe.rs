//! Recipe records as cook mode sees them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RecipeValidationError;

/// A recipe that can be cooked step by step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Ingredient {
    pub id: String,
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Step {
    pub id: String,
    pub instruction: String,
    /// Countdown length for this step, if it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_secs: Option<u32>,
}

impl Recipe {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn has_ingredient(&self, id: &str) -> bool {
        self.ingredients.iter().any(|i| i.id == id)
    }

    pub fn step_index(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }
}

impl Ingredient {
    /// "2 cups flour (sifted)"
    pub fn display_line(&self) -> String {
        let mut parts = Vec::new();
        if let Some(amount) = self.amount.as_deref().filter(|a| !a.is_empty()) {
            parts.push(amount);
        }
        if let Some(unit) = self.unit.as_deref().filter(|u| !u.is_empty()) {
            parts.push(unit);
        }
        parts.push(&self.item);

        let line = parts.join(" ");
        match self.note.as_deref().filter(|n| !n.is_empty()) {
            Some(note) => format!("{} ({})", line, note),
            None => line,
        }
    }
}

/// Write-boundary payload for creating a recipe. Ids are optional here and
/// filled in by [`NewRecipe::into_recipe`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewRecipe {
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<NewIngredient>,
    #[serde(default)]
    pub steps: Vec<NewStep>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewIngredient {
    #[serde(default)]
    pub id: Option<String>,
    pub item: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewStep {
    #[serde(default)]
    pub id: Option<String>,
    pub instruction: String,
    #[serde(default)]
    pub timer_secs: Option<u32>,
}

impl NewRecipe {
    /// Assign missing ids, trim text fields and validate the result.
    pub fn into_recipe(self, id: Uuid) -> Result<Recipe, RecipeValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(RecipeValidationError::EmptyTitle);
        }

        let mut ingredient_ids = HashSet::new();
        let mut ingredients = Vec::with_capacity(self.ingredients.len());
        for (index, ingredient) in self.ingredients.into_iter().enumerate() {
            let item = ingredient.item.trim().to_string();
            if item.is_empty() {
                return Err(RecipeValidationError::EmptyIngredient { index });
            }
            let id = non_empty(ingredient.id).unwrap_or_else(|| format!("ing-{}", index + 1));
            if !ingredient_ids.insert(id.clone()) {
                return Err(RecipeValidationError::DuplicateIngredientId(id));
            }
            ingredients.push(Ingredient {
                id,
                item,
                amount: non_empty(ingredient.amount),
                unit: non_empty(ingredient.unit),
                note: non_empty(ingredient.note),
            });
        }

        let mut step_ids = HashSet::new();
        let mut steps = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.into_iter().enumerate() {
            let instruction = step.instruction.trim().to_string();
            if instruction.is_empty() {
                return Err(RecipeValidationError::EmptyStep { index });
            }
            if step.timer_secs == Some(0) {
                return Err(RecipeValidationError::ZeroTimer { index });
            }
            let id = non_empty(step.id).unwrap_or_else(|| format!("step-{}", index + 1));
            if !step_ids.insert(id.clone()) {
                return Err(RecipeValidationError::DuplicateStepId(id));
            }
            steps.push(Step {
                id,
                instruction,
                timer_secs: step.timer_secs,
            });
        }

        Ok(Recipe {
            id,
            title,
            ingredients,
            steps,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
