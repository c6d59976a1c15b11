//! Read-only snapshot of a cook session, shaped for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cook::CookSession;
use crate::progress::CookPosition;
use crate::timer::TimerStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CookView {
    pub recipe_id: Uuid,
    pub title: String,
    pub position: CookPosition,
    pub current_step_index: i64,
    pub step_count: usize,
    pub ingredients: Vec<IngredientView>,
    pub steps: Vec<StepView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celebration: Option<CelebrationView>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IngredientView {
    pub id: String,
    pub text: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StepView {
    pub index: usize,
    pub id: String,
    pub instruction: String,
    pub complete: bool,
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimerView {
    pub status: TimerStatus,
    pub remaining_secs: u32,
    pub duration_secs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CelebrationView {
    pub fired_at: DateTime<Utc>,
    pub visible_until: DateTime<Utc>,
}

impl CookSession {
    /// Snapshot for display. The celebration is only included while visible.
    pub fn view(&self, now: DateTime<Utc>) -> CookView {
        let recipe = self.recipe();
        let progress = self.progress();
        let position = self.position();

        let ingredients = recipe
            .ingredients
            .iter()
            .map(|i| IngredientView {
                id: i.id.clone(),
                text: i.display_line(),
                checked: progress.ingredient_checked_ids.contains(&i.id),
            })
            .collect();

        let steps = recipe
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| StepView {
                index,
                id: step.id.clone(),
                instruction: step.instruction.clone(),
                complete: progress.is_step_complete(&step.id),
                current: position == CookPosition::Step(index),
                timer: self.timer(index).map(|t| TimerView {
                    status: t.status(),
                    remaining_secs: t.remaining_secs,
                    duration_secs: t.duration_secs,
                }),
            })
            .collect();

        let celebration = self
            .celebration()
            .filter(|c| c.is_visible(now))
            .map(|c| CelebrationView {
                fired_at: c.fired_at,
                visible_until: c.visible_until(),
            });

        CookView {
            recipe_id: recipe.id,
            title: recipe.title.clone(),
            position,
            current_step_index: self.current_step_index(),
            step_count: recipe.step_count(),
            ingredients,
            steps,
            celebration,
            updated_at: progress.updated_at,
        }
    }
}
