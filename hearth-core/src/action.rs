//! Cook-mode actions as data, so they can travel over the wire and be
//! replayed against a [`CookSession`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cook::{CookSession, Transition};
use crate::error::CookError;
use crate::progress::CookPosition;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CookAction {
    ToggleIngredient {
        ingredient_id: String,
    },
    CheckAllIngredients,
    CompleteStep {
        index: usize,
    },
    ReopenStep {
        index: usize,
    },
    Advance,
    GoBack,
    /// -1 is the ingredient list, the step count is the finish
    JumpTo {
        target_index: i64,
        #[serde(default)]
        confirmed: bool,
    },
    Restart {
        #[serde(default)]
        confirmed: bool,
    },
    StartTimer {
        index: usize,
    },
    PauseTimer {
        index: usize,
    },
    ResetTimer {
        index: usize,
    },
    Tick {
        elapsed_secs: u32,
    },
}

impl CookAction {
    pub fn name(&self) -> &'static str {
        match self {
            CookAction::ToggleIngredient { .. } => "toggle_ingredient",
            CookAction::CheckAllIngredients => "check_all_ingredients",
            CookAction::CompleteStep { .. } => "complete_step",
            CookAction::ReopenStep { .. } => "reopen_step",
            CookAction::Advance => "advance",
            CookAction::GoBack => "go_back",
            CookAction::JumpTo { .. } => "jump_to",
            CookAction::Restart { .. } => "restart",
            CookAction::StartTimer { .. } => "start_timer",
            CookAction::PauseTimer { .. } => "pause_timer",
            CookAction::ResetTimer { .. } => "reset_timer",
            CookAction::Tick { .. } => "tick",
        }
    }
}

/// What an applied action did, beyond mutating the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ActionOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
    /// Steps whose timers ran out during a tick
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expired_timers: Vec<String>,
}

impl ActionOutcome {
    fn moved(transition: Transition) -> Self {
        Self {
            transition: Some(transition),
            ..Default::default()
        }
    }
}

impl CookSession {
    pub fn apply(
        &mut self,
        action: &CookAction,
        now: DateTime<Utc>,
    ) -> Result<ActionOutcome, CookError> {
        let outcome = match action {
            CookAction::ToggleIngredient { ingredient_id } => {
                self.toggle_ingredient(ingredient_id, now)?;
                ActionOutcome::default()
            }
            CookAction::CheckAllIngredients => {
                self.check_all_ingredients(now)?;
                ActionOutcome::default()
            }
            CookAction::CompleteStep { index } => {
                self.complete_step(*index, now)?;
                ActionOutcome::default()
            }
            CookAction::ReopenStep { index } => {
                self.reopen_step(*index, now)?;
                ActionOutcome::default()
            }
            CookAction::Advance => ActionOutcome::moved(self.advance(now)?),
            CookAction::GoBack => ActionOutcome::moved(self.go_back(now)?),
            CookAction::JumpTo {
                target_index,
                confirmed,
            } => {
                let step_count = self.recipe().step_count();
                if *target_index < -1 || *target_index > step_count as i64 {
                    return Err(CookError::StepOutOfRange {
                        index: (*target_index).max(0) as usize,
                        len: step_count,
                    });
                }
                let target = CookPosition::from_index(*target_index, step_count);
                ActionOutcome::moved(self.jump_to(target, *confirmed, now)?)
            }
            CookAction::Restart { confirmed } => {
                ActionOutcome::moved(self.restart(*confirmed, now)?)
            }
            CookAction::StartTimer { index } => {
                self.start_timer(*index, now)?;
                ActionOutcome::default()
            }
            CookAction::PauseTimer { index } => {
                self.pause_timer(*index, now)?;
                ActionOutcome::default()
            }
            CookAction::ResetTimer { index } => {
                self.reset_timer(*index, now)?;
                ActionOutcome::default()
            }
            CookAction::Tick { elapsed_secs } => ActionOutcome {
                expired_timers: self.tick(*elapsed_secs, now),
                ..Default::default()
            },
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{Ingredient, Recipe, Step};
    use uuid::Uuid;

    fn session() -> CookSession {
        let recipe = Recipe {
            id: Uuid::nil(),
            title: "Toast".to_string(),
            ingredients: vec![Ingredient {
                id: "bread".to_string(),
                item: "bread".to_string(),
                amount: Some("2".to_string()),
                unit: Some("slices".to_string()),
                note: None,
            }],
            steps: vec![
                Step {
                    id: "toast".to_string(),
                    instruction: "Toast the bread".to_string(),
                    timer_secs: Some(90),
                },
                Step {
                    id: "butter".to_string(),
                    instruction: "Butter it".to_string(),
                    timer_secs: None,
                },
            ],
        };
        CookSession::start(recipe, None, Utc::now())
    }

    #[test]
    fn test_action_wire_format() {
        let action: CookAction = serde_json::from_str(
            r#"{"action": "toggle_ingredient", "ingredient_id": "bread"}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            CookAction::ToggleIngredient {
                ingredient_id: "bread".to_string()
            }
        );

        let action: CookAction =
            serde_json::from_str(r#"{"action": "jump_to", "target_index": 1}"#).unwrap();
        assert_eq!(
            action,
            CookAction::JumpTo {
                target_index: 1,
                confirmed: false
            }
        );
        assert_eq!(action.name(), "jump_to");
    }

    #[test]
    fn test_apply_sequence() {
        let now = Utc::now();
        let mut session = session();
        let actions = [
            CookAction::ToggleIngredient {
                ingredient_id: "bread".to_string(),
            },
            CookAction::Advance,
            CookAction::StartTimer { index: 0 },
            CookAction::CompleteStep { index: 0 },
            CookAction::Advance,
            CookAction::CompleteStep { index: 1 },
        ];
        for action in &actions {
            session.apply(action, now).unwrap();
        }

        let outcome = session.apply(&CookAction::Advance, now).unwrap();
        assert!(outcome.transition.unwrap().celebrate);
        assert_eq!(session.current_step_index(), 2);
    }

    #[test]
    fn test_apply_tick_reports_expired() {
        let now = Utc::now();
        let mut session = session();
        session.apply(&CookAction::StartTimer { index: 0 }, now).unwrap();
        let outcome = session
            .apply(&CookAction::Tick { elapsed_secs: 90 }, now)
            .unwrap();
        assert_eq!(outcome.expired_timers, vec!["toast".to_string()]);
        assert_eq!(outcome.transition, None);
    }

    #[test]
    fn test_apply_jump_out_of_range() {
        let mut session = session();
        let err = session
            .apply(
                &CookAction::JumpTo {
                    target_index: 5,
                    confirmed: true,
                },
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(err, CookError::StepOutOfRange { index: 5, len: 2 });
        assert!(!err.is_rejection());
    }
}
