//! Cook mode: walking a recipe from the ingredient list to the finish.
//!
//! The session is an in-memory state machine over a [`RecipeProgress`]
//! record. Forward movement is gated: the ingredient list can't be left until
//! everything is checked, and a step can't be left until it is marked done.
//! Jumping past an open gate is possible, but only with explicit confirmation.
//! Moving backwards is never gated.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CookError;
use crate::progress::{derive_position, CookPosition, RecipeProgress, INGREDIENTS_INDEX};
use crate::recipe::Recipe;
use crate::timer::{StepTimer, TimerStatus};

/// How long the completion celebration stays visible.
pub const CELEBRATION_MILLIS: i64 = 3_000;

/// One-shot notification fired when a recipe is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebration {
    pub fired_at: DateTime<Utc>,
}

impl Celebration {
    pub fn visible_until(&self) -> DateTime<Utc> {
        self.fired_at + Duration::milliseconds(CELEBRATION_MILLIS)
    }

    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        now < self.visible_until()
    }
}

/// A change of position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Transition {
    pub from: CookPosition,
    pub to: CookPosition,
    /// True when this transition finished the recipe
    pub celebrate: bool,
}

#[derive(Debug, Clone)]
pub struct CookSession {
    recipe: Recipe,
    progress: RecipeProgress,
    position: CookPosition,
    celebration: Option<Celebration>,
}

impl CookSession {
    /// Resume (or begin) cooking. Stored progress is cleaned of entries the
    /// recipe no longer has, and the position is derived from it rather than
    /// taken from the stored index.
    pub fn start(recipe: Recipe, stored: Option<RecipeProgress>, now: DateTime<Utc>) -> Self {
        let mut progress = stored.unwrap_or_else(|| RecipeProgress::new(now));
        progress.retain_known(&recipe);
        let position = derive_position(&recipe, &progress);
        progress.current_step_index = position.index(recipe.step_count());

        Self {
            recipe,
            progress,
            position,
            celebration: None,
        }
    }

    /// Continue a session between requests. The stored index is kept when
    /// it is within the recipe's range, so navigation made earlier (going
    /// back, a confirmed jump) carries over. Without a usable index this is
    /// [`CookSession::start`].
    pub fn resume(recipe: Recipe, stored: Option<RecipeProgress>, now: DateTime<Utc>) -> Self {
        let step_count = recipe.step_count() as i64;
        let usable = stored
            .as_ref()
            .map(|p| p.current_step_index)
            .filter(|i| (INGREDIENTS_INDEX..=step_count).contains(i));
        let Some(index) = usable else {
            return Self::start(recipe, stored, now);
        };

        let mut progress = stored.unwrap_or_else(|| RecipeProgress::new(now));
        progress.retain_known(&recipe);
        let position = CookPosition::from_index(index, recipe.step_count());

        Self {
            recipe,
            progress,
            position,
            celebration: None,
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn progress(&self) -> &RecipeProgress {
        &self.progress
    }

    pub fn position(&self) -> CookPosition {
        self.position
    }

    pub fn current_step_index(&self) -> i64 {
        self.position.index(self.recipe.step_count())
    }

    pub fn celebration(&self) -> Option<Celebration> {
        self.celebration
    }

    pub fn celebration_visible(&self, now: DateTime<Utc>) -> bool {
        self.celebration.is_some_and(|c| c.is_visible(now))
    }

    /// Clear the celebration once its display window has passed. Returns true
    /// if it was cleared by this call.
    pub fn dismiss_expired_celebration(&mut self, now: DateTime<Utc>) -> bool {
        match self.celebration {
            Some(c) if !c.is_visible(now) => {
                self.celebration = None;
                true
            }
            _ => false,
        }
    }

    pub fn into_progress(self) -> RecipeProgress {
        self.progress
    }

    pub fn toggle_ingredient(&mut self, id: &str, now: DateTime<Utc>) -> Result<bool, CookError> {
        if self.position != CookPosition::Ingredients {
            return Err(CookError::NotInIngredientsPhase);
        }
        if !self.recipe.has_ingredient(id) {
            return Err(CookError::UnknownIngredient(id.to_string()));
        }

        let checked = if self.progress.ingredient_checked_ids.remove(id) {
            false
        } else {
            self.progress.ingredient_checked_ids.insert(id.to_string());
            true
        };
        self.touch(now);
        Ok(checked)
    }

    pub fn check_all_ingredients(&mut self, now: DateTime<Utc>) -> Result<(), CookError> {
        if self.position != CookPosition::Ingredients {
            return Err(CookError::NotInIngredientsPhase);
        }
        for ingredient in &self.recipe.ingredients {
            self.progress
                .ingredient_checked_ids
                .insert(ingredient.id.clone());
        }
        self.touch(now);
        Ok(())
    }

    /// Mark a step done. Only steps at or before the current position can be
    /// completed.
    pub fn complete_step(&mut self, index: usize, now: DateTime<Utc>) -> Result<(), CookError> {
        self.set_step_completion(index, true, now)
    }

    /// Undo a step's completion. Never done implicitly by navigation.
    pub fn reopen_step(&mut self, index: usize, now: DateTime<Utc>) -> Result<(), CookError> {
        self.set_step_completion(index, false, now)
    }

    fn set_step_completion(
        &mut self,
        index: usize,
        done: bool,
        now: DateTime<Utc>,
    ) -> Result<(), CookError> {
        let step_id = self.step(index)?.id.clone();
        if index as i64 > self.current_step_index() {
            return Err(CookError::StepNotReached { index });
        }
        self.progress.step_completion.insert(step_id, done);
        self.touch(now);
        Ok(())
    }

    /// Move one position forward, if the current gate is closed.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Transition, CookError> {
        if self.position == CookPosition::Completed {
            return Err(CookError::AlreadyCompleted);
        }
        if let Some(gate) = self.open_gate_at(self.current_step_index()) {
            return Err(gate);
        }
        let next = CookPosition::from_index(self.current_step_index() + 1, self.recipe.step_count());
        Ok(self.move_to(next, now))
    }

    /// Move one position back. Always allowed except at the ingredient list.
    pub fn go_back(&mut self, now: DateTime<Utc>) -> Result<Transition, CookError> {
        if self.position == CookPosition::Ingredients {
            return Err(CookError::AtStart);
        }
        let previous =
            CookPosition::from_index(self.current_step_index() - 1, self.recipe.step_count());
        Ok(self.move_to(previous, now))
    }

    /// Jump to an arbitrary position. Going back is unconditional; going
    /// forward past any open gate needs `confirmed`.
    pub fn jump_to(
        &mut self,
        target: CookPosition,
        confirmed: bool,
        now: DateTime<Utc>,
    ) -> Result<Transition, CookError> {
        if let CookPosition::Step(index) = target {
            self.step(index)?;
        }

        let from = self.current_step_index();
        let to = target.index(self.recipe.step_count());
        if to == from {
            return Ok(Transition {
                from: self.position,
                to: self.position,
                celebrate: false,
            });
        }

        if to > from && !confirmed && (from..to).any(|i| self.open_gate_at(i).is_some()) {
            return Err(CookError::ConfirmationRequired {
                from: self.position,
                to: target,
            });
        }

        Ok(self.move_to(target, now))
    }

    /// Throw away all progress and go back to the ingredient list.
    pub fn restart(&mut self, confirmed: bool, now: DateTime<Utc>) -> Result<Transition, CookError> {
        if !confirmed && !self.progress.is_pristine() {
            return Err(CookError::RestartRequiresConfirmation);
        }
        let from = self.position;
        self.progress = RecipeProgress::new(now);
        self.position = CookPosition::Ingredients;
        self.celebration = None;
        self.touch(now);
        Ok(Transition {
            from,
            to: CookPosition::Ingredients,
            celebrate: false,
        })
    }

    /// The step's timer, or a fresh one if it was never touched.
    pub fn timer(&self, index: usize) -> Option<StepTimer> {
        let step = self.recipe.steps.get(index)?;
        let secs = step.timer_secs?;
        Some(
            self.progress
                .timers
                .get(&step.id)
                .cloned()
                .unwrap_or_else(|| StepTimer::new(secs)),
        )
    }

    pub fn start_timer(&mut self, index: usize, now: DateTime<Utc>) -> Result<TimerStatus, CookError> {
        let timer = self.timer_mut(index)?;
        if timer.status() == TimerStatus::Expired {
            return Err(CookError::TimerExpired { index });
        }
        timer.start(now);
        let status = timer.status();
        self.touch(now);
        Ok(status)
    }

    pub fn pause_timer(&mut self, index: usize, now: DateTime<Utc>) -> Result<TimerStatus, CookError> {
        let timer = self.timer_mut(index)?;
        timer.pause();
        let status = timer.status();
        self.touch(now);
        Ok(status)
    }

    pub fn reset_timer(&mut self, index: usize, now: DateTime<Utc>) -> Result<TimerStatus, CookError> {
        let timer = self.timer_mut(index)?;
        timer.reset();
        let status = timer.status();
        self.touch(now);
        Ok(status)
    }

    /// Count down every running timer. Returns the ids of steps whose timers
    /// ran out on this tick. An expired timer does not complete its step.
    pub fn tick(&mut self, elapsed_secs: u32, now: DateTime<Utc>) -> Vec<String> {
        let mut expired = Vec::new();
        for (step_id, timer) in self.progress.timers.iter_mut() {
            if timer.tick(elapsed_secs) {
                expired.push(step_id.clone());
            }
        }
        self.touch(now);
        expired
    }

    fn step(&self, index: usize) -> Result<&crate::recipe::Step, CookError> {
        self.recipe.steps.get(index).ok_or(CookError::StepOutOfRange {
            index,
            len: self.recipe.step_count(),
        })
    }

    fn timer_mut(&mut self, index: usize) -> Result<&mut StepTimer, CookError> {
        let step = self.step(index)?;
        let secs = step.timer_secs.ok_or(CookError::NoTimer { index })?;
        let step_id = step.id.clone();
        Ok(self
            .progress
            .timers
            .entry(step_id)
            .or_insert_with(|| StepTimer::new(secs)))
    }

    /// The reason leaving position `index` forward is blocked, if any.
    fn open_gate_at(&self, index: i64) -> Option<CookError> {
        match CookPosition::from_index(index, self.recipe.step_count()) {
            CookPosition::Ingredients => {
                let total = self.recipe.ingredients.len();
                let checked = self.progress.checked_count(&self.recipe);
                (checked < total).then_some(CookError::IngredientsIncomplete { checked, total })
            }
            CookPosition::Step(i) => {
                let done = self.progress.is_step_complete(&self.recipe.steps[i].id);
                (!done).then_some(CookError::StepIncomplete { index: i })
            }
            CookPosition::Completed => None,
        }
    }

    fn move_to(&mut self, to: CookPosition, now: DateTime<Utc>) -> Transition {
        let from = self.position;
        self.position = to;
        let celebrate = to == CookPosition::Completed && from != CookPosition::Completed;
        if celebrate {
            self.celebration = Some(Celebration { fired_at: now });
        }
        self.touch(now);
        Transition {
            from,
            to,
            celebrate,
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.progress.current_step_index = self.current_step_index();
        self.progress.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{Ingredient, Step};
    use uuid::Uuid;

    fn recipe(ingredients: usize, steps: usize) -> Recipe {
        Recipe {
            id: Uuid::nil(),
            title: "Test".to_string(),
            ingredients: (0..ingredients)
                .map(|i| Ingredient {
                    id: format!("i{}", i),
                    item: format!("item {}", i),
                    amount: None,
                    unit: None,
                    note: None,
                })
                .collect(),
            steps: (0..steps)
                .map(|i| Step {
                    id: format!("s{}", i),
                    instruction: format!("do {}", i),
                    timer_secs: Some(60),
                })
                .collect(),
        }
    }

    fn at_step_zero(ingredients: usize, steps: usize) -> CookSession {
        let now = Utc::now();
        let mut session = CookSession::start(recipe(ingredients, steps), None, now);
        session.check_all_ingredients(now).unwrap();
        session.advance(now).unwrap();
        session
    }

    #[test]
    fn test_example_walkthrough() {
        let now = Utc::now();
        let mut session = CookSession::start(recipe(3, 2), None, now);
        assert_eq!(session.current_step_index(), -1);
        assert!(session.progress().ingredient_checked_ids.is_empty());

        for id in ["i0", "i1", "i2"] {
            assert!(session.toggle_ingredient(id, now).unwrap());
        }
        session.advance(now).unwrap();
        assert_eq!(session.current_step_index(), 0);

        assert_eq!(
            session.advance(now),
            Err(CookError::StepIncomplete { index: 0 })
        );
        assert_eq!(session.current_step_index(), 0);

        session.complete_step(0, now).unwrap();
        session.advance(now).unwrap();
        assert_eq!(session.current_step_index(), 1);

        session.complete_step(1, now).unwrap();
        let transition = session.advance(now).unwrap();
        assert_eq!(session.current_step_index(), 2);
        assert_eq!(session.position(), CookPosition::Completed);
        assert!(transition.celebrate);
        assert_eq!(session.progress().current_step_index, 2);
    }

    #[test]
    fn test_leaving_ingredients_requires_every_ingredient() {
        for total in 1..5 {
            let now = Utc::now();
            let mut session = CookSession::start(recipe(total, 1), None, now);
            for i in 0..total - 1 {
                session.toggle_ingredient(&format!("i{}", i), now).unwrap();
            }
            assert_eq!(
                session.advance(now),
                Err(CookError::IngredientsIncomplete {
                    checked: total - 1,
                    total
                })
            );
            assert_eq!(session.position(), CookPosition::Ingredients);

            session
                .toggle_ingredient(&format!("i{}", total - 1), now)
                .unwrap();
            assert!(session.advance(now).is_ok());
        }
    }

    #[test]
    fn test_toggle_twice_is_no_change() {
        let now = Utc::now();
        let mut session = CookSession::start(recipe(3, 1), None, now);
        session.toggle_ingredient("i1", now).unwrap();
        let before = session.progress().ingredient_checked_ids.clone();

        assert!(session.toggle_ingredient("i0", now).unwrap());
        assert!(!session.toggle_ingredient("i0", now).unwrap());
        assert_eq!(session.progress().ingredient_checked_ids, before);
    }

    #[test]
    fn test_toggle_rejects_unknown_and_outside_ingredients_phase() {
        let now = Utc::now();
        let mut session = CookSession::start(recipe(1, 1), None, now);
        assert_eq!(
            session.toggle_ingredient("nope", now),
            Err(CookError::UnknownIngredient("nope".to_string()))
        );

        session.check_all_ingredients(now).unwrap();
        session.advance(now).unwrap();
        assert_eq!(
            session.toggle_ingredient("i0", now),
            Err(CookError::NotInIngredientsPhase)
        );
    }

    #[test]
    fn test_forward_navigation_never_skips_incomplete_steps() {
        let now = Utc::now();
        let mut session = at_step_zero(1, 4);
        for i in 0..4 {
            assert_eq!(session.position(), CookPosition::Step(i));
            assert!(session.advance(now).is_err());
            assert_eq!(session.position(), CookPosition::Step(i));
            session.complete_step(i, now).unwrap();
            session.advance(now).unwrap();
        }
        assert_eq!(session.position(), CookPosition::Completed);
        assert_eq!(session.advance(now), Err(CookError::AlreadyCompleted));
    }

    #[test]
    fn test_completion_survives_navigation() {
        let now = Utc::now();
        let mut session = at_step_zero(1, 3);
        session.complete_step(0, now).unwrap();
        session.advance(now).unwrap();
        session.go_back(now).unwrap();
        session.go_back(now).unwrap();
        assert_eq!(session.position(), CookPosition::Ingredients);
        session.jump_to(CookPosition::Step(1), false, now).unwrap();
        session.advance(now).unwrap_err();
        assert!(session.progress().is_step_complete("s0"));
    }

    #[test]
    fn test_cannot_complete_unreached_step() {
        let now = Utc::now();
        let mut session = at_step_zero(1, 3);
        assert_eq!(
            session.complete_step(2, now),
            Err(CookError::StepNotReached { index: 2 })
        );
        assert_eq!(
            session.complete_step(7, now),
            Err(CookError::StepOutOfRange { index: 7, len: 3 })
        );
    }

    #[test]
    fn test_reopen_step_is_explicit() {
        let now = Utc::now();
        let mut session = at_step_zero(1, 2);
        session.complete_step(0, now).unwrap();
        session.reopen_step(0, now).unwrap();
        assert!(!session.progress().is_step_complete("s0"));
        assert_eq!(
            session.advance(now),
            Err(CookError::StepIncomplete { index: 0 })
        );
    }

    #[test]
    fn test_jump_ahead_needs_confirmation_when_current_incomplete() {
        let now = Utc::now();
        let mut session = at_step_zero(1, 3);
        assert_eq!(
            session.jump_to(CookPosition::Step(1), false, now),
            Err(CookError::ConfirmationRequired {
                from: CookPosition::Step(0),
                to: CookPosition::Step(1)
            })
        );
        assert_eq!(session.position(), CookPosition::Step(0));

        session.jump_to(CookPosition::Step(1), true, now).unwrap();
        assert_eq!(session.position(), CookPosition::Step(1));
        assert!(!session.progress().is_step_complete("s0"));
    }

    #[test]
    fn test_jump_ahead_without_confirmation_when_current_complete() {
        let now = Utc::now();
        let mut session = at_step_zero(1, 3);
        session.complete_step(0, now).unwrap();
        session.jump_to(CookPosition::Step(1), false, now).unwrap();
        assert_eq!(session.position(), CookPosition::Step(1));
    }

    #[test]
    fn test_jump_past_incomplete_intermediate_step_needs_confirmation() {
        let now = Utc::now();
        let mut session = at_step_zero(1, 3);
        session.complete_step(0, now).unwrap();
        assert!(matches!(
            session.jump_to(CookPosition::Step(2), false, now),
            Err(CookError::ConfirmationRequired { .. })
        ));
    }

    #[test]
    fn test_jump_back_is_unconditional() {
        let now = Utc::now();
        let mut session = at_step_zero(1, 3);
        session.jump_to(CookPosition::Step(2), true, now).unwrap();
        session.jump_to(CookPosition::Step(0), false, now).unwrap();
        session.jump_to(CookPosition::Ingredients, false, now).unwrap();
        assert_eq!(session.position(), CookPosition::Ingredients);
        assert_eq!(session.progress().current_step_index, -1);
    }

    #[test]
    fn test_celebration_fires_once_and_clears_after_window() {
        let start = Utc::now();
        let mut session = at_step_zero(1, 1);
        session.complete_step(0, start).unwrap();
        let transition = session.advance(start).unwrap();
        assert!(transition.celebrate);

        let celebration = session.celebration().unwrap();
        assert_eq!(celebration.fired_at, start);
        assert!(session.celebration_visible(start + Duration::milliseconds(2_999)));
        assert!(!session.dismiss_expired_celebration(start + Duration::milliseconds(2_999)));
        assert!(!session.celebration_visible(start + Duration::milliseconds(3_000)));
        assert!(session.dismiss_expired_celebration(start + Duration::milliseconds(3_000)));
        assert_eq!(session.celebration(), None);

        // Jumping to the finish while already there doesn't celebrate again
        let again = session
            .jump_to(CookPosition::Completed, false, start)
            .unwrap();
        assert!(!again.celebrate);
        assert_eq!(session.celebration(), None);
    }

    #[test]
    fn test_recipe_without_steps_completes_from_ingredients() {
        let now = Utc::now();
        let mut session = CookSession::start(recipe(1, 0), None, now);
        session.check_all_ingredients(now).unwrap();
        let transition = session.advance(now).unwrap();
        assert_eq!(transition.to, CookPosition::Completed);
        assert!(transition.celebrate);
        assert_eq!(session.current_step_index(), 0);
    }

    #[test]
    fn test_go_back_from_completed_and_start() {
        let now = Utc::now();
        let mut session = at_step_zero(1, 2);
        session.complete_step(0, now).unwrap();
        session.advance(now).unwrap();
        session.complete_step(1, now).unwrap();
        session.advance(now).unwrap();

        session.go_back(now).unwrap();
        assert_eq!(session.position(), CookPosition::Step(1));
        session.go_back(now).unwrap();
        session.go_back(now).unwrap();
        assert_eq!(session.go_back(now), Err(CookError::AtStart));
    }

    #[test]
    fn test_restart_requires_confirmation_once_started() {
        let now = Utc::now();
        let mut session = CookSession::start(recipe(2, 2), None, now);
        session.restart(false, now).unwrap();

        session.toggle_ingredient("i0", now).unwrap();
        assert_eq!(
            session.restart(false, now),
            Err(CookError::RestartRequiresConfirmation)
        );
        session.restart(true, now).unwrap();
        assert!(session.progress().is_pristine());
    }

    #[test]
    fn test_timers_count_down_without_completing_step() {
        let now = Utc::now();
        let mut session = at_step_zero(1, 2);
        assert_eq!(session.start_timer(0, now), Ok(TimerStatus::Running));

        assert!(session.tick(59, now).is_empty());
        assert_eq!(session.timer(0).unwrap().remaining_secs, 1);
        assert_eq!(session.tick(5, now), vec!["s0".to_string()]);
        assert_eq!(session.timer(0).unwrap().status(), TimerStatus::Expired);
        assert!(!session.progress().is_step_complete("s0"));

        assert_eq!(
            session.start_timer(0, now),
            Err(CookError::TimerExpired { index: 0 })
        );
        assert_eq!(session.reset_timer(0, now), Ok(TimerStatus::NotStarted));
    }

    #[test]
    fn test_timer_state_persists_with_progress() {
        let now = Utc::now();
        let mut session = at_step_zero(1, 2);
        session.start_timer(1, now).unwrap();
        session.tick(20, now);
        session.pause_timer(1, now).unwrap();

        let stored = session.clone().into_progress();
        let resumed = CookSession::start(session.recipe().clone(), Some(stored), now);
        let timer = resumed.timer(1).unwrap();
        assert_eq!(timer.remaining_secs, 40);
        assert_eq!(timer.status(), TimerStatus::Paused);
    }

    #[test]
    fn test_start_derives_position_from_stored_completion() {
        let now = Utc::now();
        let recipe = recipe(2, 4);
        let mut stored = RecipeProgress::new(now);
        stored.ingredient_checked_ids.insert("i0".to_string());
        stored.ingredient_checked_ids.insert("i1".to_string());
        stored.step_completion.insert("s0".to_string(), true);
        stored.step_completion.insert("s1".to_string(), true);
        stored.current_step_index = 3;

        let session = CookSession::start(recipe.clone(), Some(stored.clone()), now);
        assert_eq!(session.position(), CookPosition::Step(2));
        assert_eq!(session.progress().current_step_index, 2);

        stored.step_completion.insert("s2".to_string(), true);
        stored.step_completion.insert("s3".to_string(), true);
        let session = CookSession::start(recipe, Some(stored), now);
        assert_eq!(session.current_step_index(), 4);
        assert_eq!(session.celebration(), None);
    }

    #[test]
    fn test_step_without_timer() {
        let now = Utc::now();
        let mut r = recipe(1, 1);
        r.steps[0].timer_secs = None;
        let mut session = CookSession::start(r, None, now);
        assert_eq!(
            session.start_timer(0, now),
            Err(CookError::NoTimer { index: 0 })
        );
        assert_eq!(session.timer(0), None);
    }

    #[test]
    fn test_resume_keeps_stored_position() {
        let now = Utc::now();
        let recipe = recipe(2, 3);

        // Everything checked, step 0 done, but the cook went back to the list
        let mut stored = RecipeProgress::new(now);
        stored.ingredient_checked_ids.insert("i0".to_string());
        stored.ingredient_checked_ids.insert("i1".to_string());
        stored.step_completion.insert("s0".to_string(), true);
        stored.current_step_index = -1;

        let session = CookSession::resume(recipe.clone(), Some(stored.clone()), now);
        assert_eq!(session.position(), CookPosition::Ingredients);

        // Jumped ahead past an unfinished step
        stored.current_step_index = 2;
        let session = CookSession::resume(recipe.clone(), Some(stored.clone()), now);
        assert_eq!(session.position(), CookPosition::Step(2));
        assert_eq!(session.celebration(), None);
    }

    #[test]
    fn test_resume_derives_without_usable_index() {
        let now = Utc::now();
        let recipe = recipe(1, 2);

        let session = CookSession::resume(recipe.clone(), None, now);
        assert_eq!(session.position(), CookPosition::Ingredients);

        // Out of range after the recipe lost steps
        let mut stored = RecipeProgress::new(now);
        stored.ingredient_checked_ids.insert("i0".to_string());
        stored.current_step_index = 7;
        let session = CookSession::resume(recipe, Some(stored), now);
        assert_eq!(session.position(), CookPosition::Step(0));
        assert_eq!(session.progress().current_step_index, 0);
    }
}
