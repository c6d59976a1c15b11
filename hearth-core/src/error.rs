use thiserror::Error;
use uuid::Uuid;

use crate::progress::CookPosition;

/// Rejected cook-mode actions. The messages are shown to the cook as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CookError {
    #[error("Check off all ingredients before starting ({checked} of {total} checked)")]
    IngredientsIncomplete { checked: usize, total: usize },

    #[error("Mark step {} as done before moving on", .index + 1)]
    StepIncomplete { index: usize },

    #[error("Recipe is already complete")]
    AlreadyCompleted,

    #[error("Already at the ingredient list")]
    AtStart,

    #[error("Skipping ahead from {from} to {to} leaves unfinished work; confirm to continue")]
    ConfirmationRequired { from: CookPosition, to: CookPosition },

    #[error("Restarting discards all progress on this recipe; confirm to continue")]
    RestartRequiresConfirmation,

    #[error("Ingredients can only be changed before cooking starts")]
    NotInIngredientsPhase,

    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(String),

    #[error("Step {} does not exist (recipe has {len} steps)", .index + 1)]
    StepOutOfRange { index: usize, len: usize },

    #[error("Step {} has not been reached yet", .index + 1)]
    StepNotReached { index: usize },

    #[error("Step {} has no timer", .index + 1)]
    NoTimer { index: usize },

    #[error("Timer for step {} has finished; reset it first", .index + 1)]
    TimerExpired { index: usize },
}

impl CookError {
    /// True for guard violations (the action was understood but not allowed
    /// right now), false for actions that reference things that don't exist.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            CookError::UnknownIngredient(_)
                | CookError::StepOutOfRange { .. }
                | CookError::NoTimer { .. }
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    #[error("Recipe title must not be empty")]
    EmptyTitle,

    #[error("Ingredient {} has no item", .index + 1)]
    EmptyIngredient { index: usize },

    #[error("Step {} has no instruction", .index + 1)]
    EmptyStep { index: usize },

    #[error("Duplicate ingredient id: {0}")]
    DuplicateIngredientId(String),

    #[error("Duplicate step id: {0}")]
    DuplicateStepId(String),

    #[error("Step {} has a zero-length timer", .index + 1)]
    ZeroTimer { index: usize },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store operation failed: {0}")]
    Backend(String),

    #[error("Invalid stored document: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cook(#[from] CookError),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Not logged in; run `hearth login` first")]
    NotLoggedIn,

    #[error("Session expired; run `hearth login` again")]
    Expired,

    #[error("Failed to access session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
