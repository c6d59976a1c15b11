pub mod action;
pub mod cook;
pub mod error;
pub mod progress;
pub mod recipe;
pub mod session;
pub mod store;
pub mod timer;
pub mod tracker;
pub mod view;

pub use action::{ActionOutcome, CookAction};
pub use cook::{Celebration, CookSession, Transition, CELEBRATION_MILLIS};
pub use error::{CookError, RecipeValidationError, SessionError, StoreError, TrackerError};
pub use progress::{derive_position, CookPosition, RecipeProgress, INGREDIENTS_INDEX};
pub use recipe::{Ingredient, NewIngredient, NewRecipe, NewStep, Recipe, Step};
pub use session::{ClientSession, SessionContext, SessionStatus};
pub use store::{MemoryStore, ProgressStore};
pub use timer::{StepTimer, TimerStatus};
pub use tracker::{Applied, ProgressTracker, SaveStatus};
pub use view::{CelebrationView, CookView, IngredientView, StepView, TimerView};
