//! Plain-text rendering of cook state for the terminal.

use std::fmt::Write;

use hearth_core::{CookPosition, CookView, SaveStatus, TimerStatus, TimerView};

/// `mm:ss`, or `h:mm:ss` past an hour.
pub fn clock(secs: u32) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

pub fn timer_line(timer: &TimerView) -> String {
    let label = match timer.status {
        TimerStatus::NotStarted => "timer",
        TimerStatus::Running => "running",
        TimerStatus::Paused => "paused",
        TimerStatus::Expired => "done",
    };
    match timer.status {
        TimerStatus::NotStarted => format!("{} {}", label, clock(timer.duration_secs)),
        _ => format!(
            "{} {} / {}",
            label,
            clock(timer.remaining_secs),
            clock(timer.duration_secs)
        ),
    }
}

pub fn cook_view(view: &CookView) -> String {
    let mut out = String::new();
    let checked = view.ingredients.iter().filter(|i| i.checked).count();

    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "Now at {}", view.position);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Ingredients ({}/{} checked)",
        checked,
        view.ingredients.len()
    );
    for ingredient in &view.ingredients {
        let mark = if ingredient.checked { "x" } else { " " };
        let _ = writeln!(out, "  [{}] {}  ({})", mark, ingredient.text, ingredient.id);
    }

    if !view.steps.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Steps");
    }
    for step in &view.steps {
        let pointer = if step.current { ">" } else { " " };
        let mark = if step.complete { "x" } else { " " };
        let _ = write!(
            out,
            "{} [{}] {}. {}",
            pointer,
            mark,
            step.index + 1,
            step.instruction
        );
        if let Some(timer) = &step.timer {
            let _ = write!(out, "  [{}]", timer_line(timer));
        }
        let _ = writeln!(out);
    }

    if view.position == CookPosition::Completed {
        let _ = writeln!(out);
        let _ = writeln!(out, "All steps done.");
    }

    out
}

/// Shown after every action that wasn't persisted.
pub fn save_warning(save: &SaveStatus) -> Option<String> {
    match save {
        SaveStatus::Saved => None,
        SaveStatus::NotSaved { error } => Some(format!(
            "! Not saved: {}. Your change is shown but will be lost on reload; repeat it to save again.",
            error
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hearth_core::{IngredientView, StepView};
    use uuid::Uuid;

    fn view() -> CookView {
        CookView {
            recipe_id: Uuid::nil(),
            title: "Pancakes".to_string(),
            position: CookPosition::Step(0),
            current_step_index: 0,
            step_count: 2,
            ingredients: vec![IngredientView {
                id: "flour".to_string(),
                text: "2 cups flour".to_string(),
                checked: true,
            }],
            steps: vec![
                StepView {
                    index: 0,
                    id: "mix".to_string(),
                    instruction: "Mix".to_string(),
                    complete: false,
                    current: true,
                    timer: None,
                },
                StepView {
                    index: 1,
                    id: "rest".to_string(),
                    instruction: "Rest the batter".to_string(),
                    complete: false,
                    current: false,
                    timer: Some(TimerView {
                        status: TimerStatus::Paused,
                        remaining_secs: 75,
                        duration_secs: 300,
                    }),
                },
            ],
            celebration: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_clock() {
        assert_eq!(clock(0), "00:00");
        assert_eq!(clock(75), "01:15");
        assert_eq!(clock(3725), "1:02:05");
    }

    #[test]
    fn test_cook_view_marks_current_step_and_timer() {
        let text = cook_view(&view());
        assert!(text.contains("Now at step 1"));
        assert!(text.contains("Ingredients (1/1 checked)"));
        assert!(text.contains("> [ ] 1. Mix"));
        assert!(text.contains("[paused 01:15 / 05:00]"));
    }

    #[test]
    fn test_save_warning_only_when_not_saved() {
        assert!(save_warning(&SaveStatus::Saved).is_none());
        let warning = save_warning(&SaveStatus::NotSaved {
            error: "Store unavailable".to_string(),
        });
        assert!(warning.is_some_and(|w| w.contains("Not saved")));
    }
}
