//! Cook mode commands.

use std::io::{IsTerminal, Write};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use hearth_core::{CookAction, CookView, StepTimer, TimerStatus, INGREDIENTS_INDEX};
use uuid::Uuid;

use crate::client::{ApiClient, CookActionResponse, CookReply};
use crate::render;

/// While watching a timer, progress is written back this often.
const PERSIST_EVERY_SECS: u32 = 5;

/// Where `hearth cook jump` should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    Ingredients,
    /// 1-based step number
    Step(usize),
    Finish,
}

impl JumpTarget {
    pub fn index(self, step_count: usize) -> i64 {
        match self {
            JumpTarget::Ingredients => INGREDIENTS_INDEX,
            JumpTarget::Step(n) => n as i64 - 1,
            JumpTarget::Finish => step_count as i64,
        }
    }
}

impl FromStr for JumpTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ingredients" => Ok(JumpTarget::Ingredients),
            "finish" | "done" => Ok(JumpTarget::Finish),
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(JumpTarget::Step(n)),
                _ => Err(format!(
                    "expected a step number, `ingredients` or `finish`, got `{}`",
                    s
                )),
            },
        }
    }
}

/// Step numbers on the command line are 1-based.
pub fn step_index(number: usize) -> Result<usize> {
    match number.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("Step numbers start at 1"),
    }
}

pub async fn show(client: &ApiClient, recipe_id: Uuid) -> Result<()> {
    let view = client.cook_state(recipe_id).await?;
    print!("{}", render::cook_view(&view));
    Ok(())
}

pub async fn jump(client: &ApiClient, recipe_id: Uuid, target: JumpTarget, confirmed: bool) -> Result<()> {
    let view = client.cook_state(recipe_id).await?;
    let target_index = target.index(view.step_count);
    if target_index > view.step_count as i64 {
        bail!("{} only has {} steps", view.title, view.step_count);
    }
    run(
        client,
        recipe_id,
        &CookAction::JumpTo {
            target_index,
            confirmed,
        },
    )
    .await
}

/// Send one action and print the result.
pub async fn run(client: &ApiClient, recipe_id: Uuid, action: &CookAction) -> Result<()> {
    let response = send(client, recipe_id, action).await?;
    print!("{}", render::cook_view(&response.state));
    for step_id in &response.outcome.expired_timers {
        println!("Timer for {} is done.", step_id);
    }
    report_save(&response);
    celebrate(&response.state).await;
    Ok(())
}

async fn send(client: &ApiClient, recipe_id: Uuid, action: &CookAction) -> Result<CookActionResponse> {
    match client.cook_action(recipe_id, action).await? {
        CookReply::Applied(response) => Ok(response),
        CookReply::Rejected {
            message,
            confirmation_required: true,
        } => bail!("{}. Run again with --yes to go ahead anyway.", message),
        CookReply::Rejected { message, .. } => bail!("{}", message),
    }
}

fn report_save(response: &CookActionResponse) {
    if let Some(warning) = render::save_warning(&response.save) {
        eprintln!("{}", warning);
    }
}

/// Show the completion banner until it expires.
async fn celebrate(view: &CookView) {
    let Some(celebration) = view.celebration else {
        return;
    };
    println!();
    println!("*** {} is done. Enjoy! ***", view.title);

    if !std::io::stdout().is_terminal() {
        return;
    }
    let remaining = (celebration.visible_until - Utc::now())
        .to_std()
        .unwrap_or(Duration::ZERO);
    tokio::time::sleep(remaining).await;
}

/// Count a step's timer down in the terminal. The countdown runs locally;
/// the server is updated every few seconds, on expiry and on Ctrl-C (which
/// also pauses the timer).
pub async fn watch(client: &ApiClient, recipe_id: Uuid, index: usize) -> Result<()> {
    let view = client.cook_state(recipe_id).await?;
    let step = view
        .steps
        .get(index)
        .with_context(|| format!("{} has no step {}", view.title, index + 1))?;
    let Some(current) = step.timer.clone() else {
        bail!("Step {} has no timer", index + 1);
    };

    let current = match current.status {
        TimerStatus::Expired => {
            println!(
                "Timer for step {} is already done. Reset it with `hearth cook {} timer reset {}`.",
                index + 1,
                recipe_id,
                index + 1
            );
            return Ok(());
        }
        TimerStatus::Running => current,
        TimerStatus::NotStarted | TimerStatus::Paused => {
            let response = send(client, recipe_id, &CookAction::StartTimer { index }).await?;
            report_save(&response);
            response
                .state
                .steps
                .get(index)
                .and_then(|s| s.timer.clone())
                .context("Server returned no timer after starting it")?
        }
    };

    let mut timer = StepTimer {
        duration_secs: current.duration_secs,
        remaining_secs: current.remaining_secs,
        running: true,
        started_at: Some(Utc::now()),
    };
    let step_id = step.id.clone();

    println!("Step {}: {}", index + 1, step.instruction);
    println!("Ctrl-C pauses the timer.");

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // First tick completes immediately
    interval.tick().await;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut unsent = 0u32;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let mut expired = timer.tick(1);
                unsent += 1;
                print!("\r{}   ", render::clock(timer.remaining_secs));
                let _ = std::io::stdout().flush();

                if expired || unsent >= PERSIST_EVERY_SECS {
                    let response = send(
                        client,
                        recipe_id,
                        &CookAction::Tick { elapsed_secs: unsent },
                    )
                    .await?;
                    unsent = 0;
                    report_save(&response);

                    // Follow the server if the two drifted apart
                    if let Some(server_timer) = response.state.steps.get(index).and_then(|s| s.timer.as_ref()) {
                        timer.remaining_secs = server_timer.remaining_secs;
                    }
                    expired = expired || response.outcome.expired_timers.contains(&step_id);
                }

                if expired {
                    println!();
                    println!(
                        "Time's up for step {}! Mark it done with `hearth cook {} complete {}`.",
                        index + 1,
                        recipe_id,
                        index + 1
                    );
                    return Ok(());
                }
            }
            _ = &mut ctrl_c => {
                println!();
                if unsent > 0 {
                    let response = send(client, recipe_id, &CookAction::Tick { elapsed_secs: unsent }).await?;
                    report_save(&response);
                }
                let response = send(client, recipe_id, &CookAction::PauseTimer { index }).await?;
                report_save(&response);
                println!("Paused with {} left.", render::clock(timer.remaining_secs));
                return Ok(());
            }
        }
    }
}
