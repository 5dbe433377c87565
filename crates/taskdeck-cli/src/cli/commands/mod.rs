//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod tasks;

use anyhow::Result;
use taskdeck_core::api::GENERIC_FAILURE;
use taskdeck_core::screens::ScreenOutcome;

/// Prints a screen outcome, failing the command when the action did not go
/// through.
fn finish(outcome: &ScreenOutcome) -> Result<()> {
    for (field, error) in outcome.field_errors.iter() {
        eprintln!("  {field}: {error}");
    }

    if outcome.is_error() {
        anyhow::bail!(
            "{}",
            outcome
                .message
                .as_deref()
                .unwrap_or(GENERIC_FAILURE)
        );
    }

    if let Some(message) = &outcome.message {
        println!("{message}");
    }
    if let Some(route) = &outcome.navigate {
        println!("Next: {}", route.command_hint());
    }
    Ok(())
}
