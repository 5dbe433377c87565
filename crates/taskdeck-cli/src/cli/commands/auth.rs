//! Account command handlers.

use anyhow::Result;
use taskdeck_core::api::ApiClient;
use taskdeck_core::route::Route;
use taskdeck_core::screens::{self, ScreenOutcome};
use taskdeck_core::session::Session;

use super::finish;

/// A guest-only screen bounced a signed-in user back home.
fn already_logged_in(outcome: &ScreenOutcome) -> bool {
    outcome.message.is_none() && outcome.navigate == Some(Route::Home)
}

pub async fn register(
    client: &ApiClient,
    session: &Session,
    name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let outcome = screens::register(client, session, name, email, password).await?;
    if already_logged_in(&outcome) {
        println!("Already logged in. Run `taskdeck logout` to register another account.");
        return Ok(());
    }
    finish(&outcome)
}

pub async fn login(client: &ApiClient, session: &Session, email: &str, password: &str) -> Result<()> {
    let was_logged_in = session.is_authenticated()?;
    let outcome = screens::login(client, session, email, password).await?;
    if was_logged_in && already_logged_in(&outcome) {
        println!("Already logged in. Run `taskdeck logout` first to switch accounts.");
        return Ok(());
    }
    if outcome.navigate == Some(Route::Home) {
        println!("Logged in as {}.", email.trim());
    }
    finish(&outcome)
}

pub async fn forgot_password(client: &ApiClient, email: &str) -> Result<()> {
    finish(&screens::forgot_password(client, email).await)
}

pub async fn verify_otp(
    client: &ApiClient,
    email: &str,
    otp: &str,
    new_password: &str,
) -> Result<()> {
    finish(&screens::verify_otp(client, email, otp, new_password).await)
}

pub fn logout(session: &Session) -> Result<()> {
    let was_logged_in = session.is_authenticated()?;
    let route = session.clear()?;
    if was_logged_in {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    finish(&ScreenOutcome::navigate(route))
}
