//! Screen controllers.
//!
//! Each controller runs the entry guard, validates the form, makes the call
//! and turns the result into a [`ScreenOutcome`]: a message to show and/or a
//! screen to move to. Every failure path leaves the user on a screen they can
//! resubmit from.

use anyhow::Result;

use crate::api::tasks::Task;
use crate::api::{ApiClient, GENERIC_FAILURE};
use crate::guard::{self, GuardDecision, ScreenRole};
use crate::route::Route;
use crate::session::Session;
use crate::sync::{SyncError, TaskSync};
use crate::validation::{self, FieldErrors, Validation};

/// What the user sees after an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenOutcome {
    /// Transient notification text.
    pub message: Option<String>,
    /// Screen to move to; `None` stays on the current one.
    pub navigate: Option<Route>,
    /// Inline errors for fields that failed validation.
    pub field_errors: FieldErrors,
    /// The action was attempted and did not succeed.
    pub failed: bool,
}

impl ScreenOutcome {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn navigate(route: Route) -> Self {
        Self {
            navigate: Some(route),
            ..Self::default()
        }
    }

    pub fn message_and_navigate(message: impl Into<String>, route: Route) -> Self {
        Self {
            message: Some(message.into()),
            navigate: Some(route),
            ..Self::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            failed: true,
            ..Self::default()
        }
    }

    fn invalid(validation: Validation) -> Self {
        Self {
            message: validation.message(),
            field_errors: validation.errors,
            ..Self::default()
        }
    }

    /// True when validation blocked the submission.
    pub fn is_blocked(&self) -> bool {
        !self.field_errors.is_empty()
    }

    /// True when the user has to correct something and resubmit.
    pub fn is_error(&self) -> bool {
        self.failed || self.is_blocked()
    }
}

/// Runs the guard; `Some` means the screen must not render.
fn enter(session: &Session, role: ScreenRole) -> Result<Option<ScreenOutcome>> {
    Ok(match guard::check(session, role)? {
        GuardDecision::Proceed => None,
        GuardDecision::Redirect(route) => Some(ScreenOutcome::navigate(route)),
    })
}

pub async fn register(
    client: &ApiClient,
    session: &Session,
    name: &str,
    email: &str,
    password: &str,
) -> Result<ScreenOutcome> {
    if let Some(redirect) = enter(session, ScreenRole::GuestOnly)? {
        return Ok(redirect);
    }

    let validation = validation::validate_registration(name, email, password);
    if !validation.is_valid() {
        return Ok(ScreenOutcome::invalid(validation));
    }

    Ok(match client.register_user(name, email, password).await {
        Ok(resp) if resp.success => {
            ScreenOutcome::message_and_navigate("Registration successful!", Route::Login)
        }
        Ok(resp) => ScreenOutcome::failure(
            resp.message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Registration failed!".to_string()),
        ),
        Err(err) => ScreenOutcome::failure(err.user_message()),
    })
}

pub async fn login(
    client: &ApiClient,
    session: &Session,
    email: &str,
    password: &str,
) -> Result<ScreenOutcome> {
    if let Some(redirect) = enter(session, ScreenRole::GuestOnly)? {
        return Ok(redirect);
    }

    let validation = validation::validate_login(email, password);
    if !validation.is_valid() {
        return Ok(ScreenOutcome::invalid(validation));
    }

    match client.login_user(email, password).await {
        Ok(resp) => {
            if let Some(token) = resp.token() {
                session.save(token)?;
                tracing::info!("logged in");
                Ok(ScreenOutcome::navigate(Route::Home))
            } else {
                Ok(ScreenOutcome::failure(
                    resp.message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| "Login failed!".to_string()),
                ))
            }
        }
        Err(err) => Ok(ScreenOutcome::failure(err.user_message())),
    }
}

/// On success the email is carried to the OTP screen.
pub async fn forgot_password(client: &ApiClient, email: &str) -> ScreenOutcome {
    let validation = validation::validate_forgot_password(email);
    if !validation.is_valid() {
        return ScreenOutcome::invalid(validation);
    }

    match client.forgot_password(email).await {
        Ok(resp) if resp.message().is_some() => ScreenOutcome::message_and_navigate(
            "OTP sent to your email!",
            Route::VerifyOtp {
                email: email.to_string(),
            },
        ),
        Ok(_) => ScreenOutcome::failure("Failed to send OTP!"),
        Err(err) => ScreenOutcome::failure(err.user_message()),
    }
}

pub async fn verify_otp(
    client: &ApiClient,
    email: &str,
    otp: &str,
    new_password: &str,
) -> ScreenOutcome {
    let validation = validation::validate_otp(otp, new_password);
    if !validation.is_valid() {
        return ScreenOutcome::invalid(validation);
    }

    match client.verify_otp(email, otp, new_password).await {
        Ok(resp) if resp.message().is_some() => ScreenOutcome::message_and_navigate(
            "OTP Verified! Password reset successfully.",
            Route::Login,
        ),
        Ok(_) => ScreenOutcome::failure("Invalid OTP!"),
        Err(err) => ScreenOutcome::failure(err.user_message()),
    }
}

/// The authenticated task list.
pub struct HomeScreen {
    sync: TaskSync,
}

impl HomeScreen {
    pub fn new(client: ApiClient, session: Session) -> Self {
        Self {
            sync: TaskSync::new(client, session),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.sync.tasks()
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.sync.find(id)
    }

    /// Guard check followed by the initial load.
    ///
    /// Returns a redirect outcome when there is no session; a message when
    /// the load failed; an empty outcome otherwise.
    pub async fn enter(&mut self) -> Result<ScreenOutcome> {
        if let Some(redirect) = enter(self.sync.session(), ScreenRole::Authenticated)? {
            return Ok(redirect);
        }
        Ok(self.refresh().await)
    }

    pub async fn refresh(&mut self) -> ScreenOutcome {
        match self.sync.list().await {
            Ok(_) => ScreenOutcome::default(),
            Err(err) => {
                tracing::warn!(error = %err, "loading tasks failed");
                ScreenOutcome::failure(GENERIC_FAILURE)
            }
        }
    }

    /// Creates a task, or updates `selected` when editing.
    pub async fn save_task(
        &mut self,
        selected: Option<&str>,
        title: &str,
        description: &str,
    ) -> ScreenOutcome {
        let validation = validation::validate_task(title, description);
        if !validation.is_valid() {
            return ScreenOutcome::invalid(validation);
        }

        let result = match selected {
            Some(id) => self.sync.update(id, title, description).await.map(|_| ()),
            None => self.sync.create(title, description).await.map(|_| ()),
        };

        match result {
            Ok(()) => ScreenOutcome::message("Task saved successfully!"),
            Err(SyncError::Reload(err)) => {
                tracing::warn!(error = %err, "reload after save failed");
                ScreenOutcome::message("Task saved successfully!")
            }
            Err(SyncError::Write(err)) => {
                tracing::warn!(error = %err, "saving task failed");
                ScreenOutcome::failure("Error saving task!")
            }
        }
    }

    pub async fn delete_task(&mut self, id: &str) -> ScreenOutcome {
        match self.sync.delete(id).await {
            Ok(_) => ScreenOutcome::message("Task deleted!"),
            Err(SyncError::Reload(err)) => {
                tracing::warn!(error = %err, "reload after delete failed");
                ScreenOutcome::message("Task deleted!")
            }
            Err(SyncError::Write(err)) => {
                tracing::warn!(error = %err, "deleting task failed");
                ScreenOutcome::failure("Error deleting task!")
            }
        }
    }

    pub fn logout(&self) -> Result<ScreenOutcome> {
        let route = self.sync.session().clear()?;
        Ok(ScreenOutcome::navigate(route))
    }
}
