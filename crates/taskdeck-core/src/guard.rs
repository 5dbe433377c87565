//! Session guard: the single token check every screen performs on entry.

use anyhow::Result;

use crate::route::Route;
use crate::session::Session;

/// Which side of the session boundary a screen lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenRole {
    /// Needs a token (task list).
    Authenticated,
    /// Only for signed-out users (login, register).
    GuestOnly,
    /// Reachable either way (forgot password, OTP verification).
    Public,
}

/// Result of the entry check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    /// Leave the screen immediately; render nothing else.
    Redirect(Route),
}

/// Reads the token once and decides whether the screen may render.
pub fn check(session: &Session, role: ScreenRole) -> Result<GuardDecision> {
    let decision = match role {
        ScreenRole::Public => GuardDecision::Proceed,
        ScreenRole::Authenticated => {
            if session.is_authenticated()? {
                GuardDecision::Proceed
            } else {
                GuardDecision::Redirect(Route::Login)
            }
        }
        ScreenRole::GuestOnly => {
            if session.is_authenticated()? {
                GuardDecision::Redirect(Route::Home)
            } else {
                GuardDecision::Proceed
            }
        }
    };

    if let GuardDecision::Redirect(route) = &decision {
        tracing::debug!(?role, %route, "guard redirect");
    }
    Ok(decision)
}
