//! Core taskdeck library (session, API client, task sync, validation, config).

pub mod api;
pub mod config;
pub mod guard;
pub mod logging;
pub mod route;
pub mod screens;
pub mod session;
pub mod sync;
pub mod validation;
