//! Client-side form validation.
//!
//! Pure functions over the current field values. A form that fails here is
//! never submitted.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Same shape check the service's web clients use: something, `@`, something,
/// a dot, something.
const EMAIL_PATTERN: &str = r"\S+@\S+\.\S+";

pub const MIN_PASSWORD_LEN: usize = 6;

/// A form field that can carry an inline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Email,
    Password,
    Otp,
    NewPassword,
    Title,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Password => "password",
            Field::Otp => "otp",
            Field::NewPassword => "new password",
            Field::Title => "title",
            Field::Description => "description",
        };
        f.write_str(name)
    }
}

/// Field name -> message. An absent entry means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

/// Outcome of validating one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: FieldErrors,
    /// Single banner message for forms that report errors as a whole.
    pub summary: Option<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message to show when the form is rejected: the summary if the form has
    /// one, otherwise the first field error.
    pub fn message(&self) -> Option<String> {
        self.summary
            .clone()
            .or_else(|| self.errors.iter().next().map(|(_, msg)| msg.to_string()))
    }

    fn with_summary(errors: FieldErrors, summary: &str) -> Self {
        let summary = (!errors.is_empty()).then(|| summary.to_string());
        Self { errors, summary }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn name_error(name: &str) -> Option<&'static str> {
    is_blank(name).then_some("Name is required")
}

pub fn email_error(email: &str) -> Option<&'static str> {
    if is_blank(email) {
        Some("Email is required")
    } else if !is_valid_email(email) {
        Some("Enter a valid email address")
    } else {
        None
    }
}

/// Length is counted in characters; content is not inspected.
pub fn password_error(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some("Password is required")
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        Some("Password must be at least 6 characters")
    } else {
        None
    }
}

pub fn validate_registration(name: &str, email: &str, password: &str) -> Validation {
    let mut errors = FieldErrors::new();
    if let Some(msg) = name_error(name) {
        errors.insert(Field::Name, msg);
    }
    if let Some(msg) = email_error(email) {
        errors.insert(Field::Email, msg);
    }
    if let Some(msg) = password_error(password) {
        errors.insert(Field::Password, msg);
    }
    Validation {
        errors,
        summary: None,
    }
}

pub fn validate_login(email: &str, password: &str) -> Validation {
    let mut errors = FieldErrors::new();
    if is_blank(email) {
        errors.insert(Field::Email, "Email is required");
    }
    if is_blank(password) {
        errors.insert(Field::Password, "Password is required");
    }
    Validation::with_summary(errors, "Email and password are required!")
}

pub fn validate_forgot_password(email: &str) -> Validation {
    let mut errors = FieldErrors::new();
    if is_blank(email) {
        errors.insert(Field::Email, "Email is required");
    }
    Validation::with_summary(errors, "Email is required!")
}

pub fn validate_otp(otp: &str, new_password: &str) -> Validation {
    let mut errors = FieldErrors::new();
    if is_blank(otp) {
        errors.insert(Field::Otp, "OTP is required");
    }
    if is_blank(new_password) {
        errors.insert(Field::NewPassword, "New password is required");
    }
    Validation::with_summary(errors, "OTP and new password are required!")
}

pub fn validate_task(title: &str, description: &str) -> Validation {
    let mut errors = FieldErrors::new();
    if title.is_empty() {
        errors.insert(Field::Title, "Title is required");
    }
    if description.is_empty() {
        errors.insert(Field::Description, "Description is required");
    }
    Validation::with_summary(errors, "Title and Description are required!")
}
