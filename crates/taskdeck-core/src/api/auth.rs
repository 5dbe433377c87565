//! Account endpoints: signup, login, password reset by OTP.
//!
//! These calls never touch local state. Callers persist the token and decide
//! where to navigate.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

const SIGNUP_PATH: &str = "/auth/signup";
const LOGIN_PATH: &str = "/auth/login";
const FORGOT_PASSWORD_PATH: &str = "/auth/forgot-password";
const VERIFY_OTP_PATH: &str = "/auth/verify-otp";

#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOtpRequest<'a> {
    email: &'a str,
    otp: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Success is signaled by the presence of `token`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// The token, if the service issued a non-empty one.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Forgot-password and verify-OTP both answer with just a message; its
/// presence means the step succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageResponse {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

impl ApiClient {
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SignupResponse, ApiError> {
        let body = SignupRequest {
            name,
            email,
            password,
        };
        let request = self.request(Method::POST, SIGNUP_PATH, None).json(&body);
        self.send_json(request).await
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest { email, password };
        let request = self.request(Method::POST, LOGIN_PATH, None).json(&body);
        self.send_json(request).await
    }

    /// Asks the service to email a one-time passcode.
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let body = ForgotPasswordRequest { email };
        let request = self
            .request(Method::POST, FORGOT_PASSWORD_PATH, None)
            .json(&body);
        self.send_json(request).await
    }

    /// Consumes the OTP and sets the new password. Wrong and expired codes are
    /// indistinguishable here.
    pub async fn verify_otp(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body = VerifyOtpRequest {
            email,
            otp,
            new_password,
        };
        let request = self.request(Method::POST, VERIFY_OTP_PATH, None).json(&body);
        self.send_json(request).await
    }
}
