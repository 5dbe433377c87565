//! Screens of the client and the transitions between them.

use std::fmt;

/// A screen the client can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    /// OTP entry; carries the email the code was sent to.
    VerifyOtp { email: String },
    /// The authenticated task list.
    Home,
}

impl Route {
    /// CLI invocation that opens this screen.
    pub fn command_hint(&self) -> String {
        match self {
            Route::Login => "taskdeck login --email <EMAIL> --password <PASSWORD>".to_string(),
            Route::Register => {
                "taskdeck register --name <NAME> --email <EMAIL> --password <PASSWORD>".to_string()
            }
            Route::ForgotPassword => "taskdeck forgot-password --email <EMAIL>".to_string(),
            Route::VerifyOtp { email } => format!(
                "taskdeck verify-otp --email {email} --otp <OTP> --new-password <PASSWORD>"
            ),
            Route::Home => "taskdeck tasks list".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => write!(f, "login"),
            Route::Register => write!(f, "register"),
            Route::ForgotPassword => write!(f, "forgot-password"),
            Route::VerifyOtp { .. } => write!(f, "verify-otp"),
            Route::Home => write!(f, "home"),
        }
    }
}
