//! Integration tests for the account screens against a mock auth service.

use std::sync::Arc;

use serde_json::json;
use taskdeck_core::api::{ApiClient, GENERIC_FAILURE};
use taskdeck_core::route::Route;
use taskdeck_core::screens::{self, HomeScreen};
use taskdeck_core::session::{FileTokenStore, MemoryTokenStore, Session};
use taskdeck_core::validation::Field;
use tempfile::tempdir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(format!("{}/api", server.uri()), None).unwrap()
}

fn guest() -> Session {
    Session::new(Arc::new(MemoryTokenStore::new()))
}

#[tokio::test]
async fn test_login_success_persists_token_and_goes_home() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "a@b.co", "password": "secret1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let store_path = dir.path().join("session.json");
    let session = Session::new(Arc::new(FileTokenStore::new(&store_path)));

    let outcome = screens::login(&client(&server), &session, "a@b.co", "secret1")
        .await
        .unwrap();

    assert_eq!(outcome.navigate, Some(Route::Home));
    assert!(!outcome.is_error());
    assert_eq!(session.get().unwrap().as_deref(), Some("abc"));

    // A fresh store on the same file sees the token.
    let reopened = Session::new(Arc::new(FileTokenStore::new(&store_path)));
    assert!(reopened.is_authenticated().unwrap());
}

#[tokio::test]
async fn test_login_rejected_shows_server_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let session = guest();
    let outcome = screens::login(&client(&server), &session, "a@b.co", "wrongpass")
        .await
        .unwrap();

    assert_eq!(outcome.message.as_deref(), Some("Invalid credentials"));
    assert_eq!(outcome.navigate, None);
    assert!(outcome.is_error());
    assert_eq!(session.get().unwrap(), None);
}

#[tokio::test]
async fn test_login_success_status_without_token_stays_put() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let session = guest();
    let outcome = screens::login(&client(&server), &session, "a@b.co", "secret1")
        .await
        .unwrap();

    assert_eq!(outcome.message.as_deref(), Some("Invalid credentials"));
    assert_eq!(outcome.navigate, None);
    assert!(!session.is_authenticated().unwrap());
}

#[tokio::test]
async fn test_blank_login_makes_no_request() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc"})))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = screens::login(&client(&server), &guest(), "   ", "")
        .await
        .unwrap();

    assert!(outcome.is_blocked());
    assert_eq!(
        outcome.message.as_deref(),
        Some("Email and password are required!")
    );
    assert_eq!(outcome.navigate, None);
}

#[tokio::test]
async fn test_login_while_signed_in_redirects_home() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = Session::new(Arc::new(MemoryTokenStore::with_token("existing")));
    let outcome = screens::login(&client(&server), &session, "a@b.co", "secret1")
        .await
        .unwrap();

    assert_eq!(outcome.navigate, Some(Route::Home));
    assert_eq!(session.get().unwrap().as_deref(), Some("existing"));
}

#[tokio::test]
async fn test_transport_failure_shows_generic_message() {
    // Nothing listens on the discard port.
    let client = ApiClient::new("http://127.0.0.1:9/api", None).unwrap();
    let session = guest();

    let outcome = screens::login(&client, &session, "a@b.co", "secret1")
        .await
        .unwrap();

    assert_eq!(outcome.message.as_deref(), Some(GENERIC_FAILURE));
    assert_eq!(outcome.navigate, None);
    assert!(!session.is_authenticated().unwrap());
}

#[tokio::test]
async fn test_register_success_goes_to_login() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(body_json(
            json!({"name": "Ada", "email": "ada@x.io", "password": "secret1"}),
        ))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"success": true, "message": "User created"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = guest();
    let outcome = screens::register(&client(&server), &session, "Ada", "ada@x.io", "secret1")
        .await
        .unwrap();

    assert_eq!(outcome.navigate, Some(Route::Login));
    assert_eq!(outcome.message.as_deref(), Some("Registration successful!"));
    assert!(!session.is_authenticated().unwrap());
}

#[tokio::test]
async fn test_register_duplicate_email_message_is_verbatim() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "User already exists"})),
        )
        .mount(&server)
        .await;

    let outcome = screens::register(&client(&server), &guest(), "Ada", "ada@x.io", "secret1")
        .await
        .unwrap();

    assert_eq!(outcome.message.as_deref(), Some("User already exists"));
    assert_eq!(outcome.navigate, None);
}

#[tokio::test]
async fn test_register_invalid_fields_block_submission() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = screens::register(&client(&server), &guest(), "", "not-an-email", "123")
        .await
        .unwrap();

    assert!(outcome.is_blocked());
    assert!(outcome.field_errors.get(Field::Name).is_some());
    assert_eq!(
        outcome.field_errors.get(Field::Email),
        Some("Enter a valid email address")
    );
    assert_eq!(
        outcome.field_errors.get(Field::Password),
        Some("Password must be at least 6 characters")
    );
}

#[tokio::test]
async fn test_forgot_password_success_carries_email() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/forgot-password"))
        .and(body_json(json!({"email": "ada@x.io"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "OTP sent"})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = screens::forgot_password(&client(&server), "ada@x.io").await;

    assert_eq!(outcome.message.as_deref(), Some("OTP sent to your email!"));
    assert_eq!(
        outcome.navigate,
        Some(Route::VerifyOtp {
            email: "ada@x.io".to_string()
        })
    );
}

#[tokio::test]
async fn test_forgot_password_without_message_is_failure() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/forgot-password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let outcome = screens::forgot_password(&client(&server), "ada@x.io").await;

    assert_eq!(outcome.message.as_deref(), Some("Failed to send OTP!"));
    assert_eq!(outcome.navigate, None);
}

#[tokio::test]
async fn test_verify_otp_sends_new_password_and_goes_to_login() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .and(body_json(json!({
            "email": "ada@x.io",
            "otp": "123456",
            "newPassword": "newpass1"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Password reset"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = screens::verify_otp(&client(&server), "ada@x.io", "123456", "newpass1").await;

    assert_eq!(
        outcome.message.as_deref(),
        Some("OTP Verified! Password reset successfully.")
    );
    assert_eq!(outcome.navigate, Some(Route::Login));
}

#[tokio::test]
async fn test_verify_otp_rejected_stays_on_screen() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid or expired OTP"})),
        )
        .mount(&server)
        .await;

    let outcome = screens::verify_otp(&client(&server), "ada@x.io", "000000", "newpass1").await;

    assert_eq!(outcome.message.as_deref(), Some("Invalid or expired OTP"));
    assert_eq!(outcome.navigate, None);
}

#[tokio::test]
async fn test_home_without_session_redirects_to_login() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut home = HomeScreen::new(client(&server), guest());
    let outcome = home.enter().await.unwrap();

    assert_eq!(outcome.navigate, Some(Route::Login));
    assert!(home.tasks().is_empty());
}

#[tokio::test]
async fn test_home_save_and_delete_messages() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "t1", "title": "Buy milk", "description": "2 liters"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Deleted"})))
        .mount(&server)
        .await;

    let session = Session::new(Arc::new(MemoryTokenStore::with_token("abc")));
    let mut home = HomeScreen::new(client(&server), session);

    let outcome = home.enter().await.unwrap();
    assert_eq!(outcome.navigate, None);
    assert_eq!(home.tasks().len(), 1);

    let outcome = home.save_task(None, "Walk dog", "").await;
    assert!(outcome.is_blocked());
    assert_eq!(
        outcome.message.as_deref(),
        Some("Title and Description are required!")
    );

    let outcome = home.save_task(None, "Walk dog", "Evening").await;
    assert_eq!(outcome.message.as_deref(), Some("Error saving task!"));

    let outcome = home.delete_task("t1").await;
    assert_eq!(outcome.message.as_deref(), Some("Task deleted!"));
}

#[tokio::test]
async fn test_home_logout_clears_session() {
    let session = Session::new(Arc::new(MemoryTokenStore::with_token("abc")));
    let client = ApiClient::new("http://127.0.0.1:9/api", None).unwrap();
    let home = HomeScreen::new(client, session.clone());

    let outcome = home.logout().unwrap();

    assert_eq!(outcome.navigate, Some(Route::Login));
    assert!(!session.is_authenticated().unwrap());
}
