//! Task endpoints (bearer-authenticated).
//!
//! The token is attached when the session has one. Without it the request is
//! still sent and the service is left to reject it.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

const TASKS_PATH: &str = "/tasks/";

/// A task as stored by the service. Identity is assigned remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
struct TaskBody<'a> {
    title: &'a str,
    description: &'a str,
}

/// Ids are opaque; encode them so they stay a single path segment.
fn task_path(id: &str) -> String {
    format!("/tasks/{}", urlencoding::encode(id))
}

impl ApiClient {
    pub async fn list_tasks(&self, token: Option<&str>) -> Result<Vec<Task>, ApiError> {
        let request = self.request(Method::GET, TASKS_PATH, token);
        self.send_json(request).await
    }

    pub async fn create_task(
        &self,
        token: Option<&str>,
        title: &str,
        description: &str,
    ) -> Result<(), ApiError> {
        let request = self
            .request(Method::POST, TASKS_PATH, token)
            .json(&TaskBody { title, description });
        self.send(request).await?;
        Ok(())
    }

    pub async fn update_task(
        &self,
        token: Option<&str>,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<(), ApiError> {
        let request = self
            .request(Method::PUT, &task_path(id), token)
            .json(&TaskBody { title, description });
        self.send(request).await?;
        Ok(())
    }

    pub async fn delete_task(&self, token: Option<&str>, id: &str) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &task_path(id), token);
        self.send(request).await?;
        Ok(())
    }
}
