use crate::error::{PrintmockError, PrintmockResult};

/// Opaque identifier issued by the rendering provider for one in-flight job.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TaskKey(pub String);

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-reported job status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
    Failed,
}

/// One rendered mockup in a completed task.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MockupFile {
    /// Print placement this mockup shows (e.g. "front", "default").
    pub placement: String,
    /// URL of the provider-rendered mockup image.
    pub url: String,
}

/// One poll response for a task.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TaskPoll {
    pub status: TaskStatus,
    #[serde(default)]
    pub mockups: Vec<MockupFile>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TaskPoll {
    pub fn pending() -> Self {
        Self {
            status: TaskStatus::Pending,
            mockups: Vec::new(),
            error: None,
        }
    }

    pub fn completed(mockups: Vec<MockupFile>) -> Self {
        Self {
            status: TaskStatus::Completed,
            mockups,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failed,
            mockups: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The two-call submit/poll contract of the external rendering API.
///
/// Transport and auth are the implementation's business; the orchestrator
/// only cares about the three terminal outcomes.
#[allow(async_fn_in_trait)]
pub trait RenderProvider {
    /// Submit a generation job; the provider acknowledges with a task key.
    async fn create_task(
        &self,
        variant_ids: &[u64],
        design_image_url: &str,
        format: &str,
    ) -> PrintmockResult<TaskKey>;

    /// Fetch the current status of a submitted task.
    async fn poll_task(&self, key: &TaskKey) -> PrintmockResult<TaskPoll>;
}

/// HTTP implementation of the provider contract: JSON bodies, bearer auth,
/// `POST {base}/mockup-tasks` to submit and `GET {base}/mockup-tasks/{key}`
/// to poll.
#[derive(Clone, Debug)]
pub struct HttpRenderProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(serde::Serialize)]
struct CreateTaskRequest<'a> {
    variant_ids: &'a [u64],
    design_image_url: &'a str,
    format: &'a str,
}

#[derive(serde::Deserialize)]
struct CreateTaskResponse {
    task_key: String,
}

impl HttpRenderProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!("{}/{suffix}", self.base_url.trim_end_matches('/'))
    }
}

impl RenderProvider for HttpRenderProvider {
    async fn create_task(
        &self,
        variant_ids: &[u64],
        design_image_url: &str,
        format: &str,
    ) -> PrintmockResult<TaskKey> {
        let url = self.endpoint("mockup-tasks");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CreateTaskRequest {
                variant_ids,
                design_image_url,
                format,
            })
            .send()
            .await
            .map_err(|e| PrintmockError::fetch(format!("POST {url}: {e}")))?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(PrintmockError::provider_rejected(format!(
                "task submission returned {status}: {}",
                body.trim()
            )));
        }
        if !status.is_success() {
            return Err(PrintmockError::fetch(format!("POST {url}: status {status}")));
        }

        let parsed: CreateTaskResponse = response
            .json()
            .await
            .map_err(|e| PrintmockError::serde(format!("parse create-task response: {e}")))?;
        Ok(TaskKey(parsed.task_key))
    }

    async fn poll_task(&self, key: &TaskKey) -> PrintmockResult<TaskPoll> {
        let url = self.endpoint(&format!("mockup-tasks/{key}"));
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| PrintmockError::fetch(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrintmockError::fetch(format!("GET {url}: status {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| PrintmockError::serde(format!("parse poll response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_response_parses_minimal_and_full_payloads() {
        let pending: TaskPoll = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(pending.status, TaskStatus::Pending);
        assert!(pending.mockups.is_empty());
        assert!(pending.error.is_none());

        let completed: TaskPoll = serde_json::from_str(
            r#"{"status":"completed","mockups":[{"placement":"front","url":"http://cdn.test/m.png"}]}"#,
        )
        .unwrap();
        assert_eq!(completed.status, TaskStatus::Completed);
        assert_eq!(completed.mockups[0].placement, "front");

        let failed: TaskPoll =
            serde_json::from_str(r#"{"status":"failed","error":"invalid file"}"#).unwrap();
        assert_eq!(failed.status, TaskStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("invalid file"));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let p = HttpRenderProvider::new("https://render.example.com/", "k");
        assert_eq!(
            p.endpoint("mockup-tasks"),
            "https://render.example.com/mockup-tasks"
        );
    }
}
