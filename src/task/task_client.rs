use async_trait::async_trait;
use reqwest::Response;
use tracing::{debug, error};

use crate::error::{RequestError, Result as AppResult};
use crate::state::Config;
use crate::task::task_dto::CreateTaskDto;
use crate::task::task_models::{Task, TaskId};

/// The three calls the client makes against the task API.
///
/// Each call is exactly one request: no retries, caching or deduplication.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Recent incomplete tasks in the order the server returns them.
    async fn list_recent_incomplete(&self) -> Result<Vec<Task>, RequestError>;

    async fn create_task(&self, dto: &CreateTaskDto) -> Result<Task, RequestError>;

    async fn complete_task(&self, id: TaskId) -> Result<(), RequestError>;
}

/// reqwest-backed [`TaskApi`] rooted at a base URL such as
/// `http://localhost:8080/api/tasks`.
#[derive(Clone)]
pub struct HttpTaskClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(RequestError::from)?;
        Ok(Self::with_client(config.api_base_url.clone(), client))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn recent_url(&self) -> String {
        format!("{}/recent", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

/// Turns a non-2xx response into a [`RequestError`].
fn check_status(response: Response, action: &str) -> Result<Response, RequestError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RequestError::from_status(action, status))
    }
}

/// Logs a failure on its way back to the caller.
fn logged<T>(result: Result<T, RequestError>, context: &str) -> Result<T, RequestError> {
    if let Err(ref e) = result {
        error!("Error {}: {}", context, e);
    }
    result
}

#[async_trait]
impl TaskApi for HttpTaskClient {
    async fn list_recent_incomplete(&self) -> Result<Vec<Task>, RequestError> {
        let url = self.recent_url();
        debug!(%url, "GET recent tasks");

        let result = async {
            let response = self.client.get(&url).send().await?;
            let response = check_status(response, "fetch tasks")?;
            Ok::<_, RequestError>(response.json::<Vec<Task>>().await?)
        }
        .await;

        logged(result, "fetching tasks")
    }

    async fn create_task(&self, dto: &CreateTaskDto) -> Result<Task, RequestError> {
        let url = self.base_url.clone();
        debug!(%url, title = %dto.title, "POST task");

        let result = async {
            let response = self.client.post(&url).json(dto).send().await?;
            let response = check_status(response, "create task")?;
            Ok::<_, RequestError>(response.json::<Task>().await?)
        }
        .await;

        logged(result, "creating task")
    }

    async fn complete_task(&self, id: TaskId) -> Result<(), RequestError> {
        let url = self.task_url(id);
        debug!(%url, id, "PUT task completion");

        let result = async {
            let response = self.client.put(&url).send().await?;
            check_status(response, "complete task")?;
            Ok::<_, RequestError>(())
        }
        .await;

        logged(result, "completing task")
    }
}
