use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use taskdesk_shared::{NewTask, Task, TaskId};
use url::Url;

use crate::error::ApiError;

/// CRUD surface of the remote task service.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, ApiError>;
    async fn create(&self, task: &NewTask) -> Result<Task, ApiError>;
    /// Sends the whole record; the API has no partial updates.
    async fn update(&self, task: &Task) -> Result<(), ApiError>;
    async fn delete(&self, id: TaskId) -> Result<(), ApiError>;
}

/// `TaskApi` over HTTP/JSON at `{base}/api/tasks`.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    tasks_url: Url,
}

impl HttpTaskApi {
    pub fn new(tasks_url: Url) -> Self {
        Self {
            client: Client::new(),
            tasks_url,
        }
    }

    pub fn tasks_url(&self) -> &Url {
        &self.tasks_url
    }

    fn task_url(&self, id: TaskId) -> Result<Url, ApiError> {
        let mut url = self.tasks_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.tasks_url.to_string()))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }

    async fn send(
        method: &'static str,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        log::debug!("{method} {url}");
        let response = request.send().await.map_err(|source| ApiError::Request {
            method,
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                method,
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }

    async fn json<T: serde::de::DeserializeOwned>(
        method: &'static str,
        url: &Url,
        response: Response,
    ) -> Result<T, ApiError> {
        response.json().await.map_err(|source| ApiError::Request {
            method,
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let url = &self.tasks_url;
        let response = Self::send("GET", url, self.client.get(url.clone())).await?;
        Self::json("GET", url, response).await
    }

    async fn create(&self, task: &NewTask) -> Result<Task, ApiError> {
        let url = &self.tasks_url;
        let response = Self::send("POST", url, self.client.post(url.clone()).json(task)).await?;
        Self::json("POST", url, response).await
    }

    async fn update(&self, task: &Task) -> Result<(), ApiError> {
        let url = self.task_url(task.id)?;
        Self::send("PUT", &url, self.client.put(url.clone()).json(task)).await?;
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), ApiError> {
        let url = self.task_url(id)?;
        Self::send("DELETE", &url, self.client.delete(url.clone())).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use taskdesk_shared::{Priority, TaskStatus};

    fn api_for(server: &mockito::Server) -> HttpTaskApi {
        let url = Url::parse(&format!("{}/api/tasks", server.url())).unwrap();
        HttpTaskApi::new(url)
    }

    fn task_json(id: i64, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "clientName": "Acme",
            "projectName": "Site",
            "title": "Draft",
            "description": "",
            "status": status,
            "priority": "medium",
            "dueDate": "2024-01-01T00:00:00.000Z",
            "estimatedHours": 3.0,
        })
    }

    #[tokio::test]
    async fn list_fetches_all_tasks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/tasks")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!([task_json(1, "todo"), task_json(2, "done")]).to_string())
            .create_async()
            .await;

        let tasks = api_for(&server).list().await.unwrap();

        mock.assert_async().await;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn create_posts_the_draft_and_returns_the_server_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/tasks")
            .match_body(Matcher::PartialJson(json!({
                "clientName": "Acme",
                "status": "todo",
                "estimatedHours": 3.0,
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(task_json(42, "todo").to_string())
            .create_async()
            .await;

        let draft = NewTask {
            client_name: "Acme".into(),
            project_name: "Site".into(),
            title: "Draft".into(),
            description: String::new(),
            priority: Priority::Medium,
            estimated_hours: 3.0,
            status: TaskStatus::Todo,
            due_date: "2024-01-01T00:00:00.000Z".into(),
        };
        let created = api_for(&server).create(&draft).await.unwrap();

        mock.assert_async().await;
        assert_eq!(created.id, 42);
    }

    #[tokio::test]
    async fn update_puts_the_full_record_to_the_task_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/tasks/5")
            .match_body(Matcher::Json(task_json(5, "done")))
            .with_status(200)
            .create_async()
            .await;

        let task: Task = serde_json::from_value(task_json(5, "done")).unwrap();
        api_for(&server).update(&task).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_hits_the_task_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/tasks/9")
            .with_status(204)
            .create_async()
            .await;

        api_for(&server).delete(9).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/api/tasks/9")
            .with_status(500)
            .create_async()
            .await;

        let err = api_for(&server).delete(9).await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status, .. } if status.as_u16() == 500));
    }

    #[test]
    fn task_url_appends_the_id_once() {
        let api = HttpTaskApi::new(Url::parse("http://localhost:3000/api/tasks/").unwrap());
        assert_eq!(
            api.task_url(3).unwrap().as_str(),
            "http://localhost:3000/api/tasks/3"
        );
    }
}
