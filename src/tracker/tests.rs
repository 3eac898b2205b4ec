use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::stories::{self, TaskUpdate};
use super::{ApiError, TrackerApi};
use crate::model::story::{StoryId, StoryState};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// A tracker that replays queued GET responses and records every request.
/// Queued entries are either a JSON body or an HTTP status to fail with.
#[derive(Default)]
pub struct MockApi {
    pub calls: Arc<Mutex<Vec<Call>>>,
    gets: Mutex<VecDeque<Result<Option<Value>, u16>>>,
    fail_mutations: Option<u16>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_get(self, response: Result<Option<Value>, u16>) -> Self {
        self.gets.lock().unwrap().push_back(response);
        self
    }

    pub fn failing_mutations(mut self, status: u16) -> Self {
        self.fail_mutations = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, path: &str, body: Option<Value>) {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
        });
    }

    fn mutation(&self) -> Result<Option<Value>, ApiError> {
        match self.fail_mutations {
            Some(status) => Err(ApiError::Status { status }),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TrackerApi for MockApi {
    async fn get(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.record("GET", path, None);
        match self.gets.lock().unwrap().pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(status)) => Err(ApiError::Status { status }),
            None => Err(ApiError::Status { status: 404 }),
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Option<Value>, ApiError> {
        self.record("POST", path, Some(body));
        self.mutation()
    }

    async fn put(&self, path: &str, body: Value) -> Result<Option<Value>, ApiError> {
        self.record("PUT", path, Some(body));
        self.mutation()
    }

    async fn delete(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.record("DELETE", path, None);
        self.mutation()
    }
}

pub fn story_json(id: u64) -> Value {
    json!({
        "id": id,
        "name": "Add login",
        "story_type": "bug",
        "current_state": "started",
        "tasks": [
            {"id": 1, "description": "write form", "complete": false},
            {"id": 2, "description": "wire backend", "complete": true}
        ],
        "labels": [{"name": "auth"}],
        "comments": [{
            "id": 5,
            "text": "on it",
            "created_at": "2024-03-01T10:00:00Z",
            "person": {"name": "Sam Doe"}
        }]
    })
}

fn sid() -> StoryId {
    StoryId::new("183456789")
}

#[tokio::test]
async fn fetch_story_requests_nested_fields() {
    let api = MockApi::new().with_get(Ok(Some(story_json(183456789))));

    let story = stories::fetch_story(&api, 99, &sid()).await.unwrap();
    assert_eq!(story.id, 183456789);
    assert_eq!(story.tasks.len(), 2);

    let call = &api.calls()[0];
    assert_eq!(call.method, "GET");
    assert!(call.path.starts_with("/projects/99/stories/183456789?fields="));
    assert!(call.path.contains("file_attachments"));
    assert!(call.path.contains("owners"));
    // Parentheses and commas are percent-encoded.
    assert!(!call.path.contains('('));
}

#[tokio::test]
async fn fetch_story_with_empty_body_fails() {
    let api = MockApi::new().with_get(Ok(None));
    let err = stories::fetch_story(&api, 1, &sid()).await.unwrap_err();
    assert!(matches!(err, ApiError::Empty));
}

#[tokio::test]
async fn fetch_story_propagates_status() {
    let api = MockApi::new().with_get(Err(404));
    let err = stories::fetch_story(&api, 1, &sid()).await.unwrap_err();
    assert_eq!(err.to_string(), "Request returned 404");
}

#[tokio::test]
async fn set_state_puts_current_state() {
    let api = MockApi::new();
    stories::set_story_state(&api, 7, &sid(), StoryState::Delivered)
        .await
        .unwrap();
    assert_eq!(
        api.calls(),
        vec![Call {
            method: "PUT",
            path: "/projects/7/stories/183456789".into(),
            body: Some(json!({"current_state": "delivered"})),
        }]
    );
}

#[tokio::test]
async fn update_task_only_sends_set_fields() {
    let api = MockApi::new();
    let update = TaskUpdate {
        complete: Some(true),
        ..Default::default()
    };
    stories::update_task(&api, 7, &sid(), 12, update).await.unwrap();

    let call = &api.calls()[0];
    assert_eq!(call.path, "/projects/7/stories/183456789/tasks/12");
    assert_eq!(call.body, Some(json!({"complete": true})));
}

#[tokio::test]
async fn task_and_comment_paths() {
    let api = MockApi::new();
    stories::add_task(&api, 7, &sid(), "new").await.unwrap();
    stories::delete_task(&api, 7, &sid(), 3).await.unwrap();
    stories::post_comment(&api, 7, &sid(), "hello").await.unwrap();

    let calls = api.calls();
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].path, "/projects/7/stories/183456789/tasks");
    assert_eq!(calls[0].body, Some(json!({"description": "new"})));
    assert_eq!(calls[1].method, "DELETE");
    assert_eq!(calls[1].path, "/projects/7/stories/183456789/tasks/3");
    assert_eq!(calls[2].path, "/projects/7/stories/183456789/comments");
    assert_eq!(calls[2].body, Some(json!({"text": "hello"})));
}

#[tokio::test]
async fn mutation_errors_propagate() {
    let api = MockApi::new().failing_mutations(500);
    let result = stories::post_comment(&api, 7, &sid(), "hello").await;
    assert!(matches!(result, Err(ApiError::Status { status: 500 })));
}

#[tokio::test]
async fn list_projects_reads_memberships() {
    let api = MockApi::new().with_get(Ok(Some(json!({
        "username": "sam",
        "projects": [
            {"project_id": 1, "project_name": "Web", "role": "member"},
            {"project_id": 2, "project_name": "Mobile", "role": "owner"}
        ]
    }))));
    let projects = stories::list_projects(&api).await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[1].project_name, "Mobile");
    assert_eq!(api.calls()[0].path, "/me");
}
