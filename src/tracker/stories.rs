use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{ApiError, TrackerApi};
use crate::model::story::{Story, StoryId, StoryState};

/// Nested resources fetched together with the story.
const STORY_FIELDS: &str = ":default,owners,tasks,labels,comments(:default,person,file_attachments)";

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMembership {
    pub project_id: u64,
    pub project_name: String,
}

#[derive(Deserialize)]
struct Me {
    #[serde(default)]
    projects: Vec<ProjectMembership>,
}

/// Partial update for a checklist task. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub complete: Option<bool>,
}

fn story_path(project_id: u64, story_id: &StoryId) -> String {
    format!("/projects/{project_id}/stories/{story_id}")
}

pub async fn fetch_story(
    api: &dyn TrackerApi,
    project_id: u64,
    story_id: &StoryId,
) -> Result<Story, ApiError> {
    let path = format!(
        "{}?fields={}",
        story_path(project_id, story_id),
        urlencoding::encode(STORY_FIELDS)
    );
    let value = api.get(&path).await?.ok_or(ApiError::Empty)?;
    Ok(serde_json::from_value(value)?)
}

pub async fn set_story_state(
    api: &dyn TrackerApi,
    project_id: u64,
    story_id: &StoryId,
    state: StoryState,
) -> Result<(), ApiError> {
    api.put(
        &story_path(project_id, story_id),
        json!({ "current_state": state.as_str() }),
    )
    .await?;
    Ok(())
}

pub async fn add_task(
    api: &dyn TrackerApi,
    project_id: u64,
    story_id: &StoryId,
    description: &str,
) -> Result<(), ApiError> {
    api.post(
        &format!("{}/tasks", story_path(project_id, story_id)),
        json!({ "description": description }),
    )
    .await?;
    Ok(())
}

pub async fn update_task(
    api: &dyn TrackerApi,
    project_id: u64,
    story_id: &StoryId,
    task_id: u64,
    update: TaskUpdate,
) -> Result<(), ApiError> {
    let mut body = Map::new();
    if let Some(description) = update.description {
        body.insert("description".into(), Value::String(description));
    }
    if let Some(complete) = update.complete {
        body.insert("complete".into(), Value::Bool(complete));
    }
    api.put(
        &format!("{}/tasks/{task_id}", story_path(project_id, story_id)),
        Value::Object(body),
    )
    .await?;
    Ok(())
}

pub async fn delete_task(
    api: &dyn TrackerApi,
    project_id: u64,
    story_id: &StoryId,
    task_id: u64,
) -> Result<(), ApiError> {
    api.delete(&format!("{}/tasks/{task_id}", story_path(project_id, story_id)))
        .await?;
    Ok(())
}

pub async fn post_comment(
    api: &dyn TrackerApi,
    project_id: u64,
    story_id: &StoryId,
    text: &str,
) -> Result<(), ApiError> {
    api.post(
        &format!("{}/comments", story_path(project_id, story_id)),
        json!({ "text": text }),
    )
    .await?;
    Ok(())
}

/// Projects the token's owner is a member of.
pub async fn list_projects(api: &dyn TrackerApi) -> Result<Vec<ProjectMembership>, ApiError> {
    let value = api.get("/me").await?.ok_or(ApiError::Empty)?;
    let me: Me = serde_json::from_value(value)?;
    Ok(me.projects)
}
