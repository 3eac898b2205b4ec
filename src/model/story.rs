use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric story identifier as it appears in a branch name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoryId(String);

impl StoryId {
    pub fn new(digits: impl Into<String>) -> Self {
        Self(digits.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    Bug,
    Feature,
    Chore,
}

impl StoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryType::Bug => "bug",
            StoryType::Feature => "feature",
            StoryType::Chore => "chore",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryState {
    Unscheduled,
    Unstarted,
    Planned,
    Started,
    Finished,
    Delivered,
    Accepted,
    Rejected,
}

impl StoryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryState::Unscheduled => "unscheduled",
            StoryState::Unstarted => "unstarted",
            StoryState::Planned => "planned",
            StoryState::Started => "started",
            StoryState::Finished => "finished",
            StoryState::Delivered => "delivered",
            StoryState::Accepted => "accepted",
            StoryState::Rejected => "rejected",
        }
    }
}

impl fmt::Display for StoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A full snapshot of a story, including its nested resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub name: String,
    pub story_type: StoryType,
    pub current_state: StoryState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub owners: Vec<Person>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub description: String,
    #[serde(default)]
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
    #[serde(default)]
    pub file_attachments: Vec<FileAttachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl Comment {
    pub fn author(&self) -> &str {
        self.person.as_ref().map_or("unknown", |p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tracker_payload() {
        let json = r#"{
            "id": 183456789,
            "name": "Add login",
            "story_type": "feature",
            "current_state": "unstarted",
            "estimate": 3,
            "owners": [{"id": 3, "name": "Sam Doe", "initials": "SD"}],
            "tasks": [{"id": 1, "description": "write form", "complete": false, "position": 1}],
            "labels": [{"id": 9, "name": "auth"}],
            "comments": [{
                "id": 7,
                "text": "looks good",
                "created_at": "2024-03-01T10:00:00Z",
                "person": {"id": 3, "name": "Sam Doe", "initials": "SD"},
                "file_attachments": [{"id": 4, "filename": "shot.png"}]
            }]
        }"#;
        let story: Story = serde_json::from_str(json).unwrap();
        assert_eq!(story.story_type, StoryType::Feature);
        assert_eq!(story.current_state, StoryState::Unstarted);
        assert_eq!(story.estimate, Some(3.0));
        assert_eq!(story.owners[0].initials.as_deref(), Some("SD"));
        assert_eq!(story.tasks[0].description, "write form");
        assert_eq!(story.labels[0].name, "auth");
        assert_eq!(story.comments[0].author(), "Sam Doe");
        assert_eq!(story.comments[0].file_attachments[0].filename, "shot.png");
    }

    #[test]
    fn nested_collections_default_to_empty() {
        let json = r#"{"id": 1, "name": "x", "story_type": "chore", "current_state": "started"}"#;
        let story: Story = serde_json::from_str(json).unwrap();
        assert!(story.tasks.is_empty());
        assert!(story.owners.is_empty());
        assert!(story.comments.is_empty());
        assert_eq!(story.estimate, None);
    }

    #[test]
    fn unknown_story_type_is_rejected() {
        let json = r#"{"id": 1, "name": "x", "story_type": "epic", "current_state": "started"}"#;
        assert!(serde_json::from_str::<Story>(json).is_err());
    }
}
