use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::story::StoryId;

/// Location of the head pointer, relative to the repository root.
pub const HEAD_PATH: &str = ".git/HEAD";

fn story_branch_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Lazy prefix so the whole trailing digit run is captured, not just its last 8 digits.
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^ref:\s*refs/heads/.*?(\d{8,})\r?$").expect("valid story branch pattern")
    })
}

/// Extract the story id from the contents of `.git/HEAD`.
///
/// Returns `None` when HEAD does not point at a branch ending in a run of at
/// least eight digits, including a detached HEAD.
pub fn story_id_from_head(head: &str) -> Option<StoryId> {
    story_branch_pattern()
        .captures(head)
        .and_then(|caps| caps.get(1))
        .map(|m| StoryId::new(m.as_str()))
}

pub async fn read_head(path: &Path) -> std::io::Result<String> {
    tokio::fs::read_to_string(path).await
}
