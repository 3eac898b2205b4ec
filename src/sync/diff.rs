use crate::model::story::Story;

/// Whether a freshly fetched story differs from the one on screen.
///
/// `displayed` is `None` while nothing is shown (startup, or after the view was
/// torn down); that never equals a fetched story. Sequences compare in order,
/// so a reordered task or comment list counts as a change.
pub fn has_changed(displayed: Option<&Story>, fetched: &Story) -> bool {
    displayed != Some(fetched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::story::{Label, StoryState, StoryType, Task};

    fn task(id: u64, complete: bool) -> Task {
        Task {
            id,
            description: format!("task {id}"),
            complete,
        }
    }

    fn story() -> Story {
        Story {
            id: 183456789,
            name: "Add login".into(),
            story_type: StoryType::Feature,
            current_state: StoryState::Started,
            estimate: Some(2.0),
            description: None,
            url: None,
            owners: vec![],
            tasks: vec![task(1, false), task(2, true)],
            labels: vec![Label { name: "auth".into() }],
            comments: vec![],
        }
    }

    #[test]
    fn identical_snapshots_are_unchanged() {
        assert!(!has_changed(Some(&story()), &story()));
    }

    #[test]
    fn empty_display_always_changes() {
        assert!(has_changed(None, &story()));
    }

    #[test]
    fn reordered_tasks_change() {
        let mut next = story();
        next.tasks.reverse();
        assert!(has_changed(Some(&story()), &next));
    }

    #[test]
    fn reordered_labels_change() {
        let mut prev = story();
        prev.labels.push(Label { name: "ui".into() });
        let mut next = prev.clone();
        next.labels.reverse();
        assert!(has_changed(Some(&prev), &next));
    }

    #[test]
    fn single_completion_flag_changes() {
        let mut next = story();
        next.tasks[0].complete = true;
        assert!(has_changed(Some(&story()), &next));
    }

    #[test]
    fn state_change_is_detected() {
        let mut next = story();
        next.current_state = StoryState::Finished;
        assert!(has_changed(Some(&story()), &next));
    }
}
