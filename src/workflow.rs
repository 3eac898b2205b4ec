use crate::model::story::{Story, StoryState, StoryType};

/// Presentation hint for the lifecycle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStyle {
    Start,
    Finish,
    Deliver,
    Inert,
}

/// The single next lifecycle action offered for a story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub label: &'static str,
    pub style: TransitionStyle,
    /// `None` means there is nothing to do; the button is inert.
    pub target: Option<StoryState>,
}

impl Transition {
    fn to(label: &'static str, style: TransitionStyle, target: StoryState) -> Self {
        Self {
            label,
            style,
            target: Some(target),
        }
    }

    fn inert(label: &'static str) -> Self {
        Self {
            label,
            style: TransitionStyle::Inert,
            target: None,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.target.is_some()
    }
}

pub fn next_transition(
    story_type: StoryType,
    state: StoryState,
    estimate: Option<f64>,
) -> Transition {
    use crate::model::story::StoryState::*;

    let unestimated = story_type == StoryType::Feature && estimate.is_none();

    match state {
        Unscheduled | Unstarted | Planned if !unestimated => {
            Transition::to("Start", TransitionStyle::Start, Started)
        }
        // Chores have no finished/delivered steps.
        Started if story_type == StoryType::Chore => {
            Transition::to("Finish", TransitionStyle::Finish, Accepted)
        }
        Started => Transition::to("Finish", TransitionStyle::Finish, Finished),
        Finished if story_type != StoryType::Chore => {
            Transition::to("Deliver", TransitionStyle::Deliver, Delivered)
        }
        Accepted => Transition::inert("Accepted"),
        _ if unestimated => Transition::inert("Unestimated"),
        _ => Transition::inert("Start"),
    }
}

pub fn transition_for(story: &Story) -> Transition {
    next_transition(story.story_type, story.current_state, story.estimate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::story::StoryState::*;
    use crate::model::story::StoryType::*;

    fn target(t: StoryType, s: StoryState, e: Option<f64>) -> (&'static str, Option<StoryState>) {
        let tr = next_transition(t, s, e);
        (tr.label, tr.target)
    }

    #[test]
    fn chores_and_bugs_start_without_estimate() {
        assert_eq!(target(Chore, Unstarted, None), ("Start", Some(Started)));
        assert_eq!(target(Bug, Unscheduled, None), ("Start", Some(Started)));
        assert_eq!(target(Bug, Planned, None), ("Start", Some(Started)));
    }

    #[test]
    fn unestimated_feature_cannot_start() {
        let tr = next_transition(Feature, Unstarted, None);
        assert_eq!(tr.label, "Unestimated");
        assert_eq!(tr.target, None);
        assert_eq!(tr.style, TransitionStyle::Inert);
        assert!(!tr.is_actionable());
    }

    #[test]
    fn estimated_feature_starts() {
        assert_eq!(target(Feature, Unstarted, Some(3.0)), ("Start", Some(Started)));
        assert_eq!(target(Feature, Planned, Some(0.0)), ("Start", Some(Started)));
    }

    #[test]
    fn started_chore_skips_to_accepted() {
        assert_eq!(target(Chore, Started, None), ("Finish", Some(Accepted)));
    }

    #[test]
    fn started_bug_and_feature_finish() {
        assert_eq!(target(Bug, Started, None), ("Finish", Some(Finished)));
        assert_eq!(target(Feature, Started, Some(1.0)), ("Finish", Some(Finished)));
        // A feature that lost its estimate mid-flight still finishes.
        assert_eq!(target(Feature, Started, None), ("Finish", Some(Finished)));
    }

    #[test]
    fn finished_bug_delivers() {
        let tr = next_transition(Bug, Finished, None);
        assert_eq!((tr.label, tr.target), ("Deliver", Some(Delivered)));
        assert_eq!(tr.style, TransitionStyle::Deliver);
    }

    #[test]
    fn finished_chore_has_no_action() {
        assert_eq!(target(Chore, Finished, None), ("Start", None));
    }

    #[test]
    fn accepted_is_terminal() {
        assert_eq!(target(Feature, Accepted, Some(2.0)), ("Accepted", None));
        assert_eq!(target(Feature, Accepted, None), ("Accepted", None));
        assert_eq!(target(Chore, Accepted, None), ("Accepted", None));
    }

    #[test]
    fn delivered_and_rejected_fall_back_to_inert_start() {
        assert_eq!(target(Bug, Delivered, None), ("Start", None));
        assert_eq!(target(Bug, Rejected, None), ("Start", None));
        assert_eq!(target(Feature, Rejected, None), ("Unestimated", None));
        assert_eq!(target(Feature, Delivered, Some(5.0)), ("Start", None));
    }
}
