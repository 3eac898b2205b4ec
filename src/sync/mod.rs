pub mod diff;
pub mod signal;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use ratatui::{backend::Backend, Terminal};
use tokio::sync::{mpsc, Notify};

use crate::app::{Action, App, Navigation};
use crate::git;
use crate::model::story::{Story, StoryId};
use crate::tracker::{stories, ApiError, TrackerApi};
use crate::ui;
use signal::ChangeSource;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Cannot read {}; run this from the root of a git working tree", path.display())]
    NotAWorkingTree {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What the synchronizer asks of the screen. Every `build` or message is
/// preceded by a `teardown` of whatever was shown before.
pub trait StoryView {
    fn teardown(&mut self);
    fn build(&mut self, story_id: &StoryId, story: &Story, nav: &Navigation);
    fn show_no_story(&mut self);
    fn show_fetch_error(&mut self, story_id: &StoryId, message: &str);
}

/// Result of the remote half of a cycle.
#[derive(Debug)]
pub enum Fetched {
    NoStory,
    Failed(StoryId, ApiError),
    Story(StoryId, Story),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NoStory,
    FetchFailed,
    Unchanged,
    Rebuilt,
}

/// Owns the last story put on screen and decides when the view is rebuilt.
pub struct Synchronizer {
    head_path: PathBuf,
    project_id: u64,
    api: Arc<dyn TrackerApi>,
    displayed: Option<Story>,
}

impl Synchronizer {
    pub fn new(head_path: impl Into<PathBuf>, project_id: u64, api: Arc<dyn TrackerApi>) -> Self {
        Self {
            head_path: head_path.into(),
            project_id,
            api,
            displayed: None,
        }
    }

    /// One pass: read HEAD, resolve the story, fetch it and rebuild the view
    /// if the snapshot differs from the displayed one. Only an unreadable
    /// HEAD is an error; fetch failures are shown and retried next cycle.
    pub async fn cycle(
        &mut self,
        view: &mut dyn StoryView,
        nav: &Navigation,
    ) -> Result<Outcome, SyncError> {
        let fetched = self.fetch().await?;
        Ok(self.apply(view, nav, fetched))
    }

    /// The remote half of a cycle. Touches neither the view nor the snapshot,
    /// so input can be handled while it is in flight.
    pub async fn fetch(&self) -> Result<Fetched, SyncError> {
        let head = git::read_head(&self.head_path)
            .await
            .map_err(|source| SyncError::NotAWorkingTree {
                path: self.head_path.clone(),
                source,
            })?;

        let Some(story_id) = git::story_id_from_head(&head) else {
            return Ok(Fetched::NoStory);
        };

        Ok(
            match stories::fetch_story(self.api.as_ref(), self.project_id, &story_id).await {
                Ok(story) => Fetched::Story(story_id, story),
                Err(e) => Fetched::Failed(story_id, e),
            },
        )
    }

    /// Puts a fetch result on screen, rebuilding only when it differs from
    /// what is displayed.
    pub fn apply(
        &mut self,
        view: &mut dyn StoryView,
        nav: &Navigation,
        fetched: Fetched,
    ) -> Outcome {
        match fetched {
            Fetched::NoStory => {
                self.displayed = None;
                view.teardown();
                view.show_no_story();
                Outcome::NoStory
            }
            Fetched::Failed(story_id, e) => {
                tracing::warn!(story = %story_id, error = %e, "story fetch failed");
                self.displayed = None;
                view.teardown();
                view.show_fetch_error(&story_id, &e.to_string());
                Outcome::FetchFailed
            }
            Fetched::Story(story_id, story) => {
                if !diff::has_changed(self.displayed.as_ref(), &story) {
                    return Outcome::Unchanged;
                }
                view.teardown();
                view.build(&story_id, &story, nav);
                self.displayed = Some(story);
                Outcome::Rebuilt
            }
        }
    }
}

/// Drives the synchronizer forever: sync, draw, then handle input until the
/// change source wakes. Input is also handled while a fetch is in flight.
/// Returns when the operator quits.
pub async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    synchronizer: &mut Synchronizer,
    source: &mut ChangeSource,
    actions: &mut mpsc::UnboundedReceiver<Action>,
    quit: Arc<Notify>,
) -> Result<()> {
    loop {
        let fetched = {
            let fetch = synchronizer.fetch();
            tokio::pin!(fetch);
            loop {
                tokio::select! {
                    res = &mut fetch => break res?,
                    _ = quit.notified() => return Ok(()),
                    action = actions.recv() => {
                        if !handle_action(terminal, app, action)? {
                            return Ok(());
                        }
                    }
                }
            }
        };
        let nav = app.navigation();
        let outcome = synchronizer.apply(app, &nav, fetched);
        tracing::info!(?outcome, "sync cycle");
        terminal.draw(|f| ui::render(f, app))?;

        let wait = source.wait();
        tokio::pin!(wait);
        loop {
            tokio::select! {
                wake = &mut wait => {
                    tracing::debug!(?wake, "woken");
                    break;
                }
                action = actions.recv() => {
                    if !handle_action(terminal, app, action)? {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Applies one input action and redraws. Returns `false` once the loop
/// should stop.
fn handle_action<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    action: Option<Action>,
) -> Result<bool> {
    let Some(action) = action else {
        return Ok(false);
    };
    app.update(action);
    if app.should_quit {
        return Ok(false);
    }
    terminal.draw(|f| ui::render(f, app))?;
    Ok(true)
}
