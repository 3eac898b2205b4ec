use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::event::KeyAction;
use crate::model::story::{Story, StoryId, Task};
use crate::sync::signal::RefreshTrigger;
use crate::sync::StoryView;
use crate::tracker::stories::{self, TaskUpdate};
use crate::tracker::{ApiError, TrackerApi};
use crate::ui;
use crate::workflow::{self, Transition};

#[derive(Debug, Clone)]
pub enum Action {
    Key(KeyAction),
    MutationDone(String),
    MutationFailed(String),
    Quit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Details,
    Tasks,
    Comments,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Details, Tab::Tasks, Tab::Comments];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Details => "Details",
            Tab::Tasks => "Tasks",
            Tab::Comments => "Comments",
        }
    }

    fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn prev(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Where the operator is looking. Survives story rebuilds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation {
    pub tab: Tab,
    pub selected_task: usize,
    pub comment_scroll: usize,
}

pub struct StoryScreen {
    pub story_id: StoryId,
    pub story: Story,
    pub transition: Transition,
}

pub enum Screen {
    Loading,
    NoStory,
    FetchError { story_id: StoryId, message: String },
    Story(Box<StoryScreen>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    AddTask,
    EditTask(u64),
    Comment,
}

impl InputKind {
    pub fn title(&self) -> &'static str {
        match self {
            InputKind::AddTask => " New Task ",
            InputKind::EditTask(_) => " Edit Task ",
            InputKind::Comment => " Comment ",
        }
    }
}

pub struct Input {
    pub kind: InputKind,
    pub buffer: String,
    /// Cursor position in chars.
    pub cursor: usize,
}

pub struct App {
    pub screen: Screen,
    pub nav: Navigation,
    pub input: Option<Input>,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub project_id: u64,
    api: Arc<dyn TrackerApi>,
    trigger: RefreshTrigger,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        api: Arc<dyn TrackerApi>,
        project_id: u64,
        trigger: RefreshTrigger,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            screen: Screen::Loading,
            nav: Navigation::default(),
            input: None,
            flash_message: None,
            should_quit: false,
            project_id,
            api,
            trigger,
            action_tx,
        }
    }

    pub fn navigation(&self) -> Navigation {
        self.nav
    }

    pub fn story_screen(&self) -> Option<&StoryScreen> {
        match &self.screen {
            Screen::Story(s) => Some(s),
            _ => None,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.story_screen()
            .and_then(|s| s.story.tasks.get(self.nav.selected_task))
    }

    pub fn update(&mut self, action: Action) {
        // Clear flash message after 3 seconds
        if let Some((_, t)) = &self.flash_message {
            if t.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }

        match action {
            Action::Key(key) => {
                if self.input.is_some() {
                    self.handle_input_key(key);
                } else {
                    self.handle_key(key);
                }
            }
            Action::MutationDone(what) => self.flash(format!("{what} saved")),
            Action::MutationFailed(msg) => self.flash(msg),
            Action::Quit => self.should_quit = true,
        }
    }

    fn flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    fn handle_key(&mut self, key: KeyAction) {
        match key {
            KeyAction::Escape | KeyAction::Char('q') => self.should_quit = true,
            KeyAction::Tab | KeyAction::Right => self.nav.tab = self.nav.tab.next(),
            KeyAction::BackTab | KeyAction::Left => self.nav.tab = self.nav.tab.prev(),
            KeyAction::Up => match self.nav.tab {
                Tab::Tasks => self.nav.selected_task = self.nav.selected_task.saturating_sub(1),
                Tab::Comments => {
                    self.nav.comment_scroll = self.nav.comment_scroll.saturating_sub(1)
                }
                Tab::Details => {}
            },
            KeyAction::Down => match self.nav.tab {
                Tab::Tasks => {
                    let len = self.story_screen().map_or(0, |s| s.story.tasks.len());
                    if self.nav.selected_task + 1 < len {
                        self.nav.selected_task += 1;
                    }
                }
                Tab::Comments => {
                    let max = self.comment_scroll_limit();
                    if self.nav.comment_scroll < max {
                        self.nav.comment_scroll += 1;
                    }
                }
                Tab::Details => {}
            },
            KeyAction::Char('r') => {
                if !self.trigger.fire() {
                    tracing::debug!("refresh requested while no wait was pending");
                }
                self.flash("Refreshing...".into());
            }
            KeyAction::Char('s') => self.advance_state(),
            KeyAction::Char(' ') | KeyAction::Enter if self.nav.tab == Tab::Tasks => {
                self.toggle_selected_task()
            }
            KeyAction::Char('a') if self.story_screen().is_some() => {
                self.nav.tab = Tab::Tasks;
                self.begin_input(InputKind::AddTask, String::new());
            }
            KeyAction::Char('e') if self.nav.tab == Tab::Tasks => {
                if let Some(task) = self.selected_task() {
                    let (id, text) = (task.id, task.description.clone());
                    self.begin_input(InputKind::EditTask(id), text);
                }
            }
            KeyAction::Char('d') if self.nav.tab == Tab::Tasks => self.delete_selected_task(),
            KeyAction::Char('c') if self.story_screen().is_some() => {
                self.nav.tab = Tab::Comments;
                self.begin_input(InputKind::Comment, String::new());
            }
            _ => {}
        }
    }

    fn comment_scroll_limit(&self) -> usize {
        self.story_screen().map_or(0, |s| {
            ui::comments::line_count(&s.story.comments).saturating_sub(1)
        })
    }

    fn begin_input(&mut self, kind: InputKind, buffer: String) {
        let cursor = buffer.chars().count();
        self.input = Some(Input {
            kind,
            buffer,
            cursor,
        });
    }

    fn handle_input_key(&mut self, key: KeyAction) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        match key {
            KeyAction::Escape => self.input = None,
            KeyAction::Enter => {
                if let Some(input) = self.input.take() {
                    self.submit_input(input);
                }
            }
            KeyAction::Char(c) => {
                let at = byte_index(&input.buffer, input.cursor);
                input.buffer.insert(at, c);
                input.cursor += 1;
            }
            KeyAction::Backspace => {
                if input.cursor > 0 {
                    input.cursor -= 1;
                    let at = byte_index(&input.buffer, input.cursor);
                    input.buffer.remove(at);
                }
            }
            KeyAction::Left => input.cursor = input.cursor.saturating_sub(1),
            KeyAction::Right => {
                input.cursor = (input.cursor + 1).min(input.buffer.chars().count());
            }
            _ => {}
        }
    }

    fn submit_input(&mut self, input: Input) {
        let text = input.buffer.trim().to_string();
        if text.is_empty() {
            return;
        }
        let Some(story_id) = self.story_screen().map(|s| s.story_id.clone()) else {
            return;
        };
        let (api, project) = (self.api.clone(), self.project_id);

        match input.kind {
            InputKind::AddTask => self.spawn_mutation("Task", async move {
                stories::add_task(api.as_ref(), project, &story_id, &text).await
            }),
            InputKind::EditTask(task_id) => self.spawn_mutation("Task", async move {
                let update = TaskUpdate {
                    description: Some(text),
                    complete: None,
                };
                stories::update_task(api.as_ref(), project, &story_id, task_id, update).await
            }),
            InputKind::Comment => self.spawn_mutation("Comment", async move {
                stories::post_comment(api.as_ref(), project, &story_id, &text).await
            }),
        }
    }

    fn advance_state(&mut self) {
        let Some(screen) = self.story_screen() else {
            return;
        };
        let Some(target) = screen.transition.target else {
            let label = screen.transition.label;
            self.flash(format!("Nothing to do: {label}"));
            return;
        };
        let story_id = screen.story_id.clone();
        let (api, project) = (self.api.clone(), self.project_id);
        self.spawn_mutation("State", async move {
            stories::set_story_state(api.as_ref(), project, &story_id, target).await
        });
    }

    fn toggle_selected_task(&mut self) {
        let Some(screen) = self.story_screen() else {
            return;
        };
        let Some(task) = screen.story.tasks.get(self.nav.selected_task) else {
            return;
        };
        let (story_id, task_id, complete) = (screen.story_id.clone(), task.id, !task.complete);
        let (api, project) = (self.api.clone(), self.project_id);
        self.spawn_mutation("Task", async move {
            let update = TaskUpdate {
                description: None,
                complete: Some(complete),
            };
            stories::update_task(api.as_ref(), project, &story_id, task_id, update).await
        });
    }

    fn delete_selected_task(&mut self) {
        let Some(screen) = self.story_screen() else {
            return;
        };
        let Some(task) = screen.story.tasks.get(self.nav.selected_task) else {
            return;
        };
        let (story_id, task_id) = (screen.story_id.clone(), task.id);
        let (api, project) = (self.api.clone(), self.project_id);
        self.spawn_mutation("Task deletion", async move {
            stories::delete_task(api.as_ref(), project, &story_id, task_id).await
        });
    }

    /// Run a tracker mutation in the background, report how it went, then
    /// ask for a refresh. Mutations are never retried.
    fn spawn_mutation<F>(&self, what: &'static str, request: F)
    where
        F: Future<Output = Result<(), ApiError>> + Send + 'static,
    {
        let tx = self.action_tx.clone();
        let trigger = self.trigger.clone();
        tokio::spawn(async move {
            let action = match request.await {
                Ok(()) => {
                    tracing::info!(what, "mutation applied");
                    Action::MutationDone(what.to_string())
                }
                Err(e) => {
                    tracing::warn!(what, error = %e, "mutation failed");
                    Action::MutationFailed(format!("{what} failed: {e}"))
                }
            };
            let _ = tx.send(action);
            trigger.fire();
        });
    }
}

impl StoryView for App {
    fn teardown(&mut self) {
        self.screen = Screen::Loading;
    }

    fn build(&mut self, story_id: &StoryId, story: &Story, nav: &Navigation) {
        let mut nav = *nav;
        nav.selected_task = nav.selected_task.min(story.tasks.len().saturating_sub(1));
        nav.comment_scroll = nav
            .comment_scroll
            .min(ui::comments::line_count(&story.comments).saturating_sub(1));
        self.nav = nav;
        self.screen = Screen::Story(Box::new(StoryScreen {
            story_id: story_id.clone(),
            story: story.clone(),
            transition: workflow::transition_for(story),
        }));
    }

    fn show_no_story(&mut self) {
        self.input = None;
        self.screen = Screen::NoStory;
    }

    fn show_fetch_error(&mut self, story_id: &StoryId, message: &str) {
        self.input = None;
        self.screen = Screen::FetchError {
            story_id: story_id.clone(),
            message: message.to_string(),
        };
    }
}

fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices().nth(char_pos).map_or(s.len(), |(i, _)| i)
}
