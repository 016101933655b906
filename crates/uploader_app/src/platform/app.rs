use std::path::PathBuf;
use std::time::{Duration, Instant};

use uploader_core::{update, AppState, FileRef, JobRowView, Msg, PageLayout, VIEW_RESULTS_LABEL};
use uploader_engine::EngineHandle;
use uploader_logging::{uploader_debug, uploader_info};

use super::config::PageConfig;
use super::dom::Document;
use super::effects::EffectRunner;
use super::ui;
use super::ui::constants::MESSAGE;

const EVENT_WAIT: Duration = Duration::from_millis(250);

/// What the user does on the page during one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub files: Vec<PathBuf>,
    pub registry_links: Vec<String>,
    /// URL the page is "loaded" at; its query keys may open modals.
    pub page_url: Option<String>,
    pub filter: Option<String>,
    /// Click the cancel button once this much time has passed.
    pub cancel_after: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub jobs: Vec<JobRowView>,
    pub visible_publishers: Vec<String>,
    pub open_modals: Vec<String>,
    /// Text of the failure message shown in the progress dialog.
    pub message: Option<String>,
    /// Absolute target of the "View results" link, when a job completed.
    pub results_url: Option<String>,
}

pub fn run(options: RunOptions, config: &PageConfig) -> anyhow::Result<RunSummary> {
    let settings = config.client_settings()?;
    let base_url = settings.base_url.clone();
    let engine = EngineHandle::new(settings)?;
    let mut session = PageSession::new(config.page_layout(), EffectRunner::new(engine));

    let page_url = options
        .page_url
        .unwrap_or_else(|| base_url.as_str().to_string());
    session.dispatch(Msg::PageLoaded { url: page_url });
    if let Some(query) = options.filter {
        session.dispatch(Msg::FilterChanged(query));
    }

    let files: Vec<FileRef> = options.files.into_iter().map(FileRef::from_path).collect();
    if !files.is_empty() {
        session.dispatch(Msg::DropTargetClicked);
        session.dispatch(Msg::FilesPicked(files));
    }
    for href in options.registry_links {
        session.dispatch(Msg::RegistryLinkClicked { href });
    }

    let started = Instant::now();
    let mut cancel_clicked = false;
    while session.state.view().pending_jobs > 0 {
        if let Some(limit) = options.cancel_after {
            if !cancel_clicked && started.elapsed() >= limit && session.state.view().progress.is_some()
            {
                uploader_info!("Cancelling after {:?}", limit);
                session.dispatch(Msg::ResultsButtonClicked);
                cancel_clicked = true;
            }
        }
        if let Some(msg) = session.runner.next_msg(EVENT_WAIT) {
            session.dispatch(msg);
        }
    }

    let results_url = session.follow_results_link().and_then(|href| {
        base_url
            .join(&href)
            .map(|url| url.to_string())
            .ok()
    });
    let summary = session.summary(results_url);

    session.dispatch(Msg::PageUnloaded);
    session.runner.shutdown();
    Ok(summary)
}

struct PageSession {
    state: AppState,
    document: Document,
    runner: EffectRunner,
}

impl PageSession {
    fn new(layout: PageLayout, runner: EffectRunner) -> Self {
        let mut document = Document::new();
        document.apply_all(ui::layout::initial_commands(&layout));
        let mut session = Self {
            state: AppState::new(layout),
            document,
            runner,
        };
        session.render();
        session
    }

    fn dispatch(&mut self, msg: Msg) {
        uploader_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        if was_dirty {
            self.render();
        }
        self.runner.run(effects);
    }

    fn render(&mut self) {
        let view = self.state.view();
        self.document.apply_all(ui::render::render(&view));
    }

    /// Clicks the results button if it has become a link, returning where it leads.
    fn follow_results_link(&mut self) -> Option<String> {
        let is_link = self
            .state
            .view()
            .progress
            .is_some_and(|dialog| dialog.results_button.label == VIEW_RESULTS_LABEL);
        if !is_link {
            return None;
        }
        self.dispatch(Msg::ResultsButtonClicked);
        self.runner.take_navigations().pop()
    }

    fn summary(&self, results_url: Option<String>) -> RunSummary {
        let view = self.state.view();
        let visible_publishers = (0..view.publishers.len())
            .map(ui::constants::publisher_row)
            .filter(|id| !self.document.is_hidden(id))
            .filter_map(|id| self.document.text(&id).map(ToOwned::to_owned))
            .collect();
        let open_modals = view
            .modals
            .iter()
            .filter(|modal| !self.document.is_hidden(&modal.id))
            .map(|modal| modal.id.clone())
            .collect();
        let message = (!self.document.is_hidden(MESSAGE))
            .then(|| self.document.text(MESSAGE).map(ToOwned::to_owned))
            .flatten();
        RunSummary {
            jobs: view.jobs,
            visible_publishers,
            open_modals,
            message,
            results_url,
        }
    }
}
