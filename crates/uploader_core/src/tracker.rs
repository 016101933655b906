use uploader_logging::uploader_debug;

use crate::{
    FileRef, OutcomeView, ProgressBarView, ProgressDialogView, ResultsButtonView, UploadId,
};

pub const CANCEL_LABEL: &str = "Cancel fetching file";
pub const VIEW_RESULTS_LABEL: &str = "View results";
pub const COMPLETED_LABEL: &str = "Completed";
pub const NOT_FOUND_MESSAGE: &str = "File could not be found";
pub const SHOW_ERROR_LABEL: &str = "Show error";
pub const HIDE_ERROR_LABEL: &str = "Hide error";
pub const DISABLED_HREF: &str = "#";
pub const DEFAULT_BAR_MAX: u64 = 10;

/// Where the dataset for a job came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    File(FileRef),
    Registry { href: String },
}

impl UploadSource {
    pub fn label(&self) -> &str {
        match self {
            UploadSource::File(file) => &file.name,
            UploadSource::Registry { href } => href,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Submitting,
    Tracking,
    Completed,
    NotFound,
    ProcessingError,
    /// Submission, transport or decode failure.
    Failed,
}

impl JobPhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobPhase::Submitting | JobPhase::Tracking)
    }
}

/// A polled job snapshot, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolledStatus {
    NotFound,
    ProcessingError {
        exc_info: String,
    },
    InProgress {
        stages: Vec<String>,
        progress: Option<StageProgress>,
    },
    Completed {
        file_id: String,
    },
    /// Any status string the page does not know; treated as pending.
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageProgress {
    /// Zero-based index into the job's stages.
    pub stage: usize,
    /// `(current, total)` within the stage.
    pub sub_step: Option<(u64, u64)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tracker {
    pub(crate) source: UploadSource,
    pub(crate) job_id: Option<String>,
    pub(crate) phase: JobPhase,
    pub(crate) dialog: ProgressDialogView,
}

impl Tracker {
    pub(crate) fn new(upload_id: UploadId, source: UploadSource) -> Self {
        let dialog = initial_dialog(upload_id, source.label());
        Self {
            source,
            job_id: None,
            phase: JobPhase::Submitting,
            dialog,
        }
    }

    pub(crate) fn start_tracking(&mut self, job_id: String) {
        self.dialog = initial_dialog(self.dialog.upload_id, self.source.label());
        self.dialog.job_id = Some(job_id.clone());
        self.job_id = Some(job_id);
        self.phase = JobPhase::Tracking;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.phase = JobPhase::Failed;
        self.dialog.loader_visible = false;
        self.dialog.outcome = Some(OutcomeView::Failed { message });
    }

    pub(crate) fn apply_status(&mut self, status: PolledStatus) {
        match status {
            PolledStatus::NotFound => {
                self.phase = JobPhase::NotFound;
                self.dialog.loader_visible = false;
                self.dialog.outcome = Some(OutcomeView::NotFound);
            }
            PolledStatus::ProcessingError { exc_info } => {
                self.phase = JobPhase::ProcessingError;
                self.dialog.loader_visible = false;
                self.dialog.outcome = Some(OutcomeView::ProcessingError {
                    exc_info,
                    detail_shown: false,
                });
            }
            PolledStatus::InProgress {
                stages,
                progress: Some(progress),
            } => self.apply_stage(&stages, progress),
            PolledStatus::InProgress { progress: None, .. } => {
                self.dialog.loader_visible = true;
            }
            PolledStatus::Unknown(status) => {
                uploader_debug!("Job {:?} reported unknown status {:?}", self.job_id, status);
                self.dialog.loader_visible = true;
            }
            PolledStatus::Completed { file_id } => {
                self.phase = JobPhase::Completed;
                let dialog = &mut self.dialog;
                dialog.loader_visible = false;
                dialog.secondary.visible = false;
                dialog.primary.label = COMPLETED_LABEL.to_string();
                dialog.primary.value = dialog.primary.max;
                dialog.results_button = ResultsButtonView {
                    label: VIEW_RESULTS_LABEL.to_string(),
                    href: format!("/file/{file_id}"),
                    invalid: false,
                };
            }
        }
    }

    // The bar value is the 1-based current stage, not the count of finished stages.
    fn apply_stage(&mut self, stages: &[String], progress: StageProgress) {
        let dialog = &mut self.dialog;
        dialog.loader_visible = false;
        dialog.results_button.invalid = false;

        let number = (progress.stage as u64).saturating_add(1);
        let total = stages.len() as u64;
        dialog.primary.label = progress
            .stage
            .checked_add(1)
            .and_then(|next| stages.get(next))
            .or_else(|| stages.get(progress.stage))
            .cloned()
            .unwrap_or_default();
        dialog.primary.steps_text = format!("Stage {number} of {total}");
        dialog.primary.value = number;
        dialog.primary.max = total;
        dialog.primary.visible = true;

        match progress.sub_step {
            Some((current, sub_total)) => {
                dialog.secondary = ProgressBarView {
                    label: format!("{current} of {sub_total}"),
                    steps_text: String::new(),
                    value: current,
                    max: sub_total,
                    visible: true,
                };
            }
            None => dialog.secondary.visible = false,
        }
    }

    pub(crate) fn toggle_error_detail(&mut self) -> bool {
        match &mut self.dialog.outcome {
            Some(OutcomeView::ProcessingError { detail_shown, .. }) => {
                *detail_shown = !*detail_shown;
                true
            }
            _ => false,
        }
    }
}

fn initial_bar() -> ProgressBarView {
    ProgressBarView {
        label: String::new(),
        steps_text: String::new(),
        value: 0,
        max: DEFAULT_BAR_MAX,
        visible: true,
    }
}

fn initial_dialog(upload_id: UploadId, source: &str) -> ProgressDialogView {
    ProgressDialogView {
        upload_id,
        source: source.to_string(),
        job_id: None,
        loader_visible: true,
        primary: initial_bar(),
        secondary: initial_bar(),
        results_button: ResultsButtonView {
            label: CANCEL_LABEL.to_string(),
            href: DISABLED_HREF.to_string(),
            invalid: true,
        },
        outcome: None,
    }
}
