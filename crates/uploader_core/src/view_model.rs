use crate::{JobPhase, UploadId, HIDE_ERROR_LABEL, SHOW_ERROR_LABEL};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageViewModel {
    pub modals: Vec<ModalView>,
    pub filter_query: String,
    pub publishers: Vec<PublisherRowView>,
    /// Dialog of the job rendered last; simultaneous uploads share it.
    pub progress: Option<ProgressDialogView>,
    pub jobs: Vec<JobRowView>,
    /// Jobs still submitting or being polled.
    pub pending_jobs: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub id: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherRowView {
    pub name: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub upload_id: UploadId,
    pub source: String,
    pub job_id: Option<String>,
    pub phase: JobPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressDialogView {
    pub upload_id: UploadId,
    pub source: String,
    pub job_id: Option<String>,
    pub loader_visible: bool,
    pub primary: ProgressBarView,
    pub secondary: ProgressBarView,
    pub results_button: ResultsButtonView,
    /// Terminal failure replacing the progress UI.
    pub outcome: Option<OutcomeView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBarView {
    pub label: String,
    pub steps_text: String,
    pub value: u64,
    pub max: u64,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsButtonView {
    pub label: String,
    pub href: String,
    /// Rendered as not-yet-actionable.
    pub invalid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeView {
    NotFound,
    ProcessingError { exc_info: String, detail_shown: bool },
    Failed { message: String },
}

impl OutcomeView {
    /// Label of the detail toggle link, if this outcome has one.
    pub fn toggle_label(&self) -> Option<&'static str> {
        match self {
            OutcomeView::ProcessingError { detail_shown, .. } => Some(if *detail_shown {
                HIDE_ERROR_LABEL
            } else {
                SHOW_ERROR_LABEL
            }),
            OutcomeView::NotFound | OutcomeView::Failed { .. } => None,
        }
    }
}
