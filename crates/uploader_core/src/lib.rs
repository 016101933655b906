//! Uploader core: pure page state machine and view-model helpers.
mod effect;
mod filter;
mod modal;
mod msg;
mod state;
mod tracker;
mod update;
mod view_model;

pub use effect::Effect;
pub use filter::normalize_name;
pub use modal::{query_keys, ModalSpec};
pub use msg::Msg;
pub use state::{AppState, FileRef, PageLayout, UploadId};
pub use tracker::{
    JobPhase, PolledStatus, StageProgress, UploadSource, CANCEL_LABEL, COMPLETED_LABEL,
    DEFAULT_BAR_MAX, DISABLED_HREF, HIDE_ERROR_LABEL, NOT_FOUND_MESSAGE, SHOW_ERROR_LABEL,
    VIEW_RESULTS_LABEL,
};
pub use update::update;
pub use view_model::{
    JobRowView, ModalView, OutcomeView, PageViewModel, ProgressBarView, ProgressDialogView,
    PublisherRowView, ResultsButtonView,
};
