use crate::{FileRef, PolledStatus, UploadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page finished loading at the given URL (query keys may auto-open modals).
    PageLoaded { url: String },
    /// Page (or its progress dialog) is being torn down.
    PageUnloaded,
    /// User clicked an element declared as some modal's trigger.
    ModalTriggerClicked { trigger_id: String },
    /// User clicked a close control inside a modal.
    ModalCloseClicked { control_id: String },
    /// User typed in the publisher filter box.
    FilterChanged(String),
    /// User clicked the drop target (opens the file picker).
    DropTargetClicked,
    /// Files dropped onto the drop target.
    FilesDropped(Vec<FileRef>),
    /// Files chosen through the file picker.
    FilesPicked(Vec<FileRef>),
    /// User clicked a "fetch from registry" link.
    RegistryLinkClicked { href: String },
    /// Backend answered a submission with a job id, or the submission failed.
    UploadSubmitted {
        upload_id: UploadId,
        result: Result<String, String>,
    },
    /// Latest polled snapshot for a job.
    JobPolled {
        upload_id: UploadId,
        status: PolledStatus,
    },
    /// Polling gave up after repeated transport or decode failures.
    PollFailed { upload_id: UploadId, message: String },
    /// User clicked the results/cancel button of the progress dialog.
    ResultsButtonClicked,
    /// User clicked the "Show error"/"Hide error" link.
    ErrorToggleClicked,
}
