use crate::{FileRef, UploadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the hidden file-picker input.
    OpenFilePicker,
    /// POST a local file to the upload endpoint.
    SubmitUpload { upload_id: UploadId, file: FileRef },
    /// GET a registry link; the backend answers with a job id.
    SubmitRegistryFetch { upload_id: UploadId, href: String },
    StartPolling { upload_id: UploadId, job_id: String },
    StopPolling { upload_id: UploadId },
    /// Fire-and-forget cancellation of a backend job.
    CancelJob { upload_id: UploadId, job_id: String },
    /// A click that was not intercepted follows its link.
    Navigate { href: String },
}
