use std::fmt;

pub type UploadId = u64;

/// Validated job snapshot from `GET /job/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    NotFound,
    ProcessingError {
        exc_info: String,
    },
    InProgress {
        stages: Vec<String>,
        progress: Option<JobProgress>,
    },
    Completed {
        file_id: String,
    },
    Unknown {
        status: String,
    },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::NotFound | JobStatus::ProcessingError { .. } | JobStatus::Completed { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobProgress {
    pub stage: usize,
    pub sub_step: Option<(u64, u64)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Submission finished with a backend job id or an error.
    Submitted {
        upload_id: UploadId,
        result: Result<String, ClientError>,
    },
    StatusPolled {
        upload_id: UploadId,
        status: JobStatus,
    },
    /// Polling stopped after too many consecutive failures.
    PollingAbandoned {
        upload_id: UploadId,
        error: ClientError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedResponse,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
