//! Uploader engine: backend HTTP calls, job polling and effect execution.
mod client;
mod engine;
mod poller;
mod status;
mod types;

pub use client::{ClientSettings, JobClient, ReqwestJobClient};
pub use engine::{EngineError, EngineHandle};
pub use poller::{poll_job, ChannelEventSink, EventSink, PollExit, PollSettings};
pub use status::{decode_job_status, decode_job_ticket};
pub use types::{ClientError, EngineEvent, FailureKind, JobProgress, JobStatus, UploadId};
