use std::time::Duration;

use uploader_core::{Effect, Msg, PolledStatus, StageProgress};
use uploader_engine::{EngineEvent, EngineHandle, JobStatus};
use uploader_logging::{uploader_info, uploader_warn};

pub struct EffectRunner {
    engine: EngineHandle,
    navigations: Vec<String>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            navigations: Vec::new(),
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenFilePicker => {
                    uploader_info!("File picker opened; files are taken from the command line");
                }
                Effect::SubmitUpload { upload_id, file } => {
                    uploader_info!("SubmitUpload upload_id={} file={:?}", upload_id, file.path);
                    self.engine.submit_upload(upload_id, file.name, file.path);
                }
                Effect::SubmitRegistryFetch { upload_id, href } => {
                    uploader_info!("SubmitRegistryFetch upload_id={} href={}", upload_id, href);
                    self.engine.submit_registry(upload_id, href);
                }
                Effect::StartPolling { upload_id, job_id } => {
                    uploader_info!("StartPolling upload_id={} job_id={}", upload_id, job_id);
                    self.engine.start_polling(upload_id, job_id);
                }
                Effect::StopPolling { upload_id } => {
                    self.engine.stop_polling(upload_id);
                }
                Effect::CancelJob { upload_id, job_id } => {
                    uploader_info!("CancelJob upload_id={} job_id={}", upload_id, job_id);
                    self.engine.cancel_job(upload_id, job_id);
                }
                Effect::Navigate { href } => {
                    uploader_info!("Navigate href={}", href);
                    self.navigations.push(href);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event, translated into a message.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }

    pub fn take_navigations(&mut self) -> Vec<String> {
        std::mem::take(&mut self.navigations)
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted { upload_id, result } => Msg::UploadSubmitted {
            upload_id,
            result: result.map_err(|err| {
                uploader_warn!("Upload {} failed: {}", upload_id, err);
                err.to_string()
            }),
        },
        EngineEvent::StatusPolled { upload_id, status } => Msg::JobPolled {
            upload_id,
            status: map_status(status),
        },
        EngineEvent::PollingAbandoned { upload_id, error } => Msg::PollFailed {
            upload_id,
            message: error.to_string(),
        },
    }
}

fn map_status(status: JobStatus) -> PolledStatus {
    match status {
        JobStatus::NotFound => PolledStatus::NotFound,
        JobStatus::ProcessingError { exc_info } => PolledStatus::ProcessingError { exc_info },
        JobStatus::InProgress { stages, progress } => PolledStatus::InProgress {
            stages,
            progress: progress.map(|progress| StageProgress {
                stage: progress.stage,
                sub_step: progress.sub_step,
            }),
        },
        JobStatus::Completed { file_id } => PolledStatus::Completed { file_id },
        JobStatus::Unknown { status } => PolledStatus::Unknown(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uploader_engine::{ClientError, FailureKind, JobProgress};

    #[test]
    fn engine_events_become_messages() {
        let msg = map_event(EngineEvent::StatusPolled {
            upload_id: 4,
            status: JobStatus::InProgress {
                stages: vec!["Load".to_string()],
                progress: Some(JobProgress {
                    stage: 0,
                    sub_step: Some((1, 2)),
                }),
            },
        });
        assert_eq!(
            msg,
            Msg::JobPolled {
                upload_id: 4,
                status: PolledStatus::InProgress {
                    stages: vec!["Load".to_string()],
                    progress: Some(StageProgress {
                        stage: 0,
                        sub_step: Some((1, 2)),
                    }),
                },
            }
        );

        let msg = map_event(EngineEvent::Submitted {
            upload_id: 2,
            result: Err(ClientError {
                kind: FailureKind::HttpStatus(413),
                message: "413 Payload Too Large".to_string(),
            }),
        });
        assert_eq!(
            msg,
            Msg::UploadSubmitted {
                upload_id: 2,
                result: Err("http status 413: 413 Payload Too Large".to_string()),
            }
        );

        let msg = map_event(EngineEvent::PollingAbandoned {
            upload_id: 7,
            error: ClientError {
                kind: FailureKind::Timeout,
                message: "operation timed out".to_string(),
            },
        });
        assert_eq!(
            msg,
            Msg::PollFailed {
                upload_id: 7,
                message: "timeout: operation timed out".to_string(),
            }
        );
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        assert_eq!(
            map_status(JobStatus::Unknown {
                status: "deferred".to_string()
            }),
            PolledStatus::Unknown("deferred".to_string())
        );
    }
}
