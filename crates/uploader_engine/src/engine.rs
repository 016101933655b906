use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use uploader_logging::{uploader_info, uploader_warn};

use crate::poller::{poll_job, ChannelEventSink, PollSettings};
use crate::{ClientError, ClientSettings, EngineEvent, JobClient, ReqwestJobClient, UploadId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] ClientError),
}

enum EngineCommand {
    SubmitUpload {
        upload_id: UploadId,
        file_name: String,
        path: PathBuf,
    },
    SubmitRegistry {
        upload_id: UploadId,
        href: String,
    },
    StartPolling {
        upload_id: UploadId,
        job_id: String,
    },
    StopPolling {
        upload_id: UploadId,
    },
    Cancel {
        upload_id: UploadId,
        job_id: String,
    },
    Shutdown,
}

pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let client = Arc::new(ReqwestJobClient::new(&settings)?);
        Self::with_client(client, PollSettings::from(&settings))
    }

    pub fn with_client(client: Arc<dyn JobClient>, poll: PollSettings) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let worker = thread::spawn(move || run_worker(runtime, client, poll, cmd_rx, event_tx));

        Ok(Self {
            cmd_tx,
            event_rx,
            worker: Some(worker),
        })
    }

    pub fn submit_upload(&self, upload_id: UploadId, file_name: impl Into<String>, path: PathBuf) {
        self.send(EngineCommand::SubmitUpload {
            upload_id,
            file_name: file_name.into(),
            path,
        });
    }

    pub fn submit_registry(&self, upload_id: UploadId, href: impl Into<String>) {
        self.send(EngineCommand::SubmitRegistry {
            upload_id,
            href: href.into(),
        });
    }

    pub fn start_polling(&self, upload_id: UploadId, job_id: impl Into<String>) {
        self.send(EngineCommand::StartPolling {
            upload_id,
            job_id: job_id.into(),
        });
    }

    pub fn stop_polling(&self, upload_id: UploadId) {
        self.send(EngineCommand::StopPolling { upload_id });
    }

    pub fn cancel_job(&self, upload_id: UploadId, job_id: impl Into<String>) {
        self.send(EngineCommand::Cancel {
            upload_id,
            job_id: job_id.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Cancels every polling timer and waits for the worker to exit.
    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.send(EngineCommand::Shutdown);
            if worker.join().is_err() {
                uploader_warn!("Engine worker panicked during shutdown");
            }
        }
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(
    runtime: tokio::runtime::Runtime,
    client: Arc<dyn JobClient>,
    poll: PollSettings,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let root = CancellationToken::new();
    let mut pollers: HashMap<UploadId, CancellationToken> = HashMap::new();

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::Shutdown => break,
            EngineCommand::StartPolling { upload_id, job_id } => {
                let token = root.child_token();
                if let Some(previous) = pollers.insert(upload_id, token.clone()) {
                    previous.cancel();
                }
                let client = client.clone();
                let sink = ChannelEventSink::new(event_tx.clone());
                runtime.spawn(async move {
                    let exit =
                        poll_job(client.as_ref(), upload_id, &job_id, poll, &sink, token).await;
                    uploader_info!("Polling for job {} ended: {:?}", job_id, exit);
                });
            }
            EngineCommand::StopPolling { upload_id } => {
                if let Some(token) = pollers.remove(&upload_id) {
                    token.cancel();
                }
            }
            request => {
                let client = client.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_request(client.as_ref(), request, event_tx).await;
                });
            }
        }
    }

    root.cancel();
    runtime.shutdown_timeout(Duration::from_secs(1));
}

async fn handle_request(
    client: &dyn JobClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::SubmitUpload {
            upload_id,
            file_name,
            path,
        } => {
            let result = client.submit_upload(&file_name, &path).await;
            let _ = event_tx.send(EngineEvent::Submitted { upload_id, result });
        }
        EngineCommand::SubmitRegistry { upload_id, href } => {
            let result = client.submit_registry(&href).await;
            let _ = event_tx.send(EngineEvent::Submitted { upload_id, result });
        }
        EngineCommand::Cancel { upload_id, job_id } => match client.cancel_job(&job_id).await {
            Ok(body) => uploader_info!(
                "Cancel requested for job {} (upload {}): {}",
                job_id,
                upload_id,
                body
            ),
            Err(err) => uploader_warn!("Cancel request for job {} failed: {}", job_id, err),
        },
        EngineCommand::StartPolling { .. }
        | EngineCommand::StopPolling { .. }
        | EngineCommand::Shutdown => {}
    }
}
