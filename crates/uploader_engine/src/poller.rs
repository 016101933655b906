use std::sync::mpsc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uploader_logging::{uploader_debug, uploader_warn};

use crate::{ClientSettings, EngineEvent, JobClient, UploadId};

/// Tokio intervals need a non-zero period.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_consecutive_failures: u32,
}

impl From<&ClientSettings> for PollSettings {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            interval: settings.poll_interval,
            max_consecutive_failures: settings.max_poll_failures,
        }
    }
}

/// Why a polling loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    Terminal,
    Cancelled,
    Abandoned,
}

/// Polls `job_id` every `settings.interval` until a terminal status, cancellation,
/// or too many consecutive failures. The first request goes out after one interval.
pub async fn poll_job(
    client: &dyn JobClient,
    upload_id: UploadId,
    job_id: &str,
    settings: PollSettings,
    sink: &dyn EventSink,
    cancel: CancellationToken,
) -> PollExit {
    let period = settings.interval.max(MIN_POLL_INTERVAL);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let max_failures = settings.max_consecutive_failures.max(1);
    let mut failures = 0u32;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = client.job_status(job_id) => result,
        };

        match result {
            Ok(status) => {
                failures = 0;
                let terminal = status.is_terminal();
                uploader_debug!("Job {} (upload {}) polled: {:?}", job_id, upload_id, status);
                sink.emit(EngineEvent::StatusPolled { upload_id, status });
                if terminal {
                    return PollExit::Terminal;
                }
            }
            Err(error) => {
                failures += 1;
                uploader_warn!(
                    "Polling job {} failed ({}/{}): {}",
                    job_id,
                    failures,
                    max_failures,
                    error
                );
                if failures >= max_failures {
                    sink.emit(EngineEvent::PollingAbandoned { upload_id, error });
                    return PollExit::Abandoned;
                }
            }
        }
    }

    uploader_debug!("Polling job {} cancelled", job_id);
    PollExit::Cancelled
}
