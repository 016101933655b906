use serde::Deserialize;
use serde_json::Value;

use crate::{ClientError, FailureKind, JobProgress, JobStatus};

#[derive(Debug, Deserialize)]
struct RawStatus {
    status: String,
    #[serde(default)]
    stages: Option<Vec<String>>,
    #[serde(default)]
    progress: Option<RawProgress>,
    #[serde(default)]
    result: Option<Vec<Value>>,
    #[serde(default)]
    exc_info: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawProgress {
    stage: usize,
    #[serde(default)]
    progress: Option<(u64, u64)>,
}

#[derive(Debug, Deserialize)]
struct JobTicket {
    job: String,
}

/// Decode and validate a job status body.
pub fn decode_job_status(body: &str) -> Result<JobStatus, ClientError> {
    let raw: RawStatus = serde_json::from_str(body).map_err(malformed)?;

    let status = match raw.status.as_str() {
        "not-found" => JobStatus::NotFound,
        "processing-error" => JobStatus::ProcessingError {
            exc_info: raw.exc_info.unwrap_or_default(),
        },
        "in-progress" => {
            let stages = raw.stages.unwrap_or_default();
            if let Some(progress) = &raw.progress {
                // A stage list, when sent, must contain the current stage.
                if !stages.is_empty() && progress.stage >= stages.len() {
                    return Err(ClientError::new(
                        FailureKind::MalformedResponse,
                        format!(
                            "stage {} out of range for {} stages",
                            progress.stage,
                            stages.len()
                        ),
                    ));
                }
            }
            JobStatus::InProgress {
                stages,
                progress: raw.progress.map(|progress| JobProgress {
                    stage: progress.stage,
                    sub_step: progress.progress,
                }),
            }
        }
        "completed" => JobStatus::Completed {
            file_id: first_file_id(raw.result.as_deref())?,
        },
        _ => JobStatus::Unknown { status: raw.status },
    };
    Ok(status)
}

/// Decode the `{"job": "<id>"}` answer to a submission.
pub fn decode_job_ticket(body: &str) -> Result<String, ClientError> {
    let ticket: JobTicket = serde_json::from_str(body).map_err(malformed)?;
    if ticket.job.is_empty() {
        return Err(ClientError::new(
            FailureKind::MalformedResponse,
            "empty job id",
        ));
    }
    Ok(ticket.job)
}

fn first_file_id(result: Option<&[Value]>) -> Result<String, ClientError> {
    match result.and_then(|values| values.first()) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        other => Err(ClientError::new(
            FailureKind::MalformedResponse,
            format!("completed job without a file id (result[0] = {other:?})"),
        )),
    }
}

fn malformed(err: serde_json::Error) -> ClientError {
    ClientError::new(FailureKind::MalformedResponse, err.to_string())
}
