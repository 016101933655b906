use uploader_logging::uploader_debug;

use crate::modal::query_keys;
use crate::tracker::{UploadSource, CANCEL_LABEL};
use crate::{AppState, Effect, FileRef, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageLoaded { url } => {
            let keys = query_keys(&url);
            // Invoke each modal's trigger as if clicked, once per modal.
            for trigger in state.modals().auto_open_triggers(&keys) {
                if state.modals_mut().open_by_trigger(&trigger) {
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::PageUnloaded => {
            let effects = state
                .tracking_jobs()
                .into_iter()
                .map(|(upload_id, _)| Effect::StopPolling { upload_id })
                .collect();
            state.tear_down();
            effects
        }
        Msg::ModalTriggerClicked { trigger_id } => {
            if state.modals_mut().open_by_trigger(&trigger_id) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ModalCloseClicked { control_id } => {
            if state.modals_mut().close_by_control(&control_id) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FilterChanged(query) => {
            state.set_filter_query(query);
            Vec::new()
        }
        Msg::DropTargetClicked => vec![Effect::OpenFilePicker],
        Msg::FilesDropped(files) | Msg::FilesPicked(files) => {
            if state.is_torn_down() {
                return (state, Vec::new());
            }
            submit_files(&mut state, files)
        }
        Msg::RegistryLinkClicked { href } => {
            if state.is_torn_down() {
                return (state, Vec::new());
            }
            let upload_id = state.begin_upload(UploadSource::Registry { href: href.clone() });
            vec![Effect::SubmitRegistryFetch { upload_id, href }]
        }
        Msg::UploadSubmitted { upload_id, result } => match result {
            Ok(job_id) if !state.is_torn_down() => {
                if state.start_tracking(upload_id, job_id.clone()) {
                    vec![Effect::StartPolling { upload_id, job_id }]
                } else {
                    Vec::new()
                }
            }
            Ok(job_id) => {
                uploader_debug!("Page torn down; not tracking job {}", job_id);
                Vec::new()
            }
            Err(message) => {
                state.fail_submission(upload_id, message);
                Vec::new()
            }
        },
        Msg::JobPolled { upload_id, status } => match state.apply_polled(upload_id, status) {
            Some(phase) if phase.is_terminal() => vec![Effect::StopPolling { upload_id }],
            _ => Vec::new(),
        },
        Msg::PollFailed { upload_id, message } => {
            if state.fail_polling(upload_id, message) {
                vec![Effect::StopPolling { upload_id }]
            } else {
                Vec::new()
            }
        }
        Msg::ResultsButtonClicked => results_button_clicked(&state),
        Msg::ErrorToggleClicked => {
            state.toggle_displayed_error();
            Vec::new()
        }
    };

    (state, effects)
}

fn submit_files(state: &mut AppState, files: Vec<FileRef>) -> Vec<Effect> {
    files
        .into_iter()
        .map(|file| {
            let upload_id = state.begin_upload(UploadSource::File(file.clone()));
            Effect::SubmitUpload { upload_id, file }
        })
        .collect()
}

// While the button still offers cancellation it never navigates; afterwards it is a plain link.
fn results_button_clicked(state: &AppState) -> Vec<Effect> {
    let Some(dialog) = state.displayed_dialog() else {
        return Vec::new();
    };
    if dialog.results_button.label == CANCEL_LABEL {
        state
            .tracking_jobs()
            .into_iter()
            .map(|(upload_id, job_id)| Effect::CancelJob { upload_id, job_id })
            .collect()
    } else {
        vec![Effect::Navigate {
            href: dialog.results_button.href.clone(),
        }]
    }
}
