use std::sync::Once;

use pretty_assertions::assert_eq;
use uploader_core::{
    update, AppState, Effect, FileRef, JobPhase, ModalSpec, Msg, OutcomeView, PageLayout,
    PolledStatus, ProgressDialogView, StageProgress, UploadId, CANCEL_LABEL, COMPLETED_LABEL,
    DEFAULT_BAR_MAX, DISABLED_HREF, NOT_FOUND_MESSAGE, VIEW_RESULTS_LABEL,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(uploader_logging::initialize_for_tests);
}

fn layout() -> PageLayout {
    PageLayout {
        selection_modal: "upload-dataset".to_string(),
        progress_modal: "fetch-progress".to_string(),
        modals: vec![
            ModalSpec::new("upload-dataset", Some("upload-dataset-link"), &[]),
            ModalSpec::new("fetch-progress", None, &["fetch-progress-close"]),
        ],
        publishers: Vec::new(),
    }
}

fn stages() -> Vec<String> {
    vec!["Load dataset".to_string(), "Check column names".to_string()]
}

fn file(name: &str) -> FileRef {
    FileRef::from_path(format!("/tmp/{name}"))
}

fn in_progress(stage: usize, sub_step: Option<(u64, u64)>) -> PolledStatus {
    PolledStatus::InProgress {
        stages: stages(),
        progress: Some(StageProgress { stage, sub_step }),
    }
}

/// Drops one file and answers its submission with `job_id`.
fn tracking(job_id: &str) -> (AppState, UploadId) {
    init_logging();
    let state = AppState::new(layout());
    let (state, _) = update(state, Msg::FilesDropped(vec![file("grants.csv")]));
    let (state, effects) = update(
        state,
        Msg::UploadSubmitted {
            upload_id: 1,
            result: Ok(job_id.to_string()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            upload_id: 1,
            job_id: job_id.to_string(),
        }]
    );
    (state, 1)
}

fn poll(state: AppState, upload_id: UploadId, status: PolledStatus) -> (AppState, Vec<Effect>) {
    update(state, Msg::JobPolled { upload_id, status })
}

fn dialog(state: &AppState) -> ProgressDialogView {
    state.view().progress.expect("progress dialog rendered")
}

#[test]
fn dropping_n_files_submits_n_uploads() {
    init_logging();
    let state = AppState::new(layout());
    let (state, effects) = update(
        state,
        Msg::FilesDropped(vec![file("a.csv"), file("b.csv"), file("c.xlsx")]),
    );

    assert_eq!(
        effects,
        vec![
            Effect::SubmitUpload {
                upload_id: 1,
                file: file("a.csv"),
            },
            Effect::SubmitUpload {
                upload_id: 2,
                file: file("b.csv"),
            },
            Effect::SubmitUpload {
                upload_id: 3,
                file: file("c.xlsx"),
            },
        ]
    );
    assert_eq!(state.view().pending_jobs, 3);

    let mut state = state;
    let mut started = Vec::new();
    for (upload_id, job_id) in [(1, "job-a"), (2, "job-b"), (3, "job-c")] {
        let (next, effects) = update(
            state,
            Msg::UploadSubmitted {
                upload_id,
                result: Ok(job_id.to_string()),
            },
        );
        started.extend(effects);
        state = next;
    }
    assert_eq!(started.len(), 3);
    let job_ids: Vec<_> = state
        .view()
        .jobs
        .into_iter()
        .filter_map(|job| job.job_id)
        .collect();
    assert_eq!(job_ids, vec!["job-a", "job-b", "job-c"]);
}

#[test]
fn drop_target_click_opens_file_picker() {
    init_logging();
    let (state, effects) = update(AppState::new(layout()), Msg::DropTargetClicked);
    assert_eq!(effects, vec![Effect::OpenFilePicker]);

    let (_state, effects) = update(state, Msg::FilesPicked(vec![file("picked.csv")]));
    assert_eq!(
        effects,
        vec![Effect::SubmitUpload {
            upload_id: 1,
            file: file("picked.csv"),
        }]
    );
}

#[test]
fn registry_link_submits_its_href() {
    init_logging();
    let (state, effects) = update(
        AppState::new(layout()),
        Msg::RegistryLinkClicked {
            href: "/fetch/registry/360G-example".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::SubmitRegistryFetch {
            upload_id: 1,
            href: "/fetch/registry/360G-example".to_string(),
        }]
    );
    assert_eq!(state.view().jobs[0].phase, JobPhase::Submitting);
    assert!(state.view().progress.is_none());
}

#[test]
fn tracking_shows_progress_dialog_with_initial_controls() {
    let (state, _) = tracking("job-1");
    let view = state.view();

    let progress_hidden = view.modals.iter().find(|m| m.id == "fetch-progress").unwrap();
    let selection_hidden = view.modals.iter().find(|m| m.id == "upload-dataset").unwrap();
    assert!(!progress_hidden.hidden);
    assert!(selection_hidden.hidden);

    let dialog = dialog(&state);
    assert!(dialog.loader_visible);
    assert_eq!(dialog.primary.value, 0);
    assert_eq!(dialog.primary.max, DEFAULT_BAR_MAX);
    assert_eq!(dialog.secondary.value, 0);
    assert_eq!(dialog.secondary.max, DEFAULT_BAR_MAX);
    assert_eq!(dialog.results_button.label, CANCEL_LABEL);
    assert_eq!(dialog.results_button.href, DISABLED_HREF);
    assert!(dialog.results_button.invalid);
    assert_eq!(dialog.job_id.as_deref(), Some("job-1"));
}

#[test]
fn polling_sequence_renders_stages_and_stops_on_completion() {
    let (state, id) = tracking("job-1");

    // In progress, no progress record yet: loader only.
    let (state, effects) = poll(
        state,
        id,
        PolledStatus::InProgress {
            stages: stages(),
            progress: None,
        },
    );
    assert!(effects.is_empty());
    let d = dialog(&state);
    assert!(d.loader_visible);
    assert_eq!((d.primary.value, d.primary.max), (0, DEFAULT_BAR_MAX));
    assert!(d.results_button.invalid);

    // Stage 0 with sub-step 2 of 5.
    let (state, effects) = poll(state, id, in_progress(0, Some((2, 5))));
    assert!(effects.is_empty());
    let d = dialog(&state);
    assert!(!d.loader_visible);
    assert!(!d.results_button.invalid);
    assert_eq!(d.results_button.label, CANCEL_LABEL);
    assert_eq!(d.results_button.href, DISABLED_HREF);
    // The label shows the name after the current index.
    assert_eq!(d.primary.label, "Check column names");
    assert_eq!(d.primary.steps_text, "Stage 1 of 2");
    // Current stage number, not stages completed.
    assert_eq!((d.primary.value, d.primary.max), (1, 2));
    assert!(d.secondary.visible);
    assert_eq!(d.secondary.label, "2 of 5");
    assert_eq!((d.secondary.value, d.secondary.max), (2, 5));

    // Stage 1 without sub-steps hides the secondary bar.
    let (state, effects) = poll(state, id, in_progress(1, None));
    assert!(effects.is_empty());
    let d = dialog(&state);
    assert_eq!((d.primary.value, d.primary.max), (2, 2));
    assert_eq!(d.primary.steps_text, "Stage 2 of 2");
    assert_eq!(d.primary.label, "Check column names");
    assert!(!d.secondary.visible);

    // Completion stops polling and turns the button into a link.
    let (state, effects) = poll(
        state,
        id,
        PolledStatus::Completed {
            file_id: "abc123".to_string(),
        },
    );
    assert_eq!(effects, vec![Effect::StopPolling { upload_id: id }]);
    let d = dialog(&state);
    assert_eq!(d.primary.label, COMPLETED_LABEL);
    assert_eq!(d.primary.value, d.primary.max);
    assert!(!d.secondary.visible);
    assert!(!d.loader_visible);
    assert_eq!(d.results_button.label, VIEW_RESULTS_LABEL);
    assert_eq!(d.results_button.href, "/file/abc123");
    assert!(!d.results_button.invalid);
    assert_eq!(state.view().pending_jobs, 0);

    // A late response after completion changes nothing.
    let (state, effects) = poll(state, id, in_progress(0, None));
    assert!(effects.is_empty());
    assert_eq!(dialog(&state).results_button.href, "/file/abc123");
}

#[test]
fn unknown_status_keeps_loader() {
    let (state, id) = tracking("job-1");
    let (state, _) = poll(state, id, in_progress(0, None));
    assert!(!dialog(&state).loader_visible);

    let (state, effects) = poll(state, id, PolledStatus::Unknown("queued".to_string()));
    assert!(effects.is_empty());
    assert!(dialog(&state).loader_visible);
    assert_eq!(state.view().jobs[0].phase, JobPhase::Tracking);
}

#[test]
fn not_found_stops_polling_with_message() {
    let (state, id) = tracking("job-1");
    let (state, effects) = poll(state, id, PolledStatus::NotFound);

    assert_eq!(effects, vec![Effect::StopPolling { upload_id: id }]);
    assert_eq!(dialog(&state).outcome, Some(OutcomeView::NotFound));
    assert_eq!(state.view().jobs[0].phase, JobPhase::NotFound);
    assert_eq!(NOT_FOUND_MESSAGE, "File could not be found");

    let (_, effects) = poll(state, id, in_progress(0, None));
    assert!(effects.is_empty());
}

#[test]
fn processing_error_stops_polling_and_toggles_detail() {
    let (state, id) = tracking("job-1");
    let (state, effects) = poll(
        state,
        id,
        PolledStatus::ProcessingError {
            exc_info: "Traceback: KeyError 'Amount Awarded'".to_string(),
        },
    );
    assert_eq!(effects, vec![Effect::StopPolling { upload_id: id }]);

    let outcome = dialog(&state).outcome.expect("error outcome");
    assert_eq!(outcome.toggle_label(), Some("Show error"));

    let (state, _) = update(state, Msg::ErrorToggleClicked);
    let outcome = dialog(&state).outcome.expect("error outcome");
    assert_eq!(
        outcome,
        OutcomeView::ProcessingError {
            exc_info: "Traceback: KeyError 'Amount Awarded'".to_string(),
            detail_shown: true,
        }
    );
    assert_eq!(outcome.toggle_label(), Some("Hide error"));

    let (state, _) = update(state, Msg::ErrorToggleClicked);
    assert_eq!(
        dialog(&state).outcome.unwrap().toggle_label(),
        Some("Show error")
    );
}

#[test]
fn results_button_cancels_while_fetching() {
    let (state, id) = tracking("job-1");
    let (state, effects) = update(state, Msg::ResultsButtonClicked);

    assert_eq!(
        effects,
        vec![Effect::CancelJob {
            upload_id: id,
            job_id: "job-1".to_string(),
        }]
    );
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::Navigate { .. })));

    // Still cancellable once progress enables the button.
    let (state, _) = poll(state, id, in_progress(0, None));
    let (_, effects) = update(state, Msg::ResultsButtonClicked);
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::CancelJob { .. }));
}

#[test]
fn results_button_navigates_after_completion() {
    let (state, id) = tracking("job-1");
    let (state, _) = poll(
        state,
        id,
        PolledStatus::Completed {
            file_id: "abc123".to_string(),
        },
    );
    let (_, effects) = update(state, Msg::ResultsButtonClicked);

    assert_eq!(
        effects,
        vec![Effect::Navigate {
            href: "/file/abc123".to_string(),
        }]
    );
}

#[test]
fn results_button_without_dialog_is_ignored() {
    init_logging();
    let (_, effects) = update(AppState::new(layout()), Msg::ResultsButtonClicked);
    assert!(effects.is_empty());
}

#[test]
fn submission_failure_is_terminal_and_visible() {
    init_logging();
    let state = AppState::new(layout());
    let (state, _) = update(state, Msg::FilesDropped(vec![file("broken.csv")]));
    let (state, effects) = update(
        state,
        Msg::UploadSubmitted {
            upload_id: 1,
            result: Err("http status 500".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().pending_jobs, 0);
    assert_eq!(
        dialog(&state).outcome,
        Some(OutcomeView::Failed {
            message: "http status 500".to_string(),
        })
    );
}

#[test]
fn poll_failure_stops_polling() {
    let (state, id) = tracking("job-1");
    let (state, effects) = update(
        state,
        Msg::PollFailed {
            upload_id: id,
            message: "network error".to_string(),
        },
    );
    assert_eq!(effects, vec![Effect::StopPolling { upload_id: id }]);
    assert_eq!(state.view().jobs[0].phase, JobPhase::Failed);

    let (_, effects) = update(
        state,
        Msg::PollFailed {
            upload_id: id,
            message: "again".to_string(),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn teardown_stops_every_active_timer() {
    init_logging();
    let state = AppState::new(layout());
    let (state, _) = update(state, Msg::FilesDropped(vec![file("a.csv"), file("b.csv")]));
    let (state, _) = update(
        state,
        Msg::UploadSubmitted {
            upload_id: 1,
            result: Ok("job-a".to_string()),
        },
    );
    let (state, _) = update(
        state,
        Msg::UploadSubmitted {
            upload_id: 2,
            result: Ok("job-b".to_string()),
        },
    );
    let (state, _) = poll(
        state,
        2,
        PolledStatus::Completed {
            file_id: "f".to_string(),
        },
    );

    let (state, effects) = update(state, Msg::PageUnloaded);
    assert_eq!(effects, vec![Effect::StopPolling { upload_id: 1 }]);
    assert_eq!(state.view().pending_jobs, 0);

    let (_, effects) = poll(state, 1, in_progress(0, None));
    assert!(effects.is_empty());
}

#[test]
fn last_rendered_job_owns_the_shared_dialog() {
    init_logging();
    let state = AppState::new(layout());
    let (state, _) = update(state, Msg::FilesDropped(vec![file("a.csv"), file("b.csv")]));
    let (state, _) = update(
        state,
        Msg::UploadSubmitted {
            upload_id: 1,
            result: Ok("job-a".to_string()),
        },
    );
    let (state, _) = update(
        state,
        Msg::UploadSubmitted {
            upload_id: 2,
            result: Ok("job-b".to_string()),
        },
    );
    assert_eq!(dialog(&state).upload_id, 2);

    let (state, _) = poll(state, 1, in_progress(0, Some((1, 3))));
    assert_eq!(dialog(&state).upload_id, 1);
    assert_eq!(dialog(&state).source, "a.csv");

    // Cancelling from the shared button reaches every running job.
    let (_, effects) = update(state, Msg::ResultsButtonClicked);
    assert_eq!(
        effects,
        vec![
            Effect::CancelJob {
                upload_id: 1,
                job_id: "job-a".to_string(),
            },
            Effect::CancelJob {
                upload_id: 2,
                job_id: "job-b".to_string(),
            },
        ]
    );
}

#[test]
fn stage_label_falls_back_on_last_stage() {
    let (state, id) = tracking("job-1");
    let (state, _) = poll(state, id, in_progress(5, None));
    let d = dialog(&state);
    assert_eq!(d.primary.label, "");
    assert_eq!(d.primary.steps_text, "Stage 6 of 2");
}

#[test]
fn huge_stage_index_does_not_overflow() {
    let (state, id) = tracking("job-1");
    let (state, effects) = poll(state, id, in_progress(usize::MAX, None));
    assert_eq!(effects, vec![]);

    let d = dialog(&state);
    assert_eq!(d.primary.label, "");
    assert_eq!(d.primary.value, u64::MAX);
    assert_eq!(d.primary.max, 2);
    assert_eq!(state.view().jobs[0].phase, JobPhase::Tracking);
}
