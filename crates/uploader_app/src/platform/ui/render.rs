use uploader_core::{
    OutcomeView, PageViewModel, ProgressBarView, ProgressDialogView, NOT_FOUND_MESSAGE,
};

use super::constants::*;
use crate::platform::dom::DomCommand;

pub fn render(view: &PageViewModel) -> Vec<DomCommand> {
    let mut cmds = Vec::new();

    for modal in &view.modals {
        cmds.push(DomCommand::set_hidden(modal.id.as_str(), modal.hidden));
    }

    cmds.push(DomCommand::SetAttribute {
        id: PUBLISHER_FILTER_INPUT.to_string(),
        name: "value",
        value: view.filter_query.clone(),
    });
    for (index, row) in view.publishers.iter().enumerate() {
        cmds.push(DomCommand::set_hidden(publisher_row(index), !row.visible));
    }

    if let Some(dialog) = &view.progress {
        render_progress(&mut cmds, dialog);
    }

    cmds
}

fn render_progress(cmds: &mut Vec<DomCommand>, dialog: &ProgressDialogView) {
    cmds.push(DomCommand::set_hidden(PROGRESS_CONTENT, dialog.outcome.is_some()));
    cmds.push(DomCommand::set_hidden(LOADER, !dialog.loader_visible));
    render_bar(cmds, PRIMARY_BAR, PRIMARY_LABEL, &dialog.primary);
    cmds.push(DomCommand::SetText {
        id: PRIMARY_STEPS.to_string(),
        text: dialog.primary.steps_text.clone(),
    });
    render_bar(cmds, SECONDARY_BAR, SECONDARY_LABEL, &dialog.secondary);

    let button = &dialog.results_button;
    cmds.push(DomCommand::SetText {
        id: RESULTS_BUTTON.to_string(),
        text: button.label.clone(),
    });
    cmds.push(DomCommand::SetAttribute {
        id: RESULTS_BUTTON.to_string(),
        name: "href",
        value: button.href.clone(),
    });
    cmds.push(DomCommand::SetClass {
        id: RESULTS_BUTTON.to_string(),
        class: INVALID_CLASS,
        enabled: button.invalid,
    });

    let message = match &dialog.outcome {
        None => None,
        Some(OutcomeView::NotFound) => Some(NOT_FOUND_MESSAGE.to_string()),
        Some(OutcomeView::ProcessingError { .. }) => Some(PROCESSING_ERROR_MESSAGE.to_string()),
        Some(OutcomeView::Failed { message }) => Some(format!("Could not fetch file: {message}")),
    };
    cmds.push(DomCommand::set_hidden(MESSAGE, message.is_none()));
    cmds.push(DomCommand::SetText {
        id: MESSAGE.to_string(),
        text: message.unwrap_or_default(),
    });

    let toggle = dialog.outcome.as_ref().and_then(OutcomeView::toggle_label);
    cmds.push(DomCommand::set_hidden(ERROR_TOGGLE, toggle.is_none()));
    cmds.push(DomCommand::SetText {
        id: ERROR_TOGGLE.to_string(),
        text: toggle.unwrap_or_default().to_string(),
    });

    let (detail, shown) = match &dialog.outcome {
        Some(OutcomeView::ProcessingError {
            exc_info,
            detail_shown,
        }) => (exc_info.clone(), *detail_shown),
        _ => (String::new(), false),
    };
    cmds.push(DomCommand::SetText {
        id: ERROR_DETAIL.to_string(),
        text: detail,
    });
    cmds.push(DomCommand::set_hidden(ERROR_DETAIL, !shown));
}

fn render_bar(cmds: &mut Vec<DomCommand>, bar_id: &str, label_id: &str, bar: &ProgressBarView) {
    cmds.push(DomCommand::SetAttribute {
        id: bar_id.to_string(),
        name: "value",
        value: bar.value.to_string(),
    });
    cmds.push(DomCommand::SetAttribute {
        id: bar_id.to_string(),
        name: "max",
        value: bar.max.to_string(),
    });
    cmds.push(DomCommand::SetText {
        id: label_id.to_string(),
        text: bar.label.clone(),
    });
    cmds.push(DomCommand::set_hidden(bar_id, !bar.visible));
    cmds.push(DomCommand::set_hidden(label_id, !bar.visible));
}
