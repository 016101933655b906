use uploader_core::PageLayout;

use super::constants::*;
use crate::platform::dom::DomCommand;

fn element(id: &str, parent: Option<&str>, tag: &'static str, text: &str) -> DomCommand {
    DomCommand::CreateElement {
        id: id.to_string(),
        parent: parent.map(ToOwned::to_owned),
        tag,
        text: text.to_string(),
    }
}

/// Builds the static page: modals with their controls, the publisher list, the
/// drop target and the progress dialog skeleton.
pub fn initial_commands(layout: &PageLayout) -> Vec<DomCommand> {
    let mut commands = Vec::new();

    for modal in &layout.modals {
        commands.push(element(&modal.id, None, "div", ""));
        commands.push(DomCommand::set_hidden(modal.id.as_str(), true));
        if let Some(trigger) = &modal.trigger {
            commands.push(element(trigger, None, "a", ""));
            commands.push(DomCommand::SetAttribute {
                id: trigger.clone(),
                name: "href",
                value: format!("?{}", modal.id),
            });
        }
        for close in &modal.close_controls {
            commands.push(element(close, Some(modal.id.as_str()), "button", "Close"));
        }
    }

    commands.push(element(PUBLISHER_FILTER_INPUT, None, "input", ""));
    commands.push(element(PUBLISHER_LIST, None, "ul", ""));
    for (index, name) in layout.publishers.iter().enumerate() {
        commands.push(element(&publisher_row(index), Some(PUBLISHER_LIST), "li", name));
    }

    let selection = Some(layout.selection_modal.as_str());
    commands.push(element(DROP_TARGET, selection, "div", "Drop a file here"));
    commands.push(element(FILE_PICKER, selection, "input", ""));
    commands.push(DomCommand::set_hidden(FILE_PICKER, true));

    let progress = Some(layout.progress_modal.as_str());
    commands.push(element(PROGRESS_CONTENT, progress, "div", ""));
    let content = Some(PROGRESS_CONTENT);
    commands.push(element(LOADER, content, "div", ""));
    commands.push(element(PRIMARY_LABEL, content, "span", ""));
    commands.push(element(PRIMARY_STEPS, content, "span", ""));
    commands.push(element(PRIMARY_BAR, content, "progress", ""));
    commands.push(element(SECONDARY_LABEL, content, "span", ""));
    commands.push(element(SECONDARY_BAR, content, "progress", ""));
    commands.push(element(RESULTS_BUTTON, progress, "a", ""));
    commands.push(element(MESSAGE, progress, "p", ""));
    commands.push(element(ERROR_TOGGLE, progress, "a", ""));
    commands.push(element(ERROR_DETAIL, progress, "pre", ""));
    for id in [MESSAGE, ERROR_TOGGLE, ERROR_DETAIL] {
        commands.push(DomCommand::set_hidden(id, true));
    }

    commands
}
