pub const HIDDEN_CLASS: &str = "hidden";
pub const INVALID_CLASS: &str = "invalid";

pub const PUBLISHER_FILTER_INPUT: &str = "publisher-filter";
pub const PUBLISHER_LIST: &str = "publisher-list";
pub const DROP_TARGET: &str = "file-drop";
pub const FILE_PICKER: &str = "file-input";

pub const PROGRESS_CONTENT: &str = "fetch-progress-content";
pub const LOADER: &str = "fetch-loader";
pub const PRIMARY_BAR: &str = "stage-progress";
pub const PRIMARY_LABEL: &str = "stage-progress-label";
pub const PRIMARY_STEPS: &str = "stage-progress-steps";
pub const SECONDARY_BAR: &str = "substage-progress";
pub const SECONDARY_LABEL: &str = "substage-progress-label";
pub const RESULTS_BUTTON: &str = "fetch-results";
pub const MESSAGE: &str = "fetch-message";
pub const ERROR_TOGGLE: &str = "fetch-error-toggle";
pub const ERROR_DETAIL: &str = "fetch-error-detail";

pub const PROCESSING_ERROR_MESSAGE: &str = "There was an error processing the file";

pub fn publisher_row(index: usize) -> String {
    format!("publisher-{index}")
}
