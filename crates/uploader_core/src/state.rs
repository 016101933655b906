use std::collections::BTreeMap;
use std::path::PathBuf;

use uploader_logging::{uploader_debug, uploader_warn};

use crate::filter::PublisherFilter;
use crate::modal::{ModalSet, ModalSpec};
use crate::tracker::{JobPhase, PolledStatus, Tracker, UploadSource};
use crate::view_model::{JobRowView, PageViewModel};

/// Local identifier of one submission; the backend job id arrives later.
pub type UploadId = u64;

/// A local file chosen by drop or file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub path: PathBuf,
}

impl FileRef {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }
}

/// Everything the page declares at setup time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLayout {
    /// Dialog holding the drop target and registry links.
    pub selection_modal: String,
    /// Dialog showing job progress.
    pub progress_modal: String,
    pub modals: Vec<ModalSpec>,
    pub publishers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    modals: ModalSet,
    selection_modal: String,
    progress_modal: String,
    filter: PublisherFilter,
    trackers: BTreeMap<UploadId, Tracker>,
    next_upload_id: UploadId,
    last_rendered: Option<UploadId>,
    torn_down: bool,
    dirty: bool,
}

impl AppState {
    pub fn new(layout: PageLayout) -> Self {
        Self {
            modals: ModalSet::new(layout.modals),
            selection_modal: layout.selection_modal,
            progress_modal: layout.progress_modal,
            filter: PublisherFilter::new(layout.publishers),
            next_upload_id: 1,
            ..Self::default()
        }
    }

    pub fn view(&self) -> PageViewModel {
        let jobs: Vec<JobRowView> = self
            .trackers
            .iter()
            .map(|(upload_id, tracker)| JobRowView {
                upload_id: *upload_id,
                source: tracker.source.label().to_string(),
                job_id: tracker.job_id.clone(),
                phase: tracker.phase,
            })
            .collect();
        let pending_jobs = if self.torn_down {
            0
        } else {
            jobs.iter().filter(|job| !job.phase.is_terminal()).count()
        };

        PageViewModel {
            modals: self.modals.views(),
            filter_query: self.filter.query().to_string(),
            publishers: self.filter.rows(),
            progress: self
                .last_rendered
                .and_then(|id| self.trackers.get(&id))
                .map(|tracker| tracker.dialog.clone()),
            jobs,
            pending_jobs,
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub(crate) fn modals_mut(&mut self) -> &mut ModalSet {
        &mut self.modals
    }

    pub(crate) fn modals(&self) -> &ModalSet {
        &self.modals
    }

    pub(crate) fn set_filter_query(&mut self, query: String) {
        self.filter.set_query(query);
        self.mark_dirty();
    }

    pub(crate) fn begin_upload(&mut self, source: UploadSource) -> UploadId {
        let upload_id = self.next_upload_id;
        self.next_upload_id += 1;
        uploader_debug!("Upload {} started from {:?}", upload_id, source.label());
        self.trackers.insert(upload_id, Tracker::new(upload_id, source));
        self.mark_dirty();
        upload_id
    }

    /// Seeds tracking for a submitted job and brings the progress dialog forward.
    pub(crate) fn start_tracking(&mut self, upload_id: UploadId, job_id: String) -> bool {
        let Some(tracker) = self.submitting_tracker(upload_id) else {
            return false;
        };
        uploader_debug!("Upload {} is backend job {}", upload_id, job_id);
        tracker.start_tracking(job_id);
        self.show_progress_dialog(upload_id);
        true
    }

    pub(crate) fn fail_submission(&mut self, upload_id: UploadId, message: String) {
        let Some(tracker) = self.submitting_tracker(upload_id) else {
            return;
        };
        uploader_warn!("Upload {} could not be submitted: {}", upload_id, message);
        tracker.fail(message);
        self.show_progress_dialog(upload_id);
    }

    /// Applies a polled snapshot. Returns the new phase when the job was tracking.
    pub(crate) fn apply_polled(
        &mut self,
        upload_id: UploadId,
        status: PolledStatus,
    ) -> Option<JobPhase> {
        let tracker = self.tracking_tracker(upload_id)?;
        tracker.apply_status(status);
        let phase = tracker.phase;
        self.last_rendered = Some(upload_id);
        self.mark_dirty();
        Some(phase)
    }

    pub(crate) fn fail_polling(&mut self, upload_id: UploadId, message: String) -> bool {
        let Some(tracker) = self.tracking_tracker(upload_id) else {
            return false;
        };
        uploader_warn!("Upload {} stopped polling: {}", upload_id, message);
        tracker.fail(message);
        self.last_rendered = Some(upload_id);
        self.mark_dirty();
        true
    }

    pub(crate) fn displayed_dialog(&self) -> Option<&crate::ProgressDialogView> {
        self.last_rendered
            .and_then(|id| self.trackers.get(&id))
            .map(|tracker| &tracker.dialog)
    }

    pub(crate) fn toggle_displayed_error(&mut self) {
        let toggled = self
            .last_rendered
            .and_then(|id| self.trackers.get_mut(&id))
            .is_some_and(|tracker| tracker.toggle_error_detail());
        if toggled {
            self.mark_dirty();
        }
    }

    /// `(upload_id, job_id)` of every job still being polled.
    pub(crate) fn tracking_jobs(&self) -> Vec<(UploadId, String)> {
        self.trackers
            .iter()
            .filter(|(_, tracker)| tracker.phase == JobPhase::Tracking)
            .filter_map(|(id, tracker)| tracker.job_id.clone().map(|job_id| (*id, job_id)))
            .collect()
    }

    pub(crate) fn tear_down(&mut self) {
        self.torn_down = true;
        self.mark_dirty();
    }

    fn submitting_tracker(&mut self, upload_id: UploadId) -> Option<&mut Tracker> {
        match self.trackers.get_mut(&upload_id) {
            Some(tracker) if tracker.phase == JobPhase::Submitting => Some(tracker),
            _ => {
                uploader_debug!("Ignoring submission result for upload {}", upload_id);
                None
            }
        }
    }

    fn tracking_tracker(&mut self, upload_id: UploadId) -> Option<&mut Tracker> {
        if self.torn_down {
            return None;
        }
        match self.trackers.get_mut(&upload_id) {
            Some(tracker) if tracker.phase == JobPhase::Tracking => Some(tracker),
            _ => {
                uploader_debug!("Ignoring job update for upload {}", upload_id);
                None
            }
        }
    }

    fn show_progress_dialog(&mut self, upload_id: UploadId) {
        let progress_modal = self.progress_modal.clone();
        let selection_modal = self.selection_modal.clone();
        self.modals.set_hidden(&progress_modal, false);
        self.modals.set_hidden(&selection_modal, true);
        self.last_rendered = Some(upload_id);
        self.mark_dirty();
    }
}
