use std::collections::BTreeSet;

use uploader_logging::uploader_warn;
use url::{form_urlencoded, Url};

use crate::ModalView;

/// Declarative description of a dialog on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSpec {
    pub id: String,
    /// Element whose click opens the modal; `None` when it does not resolve.
    pub trigger: Option<String>,
    pub close_controls: Vec<String>,
}

impl ModalSpec {
    pub fn new(id: impl Into<String>, trigger: Option<&str>, close_controls: &[&str]) -> Self {
        Self {
            id: id.into(),
            trigger: trigger.map(ToOwned::to_owned),
            close_controls: close_controls.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ModalEntry {
    spec: ModalSpec,
    hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct ModalSet {
    entries: Vec<ModalEntry>,
}

impl ModalSet {
    pub(crate) fn new(specs: Vec<ModalSpec>) -> Self {
        Self {
            entries: specs
                .into_iter()
                .map(|spec| ModalEntry { spec, hidden: true })
                .collect(),
        }
    }

    /// Reveals every modal wired to `trigger_id`. Returns whether any matched.
    pub(crate) fn open_by_trigger(&mut self, trigger_id: &str) -> bool {
        let mut matched = false;
        for entry in &mut self.entries {
            if entry.spec.trigger.as_deref() == Some(trigger_id) {
                entry.hidden = false;
                matched = true;
            }
        }
        matched
    }

    /// Hides every modal that contains `control_id` as a close control.
    pub(crate) fn close_by_control(&mut self, control_id: &str) -> bool {
        let mut matched = false;
        for entry in &mut self.entries {
            if entry.spec.close_controls.iter().any(|c| c == control_id) {
                entry.hidden = true;
                matched = true;
            }
        }
        matched
    }

    pub(crate) fn set_hidden(&mut self, modal_id: &str, hidden: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.spec.id == modal_id) {
            Some(entry) => {
                entry.hidden = hidden;
                true
            }
            None => {
                uploader_warn!("Modal {:?} is not part of the page layout", modal_id);
                false
            }
        }
    }

    /// Triggers to invoke for a page loaded with the given query keys, one per modal.
    pub(crate) fn auto_open_triggers(&self, keys: &BTreeSet<String>) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| keys.contains(&entry.spec.id))
            .filter_map(|entry| match &entry.spec.trigger {
                Some(trigger) => Some(trigger.clone()),
                None => {
                    uploader_warn!(
                        "Modal {:?} requested by query but has no trigger; skipping",
                        entry.spec.id
                    );
                    None
                }
            })
            .collect()
    }

    pub(crate) fn views(&self) -> Vec<ModalView> {
        self.entries
            .iter()
            .map(|entry| ModalView {
                id: entry.spec.id.clone(),
                hidden: entry.hidden,
            })
            .collect()
    }
}

/// Query-parameter keys of a page URL. Accepts absolute URLs and bare `?a&b` strings.
pub fn query_keys(page_url: &str) -> BTreeSet<String> {
    let query = match Url::parse(page_url) {
        Ok(url) => url.query().unwrap_or_default().to_owned(),
        Err(_) => {
            let without_fragment = page_url.split('#').next().unwrap_or_default();
            without_fragment
                .split_once('?')
                .map(|(_, query)| query.to_owned())
                .unwrap_or_default()
        }
    };

    form_urlencoded::parse(query.as_bytes())
        .map(|(key, _)| key.into_owned())
        .filter(|key| !key.is_empty())
        .collect()
}
