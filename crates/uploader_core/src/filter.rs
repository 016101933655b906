use crate::PublisherRowView;

/// Lower-cases `text` and collapses every run of non-alphanumeric ASCII
/// characters (underscore included) into a single space.
pub fn normalize_name(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_gap = false;
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            in_gap = false;
        } else if !in_gap {
            out.push(' ');
            in_gap = true;
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct PublisherFilter {
    entries: Vec<String>,
    query: String,
    normalized_query: String,
}

impl PublisherFilter {
    pub(crate) fn new(entries: Vec<String>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub(crate) fn set_query(&mut self, query: String) {
        self.normalized_query = normalize_name(&query);
        self.query = query;
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    fn matches(&self, name: &str) -> bool {
        normalize_name(name).contains(&self.normalized_query)
    }

    pub(crate) fn rows(&self) -> Vec<PublisherRowView> {
        self.entries
            .iter()
            .map(|name| PublisherRowView {
                name: name.clone(),
                visible: self.matches(name),
            })
            .collect()
    }
}
