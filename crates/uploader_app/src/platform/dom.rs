//! In-memory stand-in for the page's DOM.
//!
//! The render layer never touches elements directly; it emits [`DomCommand`]s
//! that the document applies, the same way a browser binding would.

use std::collections::{BTreeMap, BTreeSet};

use uploader_logging::uploader_warn;

use super::ui::constants::HIDDEN_CLASS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomCommand {
    CreateElement {
        id: String,
        parent: Option<String>,
        tag: &'static str,
        text: String,
    },
    SetClass {
        id: String,
        class: &'static str,
        enabled: bool,
    },
    SetText {
        id: String,
        text: String,
    },
    SetAttribute {
        id: String,
        name: &'static str,
        value: String,
    },
}

impl DomCommand {
    pub fn set_hidden(id: impl Into<String>, hidden: bool) -> Self {
        DomCommand::SetClass {
            id: id.into(),
            class: HIDDEN_CLASS,
            enabled: hidden,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: &'static str,
    pub parent: Option<String>,
    pub classes: BTreeSet<String>,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    elements: BTreeMap<String, Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_all(&mut self, commands: impl IntoIterator<Item = DomCommand>) {
        for command in commands {
            self.apply(command);
        }
    }

    /// Applies one command. Commands addressing a missing element are dropped.
    pub fn apply(&mut self, command: DomCommand) {
        match command {
            DomCommand::CreateElement {
                id,
                parent,
                tag,
                text,
            } => {
                self.elements.insert(
                    id,
                    Element {
                        tag,
                        parent,
                        text,
                        ..Element::default()
                    },
                );
            }
            DomCommand::SetClass { id, class, enabled } => {
                if let Some(element) = self.element_mut(&id) {
                    if enabled {
                        element.classes.insert(class.to_string());
                    } else {
                        element.classes.remove(class);
                    }
                }
            }
            DomCommand::SetText { id, text } => {
                if let Some(element) = self.element_mut(&id) {
                    element.text = text;
                }
            }
            DomCommand::SetAttribute { id, name, value } => {
                if let Some(element) = self.element_mut(&id) {
                    element.attributes.insert(name.to_string(), value);
                }
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.get(id).map(|element| element.text.as_str())
    }

    pub fn attribute(&self, id: &str, name: &str) -> Option<&str> {
        self.get(id)
            .and_then(|element| element.attributes.get(name))
            .map(String::as_str)
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.get(id)
            .is_some_and(|element| element.classes.contains(class))
    }

    /// Hidden itself or through any ancestor.
    pub fn is_hidden(&self, id: &str) -> bool {
        let mut current = self.get(id);
        while let Some(element) = current {
            if element.classes.contains(HIDDEN_CLASS) {
                return true;
            }
            current = element.parent.as_deref().and_then(|parent| self.get(parent));
        }
        false
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        let element = self.elements.get_mut(id);
        if element.is_none() {
            uploader_warn!("No element with id {:?} on the page", id);
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(id: &str, parent: Option<&str>) -> DomCommand {
        DomCommand::CreateElement {
            id: id.to_string(),
            parent: parent.map(ToOwned::to_owned),
            tag: "div",
            text: String::new(),
        }
    }

    #[test]
    fn hidden_propagates_from_ancestors() {
        let mut doc = Document::new();
        doc.apply_all([create("modal", None), create("bar", Some("modal"))]);
        assert!(!doc.is_hidden("bar"));

        doc.apply(DomCommand::set_hidden("modal", true));
        assert!(doc.is_hidden("bar"));
        assert!(!doc.has_class("bar", HIDDEN_CLASS));

        doc.apply(DomCommand::set_hidden("modal", false));
        assert!(!doc.is_hidden("bar"));
    }

    #[test]
    fn commands_for_missing_elements_are_ignored() {
        let mut doc = Document::new();
        doc.apply(DomCommand::SetText {
            id: "ghost".to_string(),
            text: "boo".to_string(),
        });
        assert!(!doc.contains("ghost"));
        assert_eq!(doc.text("ghost"), None);
    }

    #[test]
    fn attributes_and_text_are_replaced() {
        let mut doc = Document::new();
        doc.apply(create("link", None));
        for href in ["#", "/file/abc"] {
            doc.apply(DomCommand::SetAttribute {
                id: "link".to_string(),
                name: "href",
                value: href.to_string(),
            });
        }
        doc.apply(DomCommand::SetText {
            id: "link".to_string(),
            text: "View results".to_string(),
        });
        assert_eq!(doc.attribute("link", "href"), Some("/file/abc"));
        assert_eq!(doc.text("link"), Some("View results"));
    }
}
