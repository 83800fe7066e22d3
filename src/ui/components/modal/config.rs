//! Configuration handed to the modal shell by its owner each frame

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use super::content::ModalContent;

/// Produces a freshly mounted content instance
pub type ContentFactory = Rc<dyn Fn() -> Box<dyn ModalContent>>;

/// Save/delete callback. Errors are returned to the caller untouched.
pub type Handler<'a> = Box<dyn FnMut() -> anyhow::Result<()> + 'a>;

/// Open-state setter owned by the parent
pub type OpenChangeHandler<'a> = Box<dyn FnMut(bool) + 'a>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModalError {
    #[error("Tab id must not be empty (label: {0})")]
    EmptyTabId(String),
    #[error("Duplicate tab id: {0}")]
    DuplicateTabId(String),
}

/// Panel size variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
}

impl ModalSize {
    /// Preferred (width, height) in cells before capping to the screen
    pub fn dimensions(&self) -> (u16, u16) {
        match self {
            ModalSize::Small => (40, 12),
            ModalSize::Medium => (60, 20),
            ModalSize::Large => (80, 28),
            ModalSize::ExtraLarge => (100, 36),
        }
    }
}

/// One tab of a tabbed modal
#[derive(Clone)]
pub struct TabDescriptor {
    pub id: String,
    pub label: String,
    /// Glyph drawn before the label
    pub icon: Option<String>,
    pub content: ContentFactory,
}

impl TabDescriptor {
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, content: F) -> Self
    where
        F: Fn() -> Box<dyn ModalContent> + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            content: Rc::new(content),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

impl fmt::Debug for TabDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabDescriptor")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

/// Ordered tabs with unique, non-empty ids
#[derive(Debug, Clone, Default)]
pub struct TabSet {
    tabs: Vec<TabDescriptor>,
}

impl TabSet {
    pub fn new(tabs: Vec<TabDescriptor>) -> Result<Self, ModalError> {
        let mut seen = HashSet::new();
        for tab in &tabs {
            if tab.id.is_empty() {
                return Err(ModalError::EmptyTabId(tab.label.clone()));
            }
            if !seen.insert(tab.id.as_str()) {
                return Err(ModalError::DuplicateTabId(tab.id.clone()));
            }
        }
        Ok(Self { tabs })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TabDescriptor> {
        self.tabs.iter()
    }

    pub fn first(&self) -> Option<&TabDescriptor> {
        self.tabs.first()
    }

    pub fn get(&self, id: &str) -> Option<&TabDescriptor> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn get_index(&self, index: usize) -> Option<&TabDescriptor> {
        self.tabs.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }
}

/// What a modal shows and which actions it offers.
///
/// Rebuilt by the owner every frame; holds no state of its own.
pub struct ModalConfig<'a> {
    pub title: String,
    pub description: Option<String>,
    pub size: ModalSize,
    pub tabs: TabSet,
    /// Rendered when `tabs` is empty
    pub children: Option<ContentFactory>,
    pub show_save: bool,
    pub show_delete: bool,
    pub is_save_disabled: bool,
    pub is_delete_disabled: bool,
    pub on_save: Option<Handler<'a>>,
    pub on_delete: Option<Handler<'a>>,
    pub save_label: String,
    pub delete_label: String,
    pub cancel_label: String,
}

impl<'a> ModalConfig<'a> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            size: ModalSize::default(),
            tabs: TabSet::empty(),
            children: None,
            show_save: false,
            show_delete: false,
            is_save_disabled: false,
            is_delete_disabled: false,
            on_save: None,
            on_delete: None,
            save_label: "Save".to_string(),
            delete_label: "Delete".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn size(mut self, size: ModalSize) -> Self {
        self.size = size;
        self
    }

    pub fn tabs(mut self, tabs: TabSet) -> Self {
        self.tabs = tabs;
        self
    }

    pub fn children<F>(mut self, content: F) -> Self
    where
        F: Fn() -> Box<dyn ModalContent> + 'static,
    {
        self.children = Some(Rc::new(content));
        self
    }

    pub fn show_save(mut self, show: bool) -> Self {
        self.show_save = show;
        self
    }

    pub fn show_delete(mut self, show: bool) -> Self {
        self.show_delete = show;
        self
    }

    pub fn save_disabled(mut self, disabled: bool) -> Self {
        self.is_save_disabled = disabled;
        self
    }

    pub fn delete_disabled(mut self, disabled: bool) -> Self {
        self.is_delete_disabled = disabled;
        self
    }

    pub fn on_save(mut self, handler: impl FnMut() -> anyhow::Result<()> + 'a) -> Self {
        self.on_save = Some(Box::new(handler));
        self
    }

    pub fn on_delete(mut self, handler: impl FnMut() -> anyhow::Result<()> + 'a) -> Self {
        self.on_delete = Some(Box::new(handler));
        self
    }

    pub fn save_label(mut self, label: impl Into<String>) -> Self {
        self.save_label = label.into();
        self
    }

    pub fn delete_label(mut self, label: impl Into<String>) -> Self {
        self.delete_label = label.into();
        self
    }

    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }
}

impl fmt::Debug for ModalConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalConfig")
            .field("title", &self.title)
            .field("size", &self.size)
            .field("tabs", &self.tabs)
            .field("has_children", &self.children.is_some())
            .field("show_save", &self.show_save)
            .field("show_delete", &self.show_delete)
            .field("is_save_disabled", &self.is_save_disabled)
            .field("is_delete_disabled", &self.is_delete_disabled)
            .field("has_on_save", &self.on_save.is_some())
            .field("has_on_delete", &self.on_delete.is_some())
            .finish_non_exhaustive()
    }
}

/// Everything the parent passes to a modal: controlled open flag, its
/// setter, and the configuration
pub struct ModalProps<'a> {
    pub open: bool,
    pub on_open_change: OpenChangeHandler<'a>,
    pub config: ModalConfig<'a>,
}

impl<'a> ModalProps<'a> {
    pub fn new(
        open: bool,
        on_open_change: impl FnMut(bool) + 'a,
        config: ModalConfig<'a>,
    ) -> Self {
        Self {
            open,
            on_open_change: Box::new(on_open_change),
            config,
        }
    }

    /// Ask the parent to close the modal
    pub(super) fn request_close(&mut self) {
        (self.on_open_change)(false);
    }
}
