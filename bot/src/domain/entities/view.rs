//! View model: message identifiers, persisted view state, and page content
//!
//! A "page" is one unit of externally rendered content (title, description,
//! field list, interactive controls) that maps onto a single editable view
//! message on the chat platform.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a view message on the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a channel on the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The persisted, ordered list of view-message identifiers for a
/// tournament, partitioned into the fixed main slot, the roster-page run
/// and the group-page run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub main: Option<MessageId>,
    #[serde(default)]
    pub roster_pages: Vec<MessageId>,
    #[serde(default)]
    pub group_pages: Vec<MessageId>,
}

impl ViewState {
    /// All identifiers in display order: main, roster pages, group pages.
    pub fn all_ids(&self) -> Vec<MessageId> {
        self.main
            .iter()
            .cloned()
            .chain(self.roster_pages.iter().cloned())
            .chain(self.group_pages.iter().cloned())
            .collect()
    }
}

/// Maximum rendered size of one page
pub const PAGE_BUDGET: usize = 6000;

/// Maximum accumulated text in one page field
pub const FIELD_BUDGET: usize = 1024;

/// Maximum cluster blocks on one group-listing page
pub const GROUP_BLOCKS_PER_PAGE: usize = 10;

/// One titled text block inside a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl PageField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}

/// Visual style of a button control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Danger,
}

/// One option of a select control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub description: String,
    pub value: String,
}

/// Interactive control attached to a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Button {
        custom_id: String,
        label: String,
        style: ButtonStyle,
    },
    /// Navigation link to another view message
    NavLink { label: String, target: MessageId },
    Select {
        custom_id: String,
        placeholder: String,
        options: Vec<SelectOption>,
        min_values: u8,
        max_values: u8,
        disabled: bool,
    },
}

/// One unit of renderable view content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub description: String,
    pub fields: Vec<PageField>,
    pub controls: Vec<Control>,
}

impl Page {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
            controls: Vec::new(),
        }
    }

    /// Rendered text size, measured against [`PAGE_BUDGET`]. Controls do
    /// not count towards the budget.
    pub fn len(&self) -> usize {
        self.title.len()
            + self.description.len()
            + self
                .fields
                .iter()
                .map(|f| f.name.len() + f.value.len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
