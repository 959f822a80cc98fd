//! Mobile navigation toggle

use serde::Serialize;

const OPEN_LABEL: &str = "Open navigation menu";
const CLOSE_LABEL: &str = "Close navigation menu";

/// Open/closed state of the collapsible site menu
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the menu; returns whether it is now open
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Following a menu link closes the menu
    pub fn follow_link(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn aria_expanded(&self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }

    pub fn aria_label(&self) -> &'static str {
        if self.open {
            CLOSE_LABEL
        } else {
            OPEN_LABEL
        }
    }

    /// Attributes for the menu button, as used by the header template
    pub fn button_state(&self) -> NavButtonState {
        NavButtonState {
            expanded: self.aria_expanded(),
            label: self.aria_label(),
            open_class: if self.open { " open" } else { "" },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavButtonState {
    pub expanded: &'static str,
    pub label: &'static str,
    pub open_class: &'static str,
}
