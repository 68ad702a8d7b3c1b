use tracing::debug;

/// Which card, if any, is expanded. At most one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExpansionState {
    #[default]
    Collapsed,
    Expanded(String),
}

impl ExpansionState {
    /// Toggle `id`. Clicking a different card switches to it directly.
    pub fn click_item(&mut self, id: &str) {
        let next = match self {
            ExpansionState::Expanded(current) if current == id => ExpansionState::Collapsed,
            _ => ExpansionState::Expanded(id.to_string()),
        };
        debug!(from = ?self, to = ?next, "Expansion transition");
        *self = next;
    }

    /// Click on empty container space. Returns true if anything collapsed.
    pub fn click_background(&mut self) -> bool {
        if matches!(self, ExpansionState::Collapsed) {
            return false;
        }
        debug!(from = ?self, "Collapsing on background click");
        *self = ExpansionState::Collapsed;
        true
    }

    pub fn expanded_id(&self) -> Option<&str> {
        match self {
            ExpansionState::Collapsed => None,
            ExpansionState::Expanded(id) => Some(id),
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded_id() == Some(id)
    }

    /// Drop the expansion if its card is gone.
    pub fn retain<'a>(&mut self, mut ids: impl Iterator<Item = &'a str>) {
        if let ExpansionState::Expanded(current) = self {
            if !ids.any(|id| id == current) {
                *self = ExpansionState::Collapsed;
            }
        }
    }
}
