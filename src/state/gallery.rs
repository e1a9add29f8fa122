// Gallery tab state.
// Read-only projection of the store with selection, a detail view, and a
// confirm-before-delete flow.

use ratatui::widgets::ListState;

/// UI state for the gallery tab.
#[derive(Debug, Default)]
pub struct GalleryTabState {
    /// Selection over the store's list, newest first.
    pub list_state: ListState,
    /// Id of the entry whose detail view is open, if any.
    pub detail: Option<String>,
    /// Id of the entry awaiting delete confirmation, if any.
    pub confirm_delete: Option<String>,
}

impl GalleryTabState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= len - 1 => i,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_prev(&mut self, len: usize) {
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Open the detail view for an entry.
    pub fn open_detail(&mut self, id: String) {
        self.detail = Some(id);
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Start the delete flow; nothing is removed until confirmation.
    pub fn request_delete(&mut self, id: String) {
        self.confirm_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    /// Confirm the pending delete, handing back the id to remove.
    pub fn take_confirmed_delete(&mut self) -> Option<String> {
        self.confirm_delete.take()
    }

    /// An entry left the store; close any detail view open for it and keep
    /// the selection in range.
    pub fn notify_removed(&mut self, id: &str, remaining: usize) {
        if self.detail.as_deref() == Some(id) {
            self.detail = None;
        }
        match self.list_state.selected() {
            Some(_) if remaining == 0 => self.list_state.select(None),
            Some(i) if i >= remaining => self.list_state.select(Some(remaining - 1)),
            _ => {}
        }
    }
}
