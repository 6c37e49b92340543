use std::collections::HashMap;

/// Hovered case id shared by the chart and the cases list.
///
/// Views write with [`HighlightStore::hover`] while drawing and read
/// [`HighlightStore::current`], which only changes at
/// [`HighlightStore::begin_frame`]. Both views therefore see the same id in a
/// frame no matter which one draws first. Each view maps the id through its own
/// id to handle table.
#[derive(Debug, Default)]
pub(in crate::app) struct HighlightStore {
    current: Option<String>,
    pending: Option<String>,
}

impl HighlightStore {
    /// Publishes the hover written during the previous frame. Returns whether
    /// the highlighted id changed.
    pub(in crate::app) fn begin_frame(&mut self) -> bool {
        let next = self.pending.take();
        let changed = next != self.current;
        self.current = next;
        changed
    }

    pub(in crate::app) fn hover(&mut self, id: &str) {
        self.pending = Some(id.to_owned());
    }

    pub(in crate::app) fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub(in crate::app) fn resolve(&self, handles: &HashMap<String, usize>) -> Option<usize> {
        self.current().and_then(|id| handles.get(id).copied())
    }

    pub(in crate::app) fn clear(&mut self) {
        self.current = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_is_published_on_the_next_frame() {
        let mut store = HighlightStore::default();
        store.hover("7");
        assert_eq!(store.current(), None);

        assert!(store.begin_frame());
        assert_eq!(store.current(), Some("7"));

        store.hover("7");
        assert!(!store.begin_frame());
        assert_eq!(store.current(), Some("7"));
    }

    #[test]
    fn frame_without_hover_clears_highlight() {
        let mut store = HighlightStore::default();
        store.hover("7");
        store.begin_frame();

        assert!(store.begin_frame());
        assert_eq!(store.current(), None);
    }

    #[test]
    fn each_view_resolves_through_its_own_table() {
        let mut store = HighlightStore::default();
        store.hover("b");
        store.begin_frame();

        let bubbles = HashMap::from([("a".to_owned(), 0), ("b".to_owned(), 4)]);
        let rows = HashMap::from([("b".to_owned(), 1)]);
        let empty = HashMap::new();
        assert_eq!(store.resolve(&bubbles), Some(4));
        assert_eq!(store.resolve(&rows), Some(1));
        assert_eq!(store.resolve(&empty), None);

        store.clear();
        assert_eq!(store.resolve(&bubbles), None);
    }
}
