//! Fragment store — collected story fragments and inventory visibility.
//!
//! Owned by whoever drives playback and passed by reference to the views that
//! read it. There is no global instance.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentStore {
    fragments: Vec<String>,
    current_scene: String,
    show_inventory: bool,
}

impl FragmentStore {
    pub fn new(scene: impl Into<String>) -> Self {
        FragmentStore {
            fragments: Vec::new(),
            current_scene: scene.into(),
            show_inventory: false,
        }
    }

    /// Record a fragment. Returns `false` if it was already collected.
    pub fn add_fragment(&mut self, id: &str) -> bool {
        if self.fragments.iter().any(|f| f == id) {
            return false;
        }
        self.fragments.push(id.to_string());
        log::debug!("fragment collected: {id}");
        true
    }

    pub fn go_to_scene(&mut self, scene: impl Into<String>) {
        self.current_scene = scene.into();
    }

    pub fn toggle_inventory(&mut self) {
        self.show_inventory = !self.show_inventory;
    }

    /// Fragments in the order they were collected.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn current_scene(&self) -> &str {
        &self.current_scene
    }

    pub fn show_inventory(&self) -> bool {
        self.show_inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_are_deduplicated_in_order() {
        let mut store = FragmentStore::new("chapter1");
        assert!(store.add_fragment("static"));
        assert!(store.add_fragment("signal"));
        assert!(!store.add_fragment("static"));
        assert_eq!(store.fragments(), ["static", "signal"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn instances_are_isolated() {
        let mut a = FragmentStore::new("chapter1");
        let b = FragmentStore::new("chapter1");
        a.add_fragment("static");
        a.go_to_scene("chapter2");
        assert!(b.is_empty());
        assert_eq!(b.current_scene(), "chapter1");
        assert_eq!(a.current_scene(), "chapter2");
    }

    #[test]
    fn inventory_toggles() {
        let mut store = FragmentStore::new("s");
        assert!(!store.show_inventory());
        store.toggle_inventory();
        assert!(store.show_inventory());
        store.toggle_inventory();
        assert!(!store.show_inventory());
    }
}
