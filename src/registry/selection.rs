//! Filter selection state.

use std::collections::BTreeSet;

use crate::models::FilterOptions;

/// User-selected retrieval filters. Empty sets mean no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    source_files: BTreeSet<String>,
    file_types: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_files(&self) -> &BTreeSet<String> {
        &self.source_files
    }

    pub fn file_types(&self) -> &BTreeSet<String> {
        &self.file_types
    }

    /// Toggle a source file. Returns whether it is now selected.
    pub fn toggle_source_file(&mut self, value: &str) -> bool {
        toggle(&mut self.source_files, value)
    }

    /// Toggle a file type. Returns whether it is now selected.
    pub fn toggle_file_type(&mut self, value: &str) -> bool {
        toggle(&mut self.file_types, value)
    }

    pub fn is_source_file_selected(&self, value: &str) -> bool {
        self.source_files.contains(value)
    }

    pub fn is_file_type_selected(&self, value: &str) -> bool {
        self.file_types.contains(value)
    }

    pub fn clear(&mut self) {
        self.source_files.clear();
        self.file_types.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.source_files.is_empty() && self.file_types.is_empty()
    }

    /// Drop selected values that the latest options no longer offer.
    pub fn retain_available(&mut self, options: &FilterOptions) {
        self.source_files
            .retain(|value| options.source_files.iter().any(|o| o == value));
        self.file_types
            .retain(|value| options.file_types.iter().any(|o| o == value));
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    if set.remove(value) {
        false
    } else {
        set.insert(value.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_selects_and_deselects() {
        let mut selection = FilterSelection::new();
        assert!(selection.toggle_source_file("a.pdf"));
        assert!(selection.is_source_file_selected("a.pdf"));
        assert!(!selection.toggle_source_file("a.pdf"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_trims_and_ignores_blank() {
        let mut selection = FilterSelection::new();
        assert!(selection.toggle_file_type(" pdf "));
        assert!(selection.is_file_type_selected("pdf"));
        assert!(!selection.toggle_file_type("  "));
        assert_eq!(selection.file_types().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut selection = FilterSelection::new();
        selection.toggle_source_file("a.pdf");
        selection.toggle_file_type("pdf");
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_retain_available() {
        let mut selection = FilterSelection::new();
        selection.toggle_source_file("a.pdf");
        selection.toggle_source_file("gone.pdf");
        selection.toggle_file_type("pdf");

        let options = FilterOptions {
            source_files: vec!["a.pdf".into(), "b.md".into()],
            file_types: vec!["md".into()],
        };
        selection.retain_available(&options);

        assert_eq!(
            selection.source_files().iter().collect::<Vec<_>>(),
            vec!["a.pdf"]
        );
        assert!(selection.file_types().is_empty());
    }
}
