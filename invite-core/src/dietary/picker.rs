//! Interactive state of the dietary autocomplete: query text, dropdown
//! visibility, keyboard highlight and the current selection.
//!
//! The matcher itself stays pure; this type only remembers what the user has
//! typed and picked so far.

use super::{DietaryCatalog, DietaryOption, DietarySelection};
use crate::error::InviteResult;

/// Keys the picker reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

#[derive(Debug, Clone)]
pub struct DietaryPicker<'a> {
    catalog: &'a DietaryCatalog,
    query: String,
    open: bool,
    highlighted: usize,
    selection: DietarySelection,
}

impl<'a> DietaryPicker<'a> {
    pub fn new(catalog: &'a DietaryCatalog) -> Self {
        Self::with_selection(catalog, DietarySelection::new())
    }

    pub fn with_selection(catalog: &'a DietaryCatalog, selection: DietarySelection) -> Self {
        DietaryPicker {
            catalog,
            query: String::new(),
            open: false,
            highlighted: 0,
            selection,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn selection(&self) -> &DietarySelection {
        &self.selection
    }

    pub fn into_selection(self) -> DietarySelection {
        self.selection
    }

    /// Options visible in the dropdown for the current query.
    pub fn filtered(&self) -> Vec<&'a DietaryOption> {
        self.catalog.search(&self.query)
    }

    pub fn focus(&mut self) {
        self.open = true;
    }

    /// Replace the query text. Opens the dropdown and moves the highlight
    /// back to the first result.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.open = true;
        self.highlighted = 0;
    }

    /// Close the dropdown and forget the query (click outside, Escape).
    pub fn dismiss(&mut self) {
        self.open = false;
        self.query.clear();
    }

    pub fn toggle(&mut self, value: &str) -> InviteResult<bool> {
        self.selection.toggle(self.catalog, value)
    }

    /// Remove a selected pill. Unknown values are ignored.
    pub fn remove(&mut self, value: &str) -> bool {
        self.selection.remove(value)
    }

    /// Labels for the selected pills.
    pub fn selected_labels(&self) -> Vec<&str> {
        self.selection.labels(self.catalog)
    }

    /// Handle a key press. Returns the identifier toggled by Enter, if any.
    pub fn key(&mut self, key: PickerKey) -> InviteResult<Option<String>> {
        if !self.open {
            if matches!(key, PickerKey::ArrowDown | PickerKey::Enter) {
                self.open = true;
            }
            return Ok(None);
        }

        let count = self.filtered().len();

        match key {
            PickerKey::ArrowDown => {
                self.highlighted = if self.highlighted + 1 < count {
                    self.highlighted + 1
                } else {
                    0
                };
            }
            PickerKey::ArrowUp => {
                self.highlighted = if self.highlighted > 0 {
                    self.highlighted - 1
                } else {
                    count.saturating_sub(1)
                };
            }
            PickerKey::Enter => {
                if let Some(option) = self.filtered().get(self.highlighted) {
                    let value = option.value.clone();
                    self.toggle(&value)?;
                    return Ok(Some(value));
                }
            }
            PickerKey::Escape => self.dismiss(),
        }

        Ok(None)
    }

    /// Clear everything (form reset, dialog close).
    pub fn reset(&mut self) {
        self.dismiss();
        self.highlighted = 0;
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_typing_opens_and_resets_highlight() {
        let catalog = DietaryCatalog::default();
        let mut picker = DietaryPicker::new(&catalog);
        assert!(!picker.is_open());

        picker.key(PickerKey::ArrowDown).unwrap();
        assert!(picker.is_open());
        picker.key(PickerKey::ArrowDown).unwrap();
        assert_eq!(picker.highlighted(), 1);

        picker.set_query("allergy");
        assert!(picker.is_open());
        assert_eq!(picker.highlighted(), 0);
        assert_eq!(picker.filtered().len(), 5);
    }

    #[test]
    fn test_arrows_wrap_around() {
        let catalog = DietaryCatalog::default();
        let mut picker = DietaryPicker::new(&catalog);
        picker.set_query("nuts");
        assert_eq!(picker.filtered().len(), 2);

        picker.key(PickerKey::ArrowUp).unwrap();
        assert_eq!(picker.highlighted(), 1);
        picker.key(PickerKey::ArrowDown).unwrap();
        assert_eq!(picker.highlighted(), 0);
    }

    #[test]
    fn test_enter_toggles_highlighted_option() {
        let catalog = DietaryCatalog::default();
        let mut picker = DietaryPicker::new(&catalog);
        picker.set_query("gluten");

        let toggled = picker.key(PickerKey::Enter).unwrap();
        assert_eq!(toggled.as_deref(), Some("gluten-free"));
        assert!(picker.selection().contains("gluten-free"));
        assert_eq!(picker.selected_labels(), vec!["🌾 Gluten-Free/Celiac"]);

        picker.key(PickerKey::Enter).unwrap();
        assert!(picker.selection().is_empty());
    }

    #[test]
    fn test_enter_with_no_results_does_nothing() {
        let catalog = DietaryCatalog::default();
        let mut picker = DietaryPicker::new(&catalog);
        picker.set_query("xyz");
        assert_eq!(picker.key(PickerKey::Enter).unwrap(), None);
        assert!(picker.selection().is_empty());
    }

    #[test]
    fn test_escape_dismisses_and_clears_query() {
        let catalog = DietaryCatalog::default();
        let mut picker = DietaryPicker::new(&catalog);
        picker.set_query("egg");
        picker.key(PickerKey::Escape).unwrap();
        assert!(!picker.is_open());
        assert_eq!(picker.query(), "");
    }

    #[test]
    fn test_reset_clears_selection() {
        let catalog = DietaryCatalog::default();
        let mut picker = DietaryPicker::new(&catalog);
        picker.toggle("soy-allergy").unwrap();
        picker.toggle("other").unwrap();
        assert!(picker.remove("other"));
        assert_eq!(picker.selection().values(), ["soy-allergy"]);

        picker.reset();
        assert!(picker.selection().is_empty());
    }
}
