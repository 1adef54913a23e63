//! Dietary requirements: the option catalog, free-text search over it, and
//! the selection set carried by the RSVP form.

mod picker;
mod search;

pub use picker::{DietaryPicker, PickerKey};
pub use search::{SYNONYMS, SIMILARITY_THRESHOLD, search, similarity};

use serde::{Deserialize, Serialize};

use crate::error::{InviteError, InviteResult};

/// Shown in the RSVP email when nothing was selected.
pub const NONE_SPECIFIED: &str = "None specified";

/// One selectable allergy or preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryOption {
    /// Stable identifier, e.g. `"gluten-free"`
    pub value: String,
    /// Human-readable label, e.g. `"🌾 Gluten-Free/Celiac"`
    pub label: String,
}

impl DietaryOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        DietaryOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

const DEFAULT_OPTIONS: &[(&str, &str)] = &[
    ("nut-allergy", "🥜 Nut Allergy (tree nuts)"),
    ("peanut-allergy", "🥜 Peanut Allergy"),
    ("seed-allergy", "🌻 Seed Allergy (sesame, sunflower, etc.)"),
    ("gluten-free", "🌾 Gluten-Free/Celiac"),
    ("dairy-free", "🥛 Dairy-Free/Lactose Intolerant"),
    ("egg-allergy", "🥚 Egg Allergy"),
    ("soy-allergy", "🫘 Soy Allergy"),
    ("food-dye-sensitivity", "🌈 Food Dye Sensitivity"),
    ("sugar-free", "🍯 Sugar-Free/Diabetic"),
    ("other", "📝 Other (please specify in message)"),
];

/// The fixed, ordered list of dietary options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietaryCatalog {
    options: Vec<DietaryOption>,
}

impl Default for DietaryCatalog {
    fn default() -> Self {
        DietaryCatalog {
            options: DEFAULT_OPTIONS
                .iter()
                .map(|(value, label)| DietaryOption::new(*value, *label))
                .collect(),
        }
    }
}

impl DietaryCatalog {
    /// Build a catalog, rejecting duplicate identifiers.
    pub fn new(options: Vec<DietaryOption>) -> InviteResult<Self> {
        for (i, option) in options.iter().enumerate() {
            if options[..i].iter().any(|o| o.value == option.value) {
                return Err(InviteError::Config(format!(
                    "duplicate dietary option '{}'",
                    option.value
                )));
            }
        }
        Ok(DietaryCatalog { options })
    }

    pub fn options(&self) -> &[DietaryOption] {
        &self.options
    }

    pub fn get(&self, value: &str) -> Option<&DietaryOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Label for an identifier, falling back to the identifier itself.
    pub fn label_for<'a>(&'a self, value: &'a str) -> &'a str {
        self.get(value).map(|o| o.label.as_str()).unwrap_or(value)
    }

    /// Options matching a free-text query, in catalog order.
    pub fn search(&self, query: &str) -> Vec<&DietaryOption> {
        search(query, &self.options)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// The identifiers picked on the form, in the order they were picked.
///
/// Every identifier references a catalog entry; the only ways in are
/// [`DietarySelection::toggle`], [`DietarySelection::insert`] and
/// [`DietarySelection::from_values`], all of which check the catalog.
///
/// Equality compares the selected set and ignores pick order.
#[derive(Debug, Clone, Default, Eq, Serialize)]
pub struct DietarySelection {
    values: Vec<String>,
}

impl PartialEq for DietarySelection {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.values.iter().all(|v| other.contains(v))
    }
}

impl DietarySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from raw identifiers, dropping repeats.
    pub fn from_values<I, S>(catalog: &DietaryCatalog, values: I) -> InviteResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for value in values {
            selection.insert(catalog, value.as_ref())?;
        }
        Ok(selection)
    }

    /// Add an identifier. Returns `false` if it was already selected.
    pub fn insert(&mut self, catalog: &DietaryCatalog, value: &str) -> InviteResult<bool> {
        if catalog.get(value).is_none() {
            return Err(InviteError::UnknownDietaryOption(value.to_string()));
        }
        if self.contains(value) {
            return Ok(false);
        }
        self.values.push(value.to_string());
        Ok(true)
    }

    /// Remove an identifier. Returns `false` if it wasn't selected.
    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.values.len();
        self.values.retain(|v| v != value);
        self.values.len() != before
    }

    /// Select an unselected identifier, or deselect a selected one.
    /// Returns whether the identifier is selected afterwards.
    pub fn toggle(&mut self, catalog: &DietaryCatalog, value: &str) -> InviteResult<bool> {
        if self.remove(value) {
            return Ok(false);
        }
        self.insert(catalog, value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Labels of the selected options, in selection order.
    pub fn labels<'a>(&'a self, catalog: &'a DietaryCatalog) -> Vec<&'a str> {
        self.values.iter().map(|v| catalog.label_for(v)).collect()
    }

    /// Human-readable summary for the RSVP email.
    pub fn summary(&self, catalog: &DietaryCatalog) -> String {
        if self.is_empty() {
            return NONE_SPECIFIED.to_string();
        }
        self.labels(catalog).join(", ")
    }
}
