//! Free-text search over dietary options.
//!
//! The catalog is scanned linearly. Per option, the first rule that applies
//! decides:
//!
//! 1. direct substring of the label or identifier
//! 2. synonym table (first key related to the query decides)
//! 3. positional token similarity above [`SIMILARITY_THRESHOLD`]

use super::DietaryOption;

/// Minimum token similarity for the typo fallback (exclusive).
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Tokens shorter than this never match by similarity.
const MIN_TOKEN_LEN: usize = 3;

/// Lay terms and the label/identifier fragments they stand for.
///
/// Order matters: the first key related to the query is the only one consulted.
pub const SYNONYMS: &[(&str, &[&str])] = &[
    ("gluten", &["gluten-free", "celiac", "wheat"]),
    ("dairy", &["dairy-free", "lactose", "milk"]),
    ("nuts", &["nut-allergy", "peanut-allergy", "tree nuts"]),
    ("peanuts", &["peanut-allergy", "nuts"]),
    ("egg", &["egg-allergy", "eggs"]),
    ("soy", &["soy-allergy", "soya"]),
    ("sugar", &["sugar-free", "diabetic", "diabetes"]),
    ("dye", &["food-dye-sensitivity", "coloring", "artificial"]),
    ("seeds", &["seed-allergy", "sesame", "sunflower"]),
    ("celiac", &["gluten-free", "gluten"]),
    ("lactose", &["dairy-free", "dairy", "milk"]),
    ("diabetic", &["sugar-free", "diabetes", "sugar"]),
];

/// Options matching `query`, in their original order.
///
/// A blank query matches everything.
pub fn search<'a>(query: &str, options: &'a [DietaryOption]) -> Vec<&'a DietaryOption> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return options.iter().collect();
    }

    options.iter().filter(|option| matches(&term, option)).collect()
}

fn matches(term: &str, option: &DietaryOption) -> bool {
    let label = option.label.to_lowercase();
    let value = option.value.to_lowercase();

    if label.contains(term) || value.contains(term) {
        return true;
    }

    if let Some((_, targets)) = SYNONYMS
        .iter()
        .find(|(key, _)| term.contains(key) || key.contains(term))
    {
        return targets
            .iter()
            .any(|target| label.contains(target) || value.contains(target));
    }

    label
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_TOKEN_LEN)
        .any(|word| similarity(term, word) > SIMILARITY_THRESHOLD)
}

/// Share of positions at which the shorter string agrees with the longer one,
/// relative to the longer one's length.
///
/// Not an edit distance: `"abc"` vs `"xabc"` scores 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let (longer, shorter, longer_len) = if a_len > b_len {
        (a, b, a_len)
    } else {
        (b, a, b_len)
    };

    if longer_len == 0 {
        return 1.0;
    }

    let matching = shorter
        .chars()
        .zip(longer.chars())
        .filter(|(s, l)| s == l)
        .count();

    matching as f64 / longer_len as f64
}
