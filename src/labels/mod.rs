//! Labels and automatic category inference

pub mod inference;
pub mod label;

use std::collections::BTreeSet;

pub use inference::{conflicts_for, inferable_diet_forms, infer_automatic_labels, merge_labels};
pub use label::{Label, LabelFamily};

/// Parse a list of label strings, collecting the ones that are not labels
pub fn parse_labels<S: AsRef<str>>(values: &[S]) -> Result<BTreeSet<Label>, Vec<String>> {
    let mut labels = BTreeSet::new();
    let mut unknown = Vec::new();
    for value in values {
        match Label::parse(value.as_ref()) {
            Some(label) => {
                labels.insert(label);
            }
            None => unknown.push(value.as_ref().to_string()),
        }
    }
    if unknown.is_empty() {
        Ok(labels)
    } else {
        Err(unknown)
    }
}
