use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::model::{FilenameFields, ImageCollection, Probe, TIF_EXTENSION};

// ---------------------------------------------------------------------------
// Probe predicate: which directory entries belong to a probe
// ---------------------------------------------------------------------------

/// A filename belongs to `probe` when it carries the probe's prefix and the
/// exact, case-sensitive `.tif` suffix.
pub fn matches_probe(file_name: &str, probe: Probe) -> bool {
    file_name.starts_with(probe.prefix()) && file_name.ends_with(TIF_EXTENSION)
}

// ---------------------------------------------------------------------------
// Metadata filter: which timepoint / metabolite codes are selected
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Timepoint,
    Metabolite,
}

impl FilterField {
    pub const ALL: [FilterField; 2] = [FilterField::Timepoint, FilterField::Metabolite];

    /// Raw code of this field in a filename, if the name follows the schema.
    pub fn code_of(self, file_name: &str) -> Option<String> {
        let stem = file_name.replace(TIF_EXTENSION, "");
        let fields = FilenameFields::parse(&stem)?;
        let code = match self {
            FilterField::Timepoint => fields.time_code,
            FilterField::Metabolite => fields.metabolite_code,
        };
        Some(code.to_string())
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterField::Timepoint => write!(f, "Timepoint"),
            FilterField::Metabolite => write!(f, "Metabolite"),
        }
    }
}

/// Per-field selection state: maps field → set of selected codes.
/// If a field is absent, it means "no filter" (show all).
pub type FilterState = BTreeMap<FilterField, BTreeSet<String>>;

/// Sorted set of codes present in the collection, per field.
pub fn unique_codes(images: &ImageCollection) -> BTreeMap<FilterField, BTreeSet<String>> {
    let mut out: BTreeMap<FilterField, BTreeSet<String>> = BTreeMap::new();
    for name in images.names() {
        for field in FilterField::ALL {
            if let Some(code) = field.code_of(name) {
                out.entry(field).or_default().insert(code);
            }
        }
    }
    out
}

/// Initialise a [`FilterState`] with all codes selected (i.e., show everything).
pub fn init_filter_state(images: &ImageCollection) -> FilterState {
    unique_codes(images)
}

/// Build a filter from explicit code lists; an empty list leaves the field
/// unconstrained.
pub fn filter_from_codes(timepoints: &[String], metabolites: &[String]) -> FilterState {
    let mut state = FilterState::new();
    if !timepoints.is_empty() {
        state.insert(FilterField::Timepoint, timepoints.iter().cloned().collect());
    }
    if !metabolites.is_empty() {
        state.insert(FilterField::Metabolite, metabolites.iter().cloned().collect());
    }
    state
}

/// Return names of images that pass all active filters, in collection order.
///
/// An image passes a field filter when:
/// * The field is not present in `filters` → passes (no constraint)
/// * The selected set is empty → nothing selected → fails
/// * Every known code is selected → passes (no effective constraint)
/// * The image's code for that field is in the selected set → passes
///
/// Names that do not follow the filename schema have no code and only pass
/// fields without an effective constraint.
pub fn filtered_names<'a>(images: &'a ImageCollection, filters: &FilterState) -> Vec<&'a str> {
    let all_codes = unique_codes(images);
    images
        .names()
        .filter(|name| {
            for (field, selected) in filters {
                if selected.is_empty() {
                    return false;
                }
                if let Some(all) = all_codes.get(field) {
                    if all.is_subset(selected) {
                        continue;
                    }
                }
                match field.code_of(name) {
                    Some(code) if selected.contains(&code) => {}
                    _ => return false,
                }
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PixelArray;
    use ndarray::IxDyn;

    fn collection(names: &[&str]) -> ImageCollection {
        let mut c = ImageCollection::new();
        for n in names {
            c.insert(n.to_string(), PixelArray::zeros(IxDyn(&[1, 1])));
        }
        c
    }

    #[test]
    fn probe_predicate_checks_prefix_and_exact_suffix() {
        assert!(matches_probe("712_a_t1_m1.tif", Probe::P1));
        assert!(!matches_probe("712_a_t1_m1.tif", Probe::P2));
        assert!(matches_probe("711_a_t1_m1.tif", Probe::P2));
        assert!(!matches_probe("712_a_t1_m1.TIF", Probe::P1));
        assert!(!matches_probe("712_a_t1_m1.tiff", Probe::P1));
        assert!(!matches_probe("x712_a_t1_m1.tif", Probe::P1));
    }

    #[test]
    fn unique_codes_skip_malformed_names() {
        let c = collection(&["712_a_t1_m1.tif", "712_a_t3_m4.tif", "712odd.tif"]);
        let codes = unique_codes(&c);
        let times: Vec<_> = codes[&FilterField::Timepoint].iter().cloned().collect();
        assert_eq!(times, vec!["t1", "t3"]);
    }

    #[test]
    fn initial_state_shows_everything() {
        let c = collection(&["712_a_t1_m1.tif", "712_a_t2_m3.tif", "712odd.tif"]);
        let state = init_filter_state(&c);
        assert_eq!(filtered_names(&c, &state).len(), 3);
    }

    #[test]
    fn selection_restricts_by_code() {
        let c = collection(&[
            "712_a_t1_m1.tif",
            "712_a_t2_m1.tif",
            "712_a_t2_m3.tif",
            "712odd.tif",
        ]);
        let state = filter_from_codes(&["t2".to_string()], &[]);
        assert_eq!(
            filtered_names(&c, &state),
            vec!["712_a_t2_m1.tif", "712_a_t2_m3.tif"]
        );

        let state = filter_from_codes(&["t2".to_string()], &["m3".to_string()]);
        assert_eq!(filtered_names(&c, &state), vec!["712_a_t2_m3.tif"]);
    }

    #[test]
    fn empty_selection_hides_all() {
        let c = collection(&["712_a_t1_m1.tif"]);
        let mut state = init_filter_state(&c);
        state.insert(FilterField::Metabolite, BTreeSet::new());
        assert!(filtered_names(&c, &state).is_empty());
    }
}
