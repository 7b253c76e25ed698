use crate::error::{Error, Result};
use crate::filter::FilterDimension;
use crate::observable::State;
use crate::types::{FilterOption, FilterState};

/// Mutable checkbox state for both filter dimensions
///
/// Each toggle publishes a fresh snapshot of the affected collection so
/// everything derived from it recomputes.
#[derive(Debug, Clone)]
pub struct FilterStore {
    name_filters: State<Vec<FilterOption>>,
    district_filters: State<Vec<FilterOption>>,
}

impl FilterStore {
    pub fn new(initial: FilterState) -> Self {
        Self {
            name_filters: State::new(initial.name_filters),
            district_filters: State::new(initial.district_filters),
        }
    }

    pub fn name_filters(&self) -> &State<Vec<FilterOption>> {
        &self.name_filters
    }

    pub fn district_filters(&self) -> &State<Vec<FilterOption>> {
        &self.district_filters
    }

    pub fn filters(&self, dimension: FilterDimension) -> &State<Vec<FilterOption>> {
        match dimension {
            FilterDimension::Name => &self.name_filters,
            FilterDimension::District => &self.district_filters,
        }
    }

    /// Snapshot of both dimensions
    pub fn snapshot(&self) -> FilterState {
        FilterState {
            name_filters: self.name_filters.get(),
            district_filters: self.district_filters.get(),
        }
    }

    pub fn toggle_name_filter(&self, name: &str) -> Result<bool> {
        self.toggle(FilterDimension::Name, name)
    }

    pub fn toggle_district_filter(&self, name: &str) -> Result<bool> {
        self.toggle(FilterDimension::District, name)
    }

    /// Invert one option and publish; returns its new checked flag
    ///
    /// An unknown option is a caller error: nothing is changed or published.
    pub fn toggle(&self, dimension: FilterDimension, name: &str) -> Result<bool> {
        let toggled: Result<bool> = self.filters(dimension).try_update(|options| {
            let option = options
                .iter_mut()
                .find(|option| option.name == name)
                .ok_or_else(|| Error::UnknownFilterOption {
                    dimension,
                    name: name.to_string(),
                })?;
            option.checked = !option.checked;
            Ok(option.checked)
        });

        match &toggled {
            Ok(checked) => tracing::debug!(%dimension, option = name, checked, "filter toggled"),
            Err(e) => tracing::error!(%dimension, option = name, "{}", e),
        }
        toggled
    }

    /// Set every option of a dimension at once, publishing a single snapshot
    pub fn set_all(&self, dimension: FilterDimension, checked: bool) {
        self.filters(dimension).update(|options| {
            for option in options.iter_mut() {
                option.checked = checked;
            }
        });
    }

    /// Whether the named option exists and is checked
    pub fn is_checked(&self, dimension: FilterDimension, name: &str) -> Option<bool> {
        self.filters(dimension).with(|options| {
            options
                .iter()
                .find(|option| option.name == name)
                .map(|option| option.checked)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_crops;

    fn store() -> FilterStore {
        FilterStore::new(FilterState::from_items(&sample_crops()))
    }

    #[test]
    fn toggle_inverts_and_publishes() {
        let store = store();
        assert_eq!(store.toggle_name_filter("Rice").unwrap(), false);
        assert_eq!(store.is_checked(FilterDimension::Name, "Rice"), Some(false));
        assert_eq!(store.name_filters().version(), 1);

        assert_eq!(store.toggle_name_filter("Rice").unwrap(), true);
        assert_eq!(store.name_filters().version(), 2);
        assert_eq!(store.district_filters().version(), 0);
    }

    #[test]
    fn unknown_option_fails_without_publishing() {
        let store = store();
        let err = store.toggle_district_filter("Pune").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownFilterOption { dimension: FilterDimension::District, ref name } if name == "Pune"
        ));
        assert_eq!(store.district_filters().version(), 0);
        assert_eq!(store.snapshot(), FilterState::from_items(&sample_crops()));
    }

    #[test]
    fn name_lookup_is_per_dimension() {
        let store = store();
        assert!(store.toggle_district_filter("Rice").is_err());
        assert!(store.toggle_name_filter("Thane").is_err());
    }

    #[test]
    fn set_all_publishes_once() {
        let store = store();
        store.set_all(FilterDimension::District, false);
        assert_eq!(store.district_filters().version(), 1);
        assert!(store.district_filters().get().iter().all(|o| !o.checked));
    }
}
