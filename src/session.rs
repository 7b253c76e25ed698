//! The filtering engine for one data snapshot.
//!
//! A [`FilterSession`] owns the item collection, the [`FilterStore`] and the
//! two derived values built on top of them:
//!
//! - `filtered_items` recomputes when the items, the name filters or the
//!   district filters publish.
//! - `available_district_names` recomputes only when the name filters
//!   publish. Items and district filters are read as snapshots at that
//!   moment, so toggling a district never re-derives which districts are
//!   shown.
//! - `available_district_options` projects those names onto the live
//!   district filters, so every shown record carries its current flag.
//!
//! Filter options are derived once, when the session is built. The derived
//! values are wired afterwards, so they never observe unpopulated filters.

use crate::error::Result;
use crate::filter::{available_district_names, filter_items, select_options, FilterDimension};
use crate::observable::{Derived, State, Trigger};
use crate::provider::DataProvider;
use crate::store::FilterStore;
use crate::types::{Crop, FilterOption, FilterState};
use serde::Serialize;

/// Outcome of the initial data fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum LoadState {
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }
}

/// Counts describing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub total: usize,
    pub visible: usize,
    pub names_enabled: usize,
    pub districts_enabled: usize,
    pub districts_available: usize,
}

/// Everything a presentation layer renders, captured at one moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterView {
    pub load_state: LoadState,
    pub filtered_items: Vec<Crop>,
    pub name_filter_options: Vec<FilterOption>,
    pub available_district_options: Vec<FilterOption>,
}

pub struct FilterSession {
    items: State<Vec<Crop>>,
    store: FilterStore,
    load_state: LoadState,
    filtered_items: Derived<Vec<Crop>>,
    available_district_names: Derived<Vec<String>>,
    available_districts: Derived<Vec<FilterOption>>,
}

impl FilterSession {
    /// Fetch the items once and build the session
    ///
    /// A failing provider still yields a usable session: no items, no
    /// options, and a [`LoadState::Failed`] carrying the reason.
    pub async fn load<P: DataProvider>(provider: &P) -> Self {
        match provider.get_all_items().await {
            Ok(crops) => {
                tracing::info!(count = crops.len(), "items loaded");
                Self::build(crops, LoadState::Loaded)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load items");
                Self::build(Vec::new(), LoadState::Failed(e.to_string()))
            }
        }
    }

    /// Build a session from an in-memory snapshot
    pub fn from_items(crops: Vec<Crop>) -> Self {
        Self::build(crops, LoadState::Loaded)
    }

    fn build(crops: Vec<Crop>, load_state: LoadState) -> Self {
        let store = FilterStore::new(FilterState::from_items(&crops));
        let items = State::new(crops);

        let all_inputs: [&dyn Trigger; 3] = [&items, store.name_filters(), store.district_filters()];
        let filtered_items = Derived::new(&all_inputs, {
            let items = items.clone();
            let names = store.name_filters().clone();
            let districts = store.district_filters().clone();
            move || {
                items.with(|crops| {
                    names.with(|names| {
                        districts.with(|districts| filter_items(crops, names, districts))
                    })
                })
            }
        });

        let name_input: [&dyn Trigger; 1] = [store.name_filters()];
        let available_district_names = Derived::new(&name_input, {
            let items = items.clone();
            let names = store.name_filters().clone();
            let districts = store.district_filters().clone();
            move || {
                items.with(|crops| {
                    names.with(|names| {
                        districts.with(|districts| available_district_names(crops, names, districts))
                    })
                })
            }
        });

        let shown_inputs: [&dyn Trigger; 2] = [&available_district_names, store.district_filters()];
        let available_districts = Derived::new(&shown_inputs, {
            let shown = available_district_names.clone();
            let districts = store.district_filters().clone();
            move || shown.with(|names| districts.with(|districts| select_options(names, districts)))
        });

        Self {
            items,
            store,
            load_state,
            filtered_items,
            available_district_names,
            available_districts,
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn items(&self) -> &State<Vec<Crop>> {
        &self.items
    }

    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    pub fn filtered_items(&self) -> &Derived<Vec<Crop>> {
        &self.filtered_items
    }

    pub fn name_filter_options(&self) -> &State<Vec<FilterOption>> {
        self.store.name_filters()
    }

    /// All district options, including ones currently hidden by the cascade
    pub fn district_filter_options(&self) -> &State<Vec<FilterOption>> {
        self.store.district_filters()
    }

    /// Which districts the cascade currently shows
    ///
    /// Recomputed on name-filter publications only.
    pub fn available_district_names(&self) -> &Derived<Vec<String>> {
        &self.available_district_names
    }

    /// The shown districts with their live checked flags
    pub fn available_district_options(&self) -> &Derived<Vec<FilterOption>> {
        &self.available_districts
    }

    /// District options the cascade currently hides
    pub fn hidden_district_options(&self) -> Vec<FilterOption> {
        self.available_district_names.with(|shown| {
            self.store.district_filters().with(|districts| {
                districts
                    .iter()
                    .filter(|option| !shown.contains(&option.name))
                    .cloned()
                    .collect()
            })
        })
    }

    pub fn toggle_name_filter(&self, name: &str) -> Result<bool> {
        self.store.toggle_name_filter(name)
    }

    pub fn toggle_district_filter(&self, name: &str) -> Result<bool> {
        self.store.toggle_district_filter(name)
    }

    pub fn toggle(&self, dimension: FilterDimension, name: &str) -> Result<bool> {
        self.store.toggle(dimension, name)
    }

    /// Uncheck an option, leaving it alone if it is already unchecked
    pub fn disable(&self, dimension: FilterDimension, name: &str) -> Result<()> {
        if self.store.is_checked(dimension, name) == Some(false) {
            return Ok(());
        }
        self.store.toggle(dimension, name).map(|_| ())
    }

    pub fn set_all(&self, dimension: FilterDimension, checked: bool) {
        self.store.set_all(dimension, checked);
    }

    /// Publish a new item snapshot
    ///
    /// Filter options are not regenerated: crops with a name or district
    /// that has no option are excluded from `filtered_items`.
    pub fn replace_items(&self, crops: Vec<Crop>) {
        self.items.set(crops);
    }

    pub fn summary(&self) -> FilterSummary {
        let enabled = |options: &Vec<FilterOption>| options.iter().filter(|o| o.checked).count();
        FilterSummary {
            total: self.items.with(Vec::len),
            visible: self.filtered_items.with(Vec::len),
            names_enabled: self.store.name_filters().with(enabled),
            districts_enabled: self.store.district_filters().with(enabled),
            districts_available: self.available_district_names.with(Vec::len),
        }
    }

    pub fn view(&self) -> FilterView {
        FilterView {
            load_state: self.load_state.clone(),
            filtered_items: self.filtered_items.get(),
            name_filter_options: self.store.name_filters().get(),
            available_district_options: self.available_districts.get(),
        }
    }
}
