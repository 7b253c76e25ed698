use crate::types::{Crop, FilterOption, FilterState};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The two independent filter dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDimension {
    Name,
    District,
}

impl FilterDimension {
    /// The field of a crop this dimension filters on
    pub fn key_of<'a>(&self, crop: &'a Crop) -> &'a str {
        match self {
            FilterDimension::Name => &crop.name,
            FilterDimension::District => &crop.district,
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterDimension::Name => f.write_str("name"),
            FilterDimension::District => f.write_str("district"),
        }
    }
}

impl From<&str> for FilterDimension {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "district" => FilterDimension::District,
            _ => FilterDimension::Name,
        }
    }
}

/// Filter result indicating whether a crop should be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Keep,
    FilterOut,
}

impl FilterResult {
    pub fn is_keep(self) -> bool {
        self == FilterResult::Keep
    }
}

/// One distinct, enabled option per value of `dimension`, in first-seen order
pub fn derive_filter_options(crops: &[Crop], dimension: FilterDimension) -> Vec<FilterOption> {
    let mut seen = HashSet::new();
    crops
        .iter()
        .map(|crop| dimension.key_of(crop))
        .filter(|key| seen.insert(*key))
        .map(FilterOption::enabled)
        .collect()
}

impl FilterState {
    /// Initial filter sets for a data snapshot: every distinct value enabled
    pub fn from_items(crops: &[Crop]) -> Self {
        Self {
            name_filters: derive_filter_options(crops, FilterDimension::Name),
            district_filters: derive_filter_options(crops, FilterDimension::District),
        }
    }
}

/// Indexed view over one dimension's options
pub struct OptionLookup<'a> {
    dimension: FilterDimension,
    checked: HashMap<&'a str, bool>,
}

impl<'a> OptionLookup<'a> {
    pub fn new(dimension: FilterDimension, options: &'a [FilterOption]) -> Self {
        Self {
            dimension,
            checked: options
                .iter()
                .map(|option| (option.name.as_str(), option.checked))
                .collect(),
        }
    }

    /// Keep when the crop's option exists and is checked
    ///
    /// A crop whose value has no option at all is filtered out and logged;
    /// the rest of the derivation carries on.
    pub fn should_keep(&self, crop: &Crop) -> FilterResult {
        let key = self.dimension.key_of(crop);
        match self.checked.get(key) {
            Some(true) => FilterResult::Keep,
            Some(false) => FilterResult::FilterOut,
            None => {
                tracing::warn!(
                    dimension = %self.dimension,
                    value = key,
                    crop = %crop.name,
                    "no filter option for crop, excluding it"
                );
                FilterResult::FilterOut
            }
        }
    }
}

/// Crops whose name option and district option are both checked
pub fn filter_items(
    crops: &[Crop],
    name_filters: &[FilterOption],
    district_filters: &[FilterOption],
) -> Vec<Crop> {
    let names = OptionLookup::new(FilterDimension::Name, name_filters);
    let districts = OptionLookup::new(FilterDimension::District, district_filters);

    let visible: Vec<Crop> = crops
        .iter()
        .filter(|crop| names.should_keep(crop).is_keep() && districts.should_keep(crop).is_keep())
        .cloned()
        .collect();

    tracing::debug!(total = crops.len(), visible = visible.len(), "filtered items recomputed");
    visible
}

/// Names of the district options still reachable through the enabled name options
///
/// Names come back in store order. Only membership is decided here; the
/// checked flags live in the district filters themselves.
pub fn available_district_names(
    crops: &[Crop],
    name_filters: &[FilterOption],
    district_filters: &[FilterOption],
) -> Vec<String> {
    let enabled_names: HashSet<&str> = name_filters
        .iter()
        .filter(|option| option.checked)
        .map(|option| option.name.as_str())
        .collect();

    let enabled_districts: HashSet<&str> = crops
        .iter()
        .filter(|crop| enabled_names.contains(crop.name.as_str()))
        .map(|crop| crop.district.as_str())
        .collect();

    let available: Vec<String> = district_filters
        .iter()
        .filter(|option| enabled_districts.contains(option.name.as_str()))
        .map(|option| option.name.clone())
        .collect();

    tracing::debug!(
        enabled_names = enabled_names.len(),
        available = available.len(),
        "available districts recomputed"
    );
    available
}

/// The current records of `options` named in `names`, in `names` order
pub fn select_options(names: &[String], options: &[FilterOption]) -> Vec<FilterOption> {
    let by_name: HashMap<&str, &FilterOption> = options
        .iter()
        .map(|option| (option.name.as_str(), option))
        .collect();
    names
        .iter()
        .filter_map(|name| by_name.get(name.as_str()).map(|option| (*option).clone()))
        .collect()
}

/// District options still reachable through the enabled name options
///
/// Returns the matching entries of `district_filters` with their current
/// checked flags, in store order.
pub fn available_district_options(
    crops: &[Crop],
    name_filters: &[FilterOption],
    district_filters: &[FilterOption],
) -> Vec<FilterOption> {
    let names = available_district_names(crops, name_filters, district_filters);
    select_options(&names, district_filters)
}
