use serde::{Deserialize, Serialize};

/// A crop record as delivered by a data provider
///
/// Several records may share a `name` (one per district), so a crop is not
/// identified by its name alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub name: String,
    pub district: String,
    /// Legacy selection flag carried by the data; filtering never reads it
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub sub_category: Vec<SubCategory>,
}

impl Crop {
    /// Create a crop with no sub-categories
    pub fn new(name: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            district: district.into(),
            checked: false,
            sub_category: Vec::new(),
        }
    }

    /// Attach a sub-category
    pub fn with_sub_category(mut self, id: i64, name: impl Into<String>) -> Self {
        self.sub_category.push(SubCategory {
            id,
            name: name.into(),
            checked: true,
        });
        self
    }
}

/// Variety of a crop (drill-down data, not used for filtering)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub checked: bool,
}

/// One checkbox in a filter dimension
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterOption {
    pub name: String,
    pub checked: bool,
}

impl FilterOption {
    pub fn new(name: impl Into<String>, checked: bool) -> Self {
        Self {
            name: name.into(),
            checked,
        }
    }

    /// An enabled option
    pub fn enabled(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }
}

/// Both filter dimensions at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub name_filters: Vec<FilterOption>,
    pub district_filters: Vec<FilterOption>,
}
