//! Built-in sample data set.

use crate::types::Crop;

/// The four sample crop records
pub fn sample_crops() -> Vec<Crop> {
    vec![
        Crop::new("Rice", "Thane")
            .with_sub_category(1, "Basmati")
            .with_sub_category(2, "Ammamore"),
        Crop::new("Rice", "Nashik")
            .with_sub_category(1, "Basmati")
            .with_sub_category(2, "Ammamore"),
        Crop::new("Wheat", "Nashik")
            .with_sub_category(1, "Durum")
            .with_sub_category(2, "Emmer"),
        Crop::new("Barley", "Ratnagiri")
            .with_sub_category(1, "Hulless Barley")
            .with_sub_category(2, "Barley Flakes"),
    ]
}
