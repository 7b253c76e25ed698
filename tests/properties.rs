use cropfilter::filter::{available_district_options, derive_filter_options, filter_items};
use cropfilter::prelude::*;
use cropfilter::FilterState;
use proptest::prelude::*;
use std::collections::HashSet;

const NAMES: [&str; 5] = ["Rice", "Wheat", "Barley", "Maize", "Millet"];
const DISTRICTS: [&str; 4] = ["Thane", "Nashik", "Ratnagiri", "Pune"];

fn crop_strategy() -> impl Strategy<Value = Crop> {
    (0..NAMES.len(), 0..DISTRICTS.len()).prop_map(|(n, d)| Crop::new(NAMES[n], DISTRICTS[d]))
}

fn crops_strategy() -> impl Strategy<Value = Vec<Crop>> {
    prop::collection::vec(crop_strategy(), 0..24)
}

/// Uncheck every option whose position has a `false` in the mask
fn apply_mask(session: &FilterSession, dimension: FilterDimension, mask: &[bool]) {
    let options = match dimension {
        FilterDimension::Name => session.name_filter_options().get(),
        FilterDimension::District => session.district_filter_options().get(),
    };
    for (option, keep) in options.iter().zip(mask.iter().cycle()) {
        if !keep {
            session.toggle(dimension, &option.name).unwrap();
        }
    }
}

proptest! {
    #[test]
    fn options_are_the_distinct_values_all_checked(crops in crops_strategy()) {
        let state = FilterState::from_items(&crops);

        let names: HashSet<&str> = crops.iter().map(|c| c.name.as_str()).collect();
        let option_names: Vec<&str> = state.name_filters.iter().map(|o| o.name.as_str()).collect();
        prop_assert_eq!(option_names.len(), names.len());
        prop_assert_eq!(option_names.iter().copied().collect::<HashSet<_>>(), names);

        let districts: HashSet<&str> = crops.iter().map(|c| c.district.as_str()).collect();
        let option_districts: HashSet<&str> =
            state.district_filters.iter().map(|o| o.name.as_str()).collect();
        prop_assert_eq!(state.district_filters.len(), districts.len());
        prop_assert_eq!(option_districts, districts);

        prop_assert!(state.name_filters.iter().chain(&state.district_filters).all(|o| o.checked));
    }

    #[test]
    fn deriving_twice_is_equal(crops in crops_strategy()) {
        prop_assert_eq!(
            derive_filter_options(&crops, FilterDimension::Name),
            derive_filter_options(&crops, FilterDimension::Name)
        );
        prop_assert_eq!(FilterState::from_items(&crops), FilterState::from_items(&crops));
    }

    #[test]
    fn visible_crops_have_both_options_checked(
        crops in crops_strategy(),
        name_mask in prop::collection::vec(any::<bool>(), 1..6),
        district_mask in prop::collection::vec(any::<bool>(), 1..5),
    ) {
        let session = FilterSession::from_items(crops.clone());
        apply_mask(&session, FilterDimension::Name, &name_mask);
        apply_mask(&session, FilterDimension::District, &district_mask);

        let state = session.store().snapshot();
        let visible = session.filtered_items().get();
        for crop in &visible {
            prop_assert!(crops.contains(crop));
            prop_assert_eq!(session.store().is_checked(FilterDimension::Name, &crop.name), Some(true));
            prop_assert_eq!(session.store().is_checked(FilterDimension::District, &crop.district), Some(true));
        }
        prop_assert_eq!(visible, filter_items(&crops, &state.name_filters, &state.district_filters));
    }

    #[test]
    fn toggling_a_name_removes_exactly_its_crops(crops in crops_strategy(), pick in 0..NAMES.len()) {
        let session = FilterSession::from_items(crops.clone());
        let name = NAMES[pick];
        prop_assume!(crops.iter().any(|c| c.name == name));

        let before = session.filtered_items().get();
        session.toggle_name_filter(name).unwrap();
        let expected: Vec<Crop> = before.iter().filter(|c| c.name != name).cloned().collect();
        prop_assert_eq!(session.filtered_items().get(), expected);

        session.toggle_name_filter(name).unwrap();
        prop_assert_eq!(session.filtered_items().get(), before);
    }

    #[test]
    fn available_districts_are_reachable_from_enabled_names(
        crops in crops_strategy(),
        name_mask in prop::collection::vec(any::<bool>(), 1..6),
    ) {
        let session = FilterSession::from_items(crops.clone());
        apply_mask(&session, FilterDimension::Name, &name_mask);

        let state = session.store().snapshot();
        let enabled: HashSet<&str> = state
            .name_filters
            .iter()
            .filter(|o| o.checked)
            .map(|o| o.name.as_str())
            .collect();
        let reachable: HashSet<&str> = crops
            .iter()
            .filter(|c| enabled.contains(c.name.as_str()))
            .map(|c| c.district.as_str())
            .collect();

        let available = session.available_district_options().get();
        let available_names: HashSet<&str> = available.iter().map(|o| o.name.as_str()).collect();
        prop_assert_eq!(available_names, reachable);
        prop_assert_eq!(
            available,
            available_district_options(&crops, &state.name_filters, &state.district_filters)
        );
        // Hiding never unchecks
        prop_assert!(session.district_filter_options().get().iter().all(|o| o.checked));
    }

    #[test]
    fn re_enabling_everything_restores_the_full_list(
        crops in crops_strategy(),
        name_mask in prop::collection::vec(any::<bool>(), 1..6),
        district_mask in prop::collection::vec(any::<bool>(), 1..5),
    ) {
        let session = FilterSession::from_items(crops.clone());
        apply_mask(&session, FilterDimension::Name, &name_mask);
        apply_mask(&session, FilterDimension::District, &district_mask);

        session.set_all(FilterDimension::District, true);
        session.set_all(FilterDimension::Name, true);
        prop_assert_eq!(session.filtered_items().get(), crops);
    }
}
