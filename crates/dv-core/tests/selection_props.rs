use std::collections::HashSet;

use dv_core::{
    CoreError, Dataset, DashboardState, RecordId, SelectionSet, Value, MAX_SELECTION,
    UNSELECTED_COLOR,
};
use proptest::prelude::*;

fn dataset(rows: usize) -> Dataset {
    Dataset::new(
        vec!["Name".into(), "X".into(), "Y".into()],
        (0..rows)
            .map(|i| {
                vec![
                    Value::Text(format!("r{}", i)),
                    Value::Number(i as f64),
                    Value::Number((rows - i) as f64),
                ]
            })
            .collect(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn test_selection_never_exceeds_capacity(
        toggles in prop::collection::vec(0usize..40, 0..200)
    ) {
        let mut set = SelectionSet::new();
        for id in toggles {
            let before = set.clone();
            match set.toggle(RecordId(id)) {
                Ok(_) => {}
                Err(CoreError::SelectionFull { capacity }) => {
                    prop_assert_eq!(capacity, MAX_SELECTION);
                    prop_assert_eq!(&set, &before);
                }
                Err(e) => prop_assert!(false, "unexpected error {}", e),
            }
            prop_assert!(set.len() <= MAX_SELECTION);
        }
    }

    #[test]
    fn test_selected_colors_are_distinct(
        toggles in prop::collection::vec(0usize..25, 0..120)
    ) {
        let mut set = SelectionSet::new();
        for id in toggles {
            let _ = set.toggle(RecordId(id));

            // Property: no two selected records share a color, and none uses the default
            let colors: Vec<_> = set.iter().map(|r| r.color()).collect();
            let unique: HashSet<_> = colors.iter().collect();
            prop_assert_eq!(unique.len(), colors.len());
            prop_assert!(!colors.contains(&UNSELECTED_COLOR));
        }
    }

    #[test]
    fn test_color_is_stable_while_selected(
        first in 0usize..30,
        toggles in prop::collection::vec(0usize..30, 0..80)
    ) {
        let mut set = SelectionSet::new();
        set.toggle(RecordId(first)).unwrap();
        let color = set.color_of(RecordId(first));

        for id in toggles.into_iter().filter(|id| *id != first) {
            let _ = set.toggle(RecordId(id));
            prop_assert_eq!(set.color_of(RecordId(first)), color);
        }
    }

    #[test]
    fn test_double_toggle_restores_state(
        prefix in prop::collection::hash_set(0usize..20, 0..MAX_SELECTION),
        id in 20usize..40
    ) {
        let mut set = SelectionSet::new();
        for p in &prefix {
            set.toggle(RecordId(*p)).unwrap();
        }
        let before = set.clone();
        set.toggle(RecordId(id)).unwrap();
        set.toggle(RecordId(id)).unwrap();
        prop_assert_eq!(set, before);
    }
}

#[test]
fn test_twelve_distinct_records_scenario() {
    let state = DashboardState::default();
    state.load_dataset(dataset(12), "twelve");

    let mut accepted = 0;
    let mut rejected = 0;
    for i in 0..12 {
        match state.toggle_selection(RecordId(i)) {
            Ok(_) => accepted += 1,
            Err(CoreError::SelectionFull { .. }) => rejected += 1,
            Err(e) => panic!("unexpected error {}", e),
        }
    }

    assert_eq!(accepted, 10);
    assert_eq!(rejected, 2);
    let ids = state.selection().ids();
    assert_eq!(ids, (0..10).map(RecordId).collect::<Vec<_>>());
    assert!(!state.is_selected(RecordId(10)));
    assert_eq!(state.color_of(RecordId(11)), UNSELECTED_COLOR);
}
