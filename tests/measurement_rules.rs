use furniture_inventory::{
    catalog::Category,
    measurements::{self, MeasurementError, NO_MEASUREMENTS, format, required_slots, validate},
};

#[test]
fn table_intake_then_listing() {
    let err = validate(Category::Table, Some(120.0), Some(75.0), Some(0.0)).unwrap_err();
    assert_eq!(
        err,
        MeasurementError::MissingRequiredMeasurement {
            missing: vec!["depth"]
        }
    );

    let slots = validate(Category::Table, Some(120.0), Some(75.0), Some(40.0)).unwrap();
    assert_eq!(
        format(Category::Table, slots.slot1, slots.slot2, slots.slot3),
        "120cm (length) × 75cm (height) × 40cm (depth)"
    );
}

#[test]
fn goblet_uses_diameter_labels() {
    let slots = validate(Category::Goblet, Some(30.0), Some(15.0), Some(12.0)).unwrap();
    assert_eq!(
        slots.display(Category::Goblet),
        "30cm (height) | Base: Ø15cm | Boca: Ø12cm"
    );
}

#[test]
fn unrecognized_category_never_fails() {
    let category = Category::from_label("tocador");
    assert!(required_slots(category).is_empty());
    assert!(validate(category, None, None, None).is_ok());
    assert_eq!(format(category, None, None, None), NO_MEASUREMENTS);
    assert_eq!(
        format(category, None, Some(62.0), None),
        "measurement 2: 62cm"
    );
}

#[test]
fn rule_table_is_shared_by_validation_and_display() {
    for category in Category::ALL {
        let rule = measurements::rule(category);
        let required: Vec<_> = rule
            .slots
            .iter()
            .flatten()
            .filter(|s| s.required)
            .map(|s| s.name)
            .collect();
        assert_eq!(required, required_slots(category));
        for name in required_slots(category) {
            assert!(measurements::slot_names(category).contains(&name));
        }
    }
}
