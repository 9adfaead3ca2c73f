//! Per-category measurement rules.
//!
//! Every category owns up to three measurement slots. A single table,
//! [`rule`], says what each slot means, whether it is mandatory, and how it is
//! rendered. Intake validation and listing display both read from it.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::catalog::Category;

pub const SLOT_COUNT: usize = 3;

/// Shown when an item has no populated measurement.
pub const NO_MEASUREMENTS: &str = "no measurements recorded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// `120cm (length)`
    Length,
    /// `Base: Ø15cm`, carrying the short label.
    Diameter(&'static str),
    /// `8 sides`
    Count,
    /// `measurement 1: 45cm`
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub name: &'static str,
    pub kind: SlotKind,
    pub required: bool,
}

impl SlotSpec {
    const fn required(name: &'static str, kind: SlotKind) -> Option<Self> {
        Some(Self {
            name,
            kind,
            required: true,
        })
    }

    const fn optional(name: &'static str, kind: SlotKind) -> Option<Self> {
        Some(Self {
            name,
            kind,
            required: false,
        })
    }

    fn render(&self, value: f64) -> String {
        match self.kind {
            SlotKind::Length => format!("{value}cm ({})", self.name),
            SlotKind::Diameter(label) => format!("{label}: Ø{value}cm"),
            SlotKind::Count => format!("{value} {}", self.name),
            SlotKind::Generic => format!("{}: {value}cm", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    /// `None` marks a slot that carries no meaning for the category.
    pub slots: [Option<SlotSpec>; SLOT_COUNT],
    pub separator: &'static str,
}

static LENGTH_HEIGHT_DEPTH: CategoryRule = CategoryRule {
    slots: [
        SlotSpec::required("length", SlotKind::Length),
        SlotSpec::required("height", SlotKind::Length),
        SlotSpec::required("depth", SlotKind::Length),
    ],
    separator: " × ",
};

static HEIGHT_WIDTH_DEPTH: CategoryRule = CategoryRule {
    slots: [
        SlotSpec::required("height", SlotKind::Length),
        SlotSpec::required("width", SlotKind::Length),
        SlotSpec::required("depth", SlotKind::Length),
    ],
    separator: " × ",
};

static COLUMN: CategoryRule = CategoryRule {
    slots: [
        SlotSpec::required("height", SlotKind::Length),
        SlotSpec::optional("sides", SlotKind::Count),
        None,
    ],
    separator: " | ",
};

static MIRROR: CategoryRule = CategoryRule {
    slots: [
        SlotSpec::required("height", SlotKind::Length),
        SlotSpec::required("width", SlotKind::Length),
        None,
    ],
    separator: " × ",
};

static VESSEL: CategoryRule = CategoryRule {
    slots: [
        SlotSpec::required("height", SlotKind::Length),
        SlotSpec::required("base-diameter", SlotKind::Diameter("Base")),
        SlotSpec::required("rim-diameter", SlotKind::Diameter("Boca")),
    ],
    separator: " | ",
};

static SEAT: CategoryRule = CategoryRule {
    slots: [
        SlotSpec::optional("height", SlotKind::Length),
        SlotSpec::optional("width", SlotKind::Length),
        SlotSpec::optional("depth", SlotKind::Length),
    ],
    separator: " × ",
};

static GENERIC: CategoryRule = CategoryRule {
    slots: [
        SlotSpec::optional("measurement 1", SlotKind::Generic),
        SlotSpec::optional("measurement 2", SlotKind::Generic),
        SlotSpec::optional("measurement 3", SlotKind::Generic),
    ],
    separator: " · ",
};

pub fn rule(category: Category) -> &'static CategoryRule {
    match category {
        Category::Table | Category::Console | Category::Buffet => &LENGTH_HEIGHT_DEPTH,
        Category::Bookcase | Category::Wardrobe | Category::ChestOfDrawers => &HEIGHT_WIDTH_DEPTH,
        Category::Column => &COLUMN,
        Category::Mirror => &MIRROR,
        Category::Goblet => &VESSEL,
        Category::Seat => &SEAT,
        Category::Other => &GENERIC,
    }
}

/// Mandatory slot names for `category`, in slot order.
pub fn required_slots(category: Category) -> Vec<&'static str> {
    rule(category)
        .slots
        .iter()
        .flatten()
        .filter(|spec| spec.required)
        .map(|spec| spec.name)
        .collect()
}

/// Every meaningful slot name for `category`, in slot order.
pub fn slot_names(category: Category) -> Vec<&'static str> {
    rule(category).slots.iter().flatten().map(|spec| spec.name).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasurementError {
    #[error("missing required measurements: {}", .missing.join(", "))]
    MissingRequiredMeasurement { missing: Vec<&'static str> },

    #[error("{slot} must be a whole number, got {value}")]
    NonIntegerCount { slot: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct NormalizedMeasurements {
    pub slot1: Option<f64>,
    pub slot2: Option<f64>,
    pub slot3: Option<f64>,
}

impl NormalizedMeasurements {
    pub fn as_array(&self) -> [Option<f64>; SLOT_COUNT] {
        [self.slot1, self.slot2, self.slot3]
    }

    pub fn display(&self, category: Category) -> String {
        format(category, self.slot1, self.slot2, self.slot3)
    }
}

/// Zero, negative and non-finite values all count as "not provided".
fn provided(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

pub fn validate(
    category: Category,
    slot1: Option<f64>,
    slot2: Option<f64>,
    slot3: Option<f64>,
) -> Result<NormalizedMeasurements, MeasurementError> {
    let rule = rule(category);
    let values = [slot1, slot2, slot3].map(provided);

    let mut missing = Vec::new();
    let mut normalized = [None; SLOT_COUNT];
    for (idx, spec) in rule.slots.iter().enumerate() {
        let Some(spec) = spec else { continue };
        match values[idx] {
            Some(v) if spec.kind == SlotKind::Count && v.fract() != 0.0 => {
                return Err(MeasurementError::NonIntegerCount {
                    slot: spec.name,
                    value: v.to_string(),
                });
            }
            Some(v) => normalized[idx] = Some(v),
            None if spec.required => missing.push(spec.name),
            None => {}
        }
    }

    if !missing.is_empty() {
        return Err(MeasurementError::MissingRequiredMeasurement { missing });
    }

    let [slot1, slot2, slot3] = normalized;
    Ok(NormalizedMeasurements {
        slot1,
        slot2,
        slot3,
    })
}

pub fn format(
    category: Category,
    slot1: Option<f64>,
    slot2: Option<f64>,
    slot3: Option<f64>,
) -> String {
    let rule = rule(category);
    let values = [slot1, slot2, slot3].map(provided);

    let parts: Vec<String> = rule
        .slots
        .iter()
        .zip(values)
        .filter_map(|(spec, value)| Some(spec.as_ref()?.render(value?)))
        .collect();

    if parts.is_empty() {
        return NO_MEASUREMENTS.to_string();
    }
    parts.join(rule.separator)
}
