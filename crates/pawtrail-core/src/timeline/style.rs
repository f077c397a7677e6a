//! Per-category display styling.
//!
//! One lookup table replaces the switch statements the original screens
//! carried at every call site. Unknown categories and activity sub-types
//! fall back to the neutral style.

use crate::models::Category;

/// Display descriptor for a feed category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventStyle {
    /// Icon name from the app's icon set
    pub icon: &'static str,
    /// Hex accent color
    pub color: &'static str,
    /// Short display label
    pub label: &'static str,
}

/// Style descriptor for a category.
pub fn classify(category: Category) -> EventStyle {
    match category {
        Category::Vaccination => EventStyle {
            icon: "syringe",
            color: "#4C9F70",
            label: "Vaccination",
        },
        Category::Medication => EventStyle {
            icon: "pill",
            color: "#7C5CBF",
            label: "Medication",
        },
        Category::Visit => EventStyle {
            icon: "stethoscope",
            color: "#4F8EF7",
            label: "Vet Visit",
        },
        Category::Weight => EventStyle {
            icon: "scale",
            color: "#E8913A",
            label: "Weight",
        },
        Category::Document => EventStyle {
            icon: "file-text",
            color: "#5C7080",
            label: "Document",
        },
        Category::Update => EventStyle {
            icon: "refresh",
            color: "#2A9D8F",
            label: "Update",
        },
        Category::Other => EventStyle {
            icon: "paw",
            color: "#8E8E93",
            label: "Activity",
        },
    }
}

/// Map a generic activity-log `type` field to a display category.
pub fn activity_category(activity_type: Option<&str>) -> Category {
    match activity_type
        .map(|t| t.trim().to_lowercase())
        .as_deref()
    {
        Some("document") => Category::Document,
        Some("update") => Category::Update,
        _ => Category::Other,
    }
}
