use serde::{Deserialize, Serialize};

/// A waste category with its disposal guide (e.g. "plastic", "hazardous").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Lookup handle, unique within the catalog, e.g. "plastic"
    pub key: String,
    /// Display name, e.g. "Plastic Recycling Guide"
    pub title: String,
    /// Decorative emoji shown next to the title
    pub icon: String,
    /// Lowercase search terms associated with the category
    pub keywords: Vec<String>,
    /// Opaque rich-text guide body, handed to clients verbatim
    pub content: String,
}

/// Outcome of the mock image identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    /// Display name of the identified item, e.g. "Plastic Bottle"
    pub name: String,
    /// Category key the item belongs to
    pub category: String,
    /// Confidence in [0, 1]
    pub confidence: f32,
}
