use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::places::{Coordinate, NearbyPlace};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchGuidesParams {
    /// Free-text description of the waste item, e.g. "bottle" or "newspaper".
    pub query: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetGuideParams {
    /// Category key such as "plastic" or "hazardous".
    pub key: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct IdentifyWasteParams {
    /// Name of the uploaded image file to identify.
    pub image_name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindCentersParams {
    /// Free-text address or area to search around.
    pub address: String,
    /// Maximum number of centers to return (default: 5, max: 20).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategorySummary {
    pub key: String,
    pub title: String,
    pub icon: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<CategorySummary>,
}

/// A rendered guide: title plus the opaque rich-text body, handed to the
/// client verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GuideView {
    pub key: String,
    pub title: String,
    pub icon: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchGuidesResponse {
    /// Every matched category key, in catalog order.
    pub matches: Vec<String>,
    /// The first match's guide — the one a UI would render.
    pub guide: GuideView,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IdentifyWasteResponse {
    pub name: String,
    pub category: String,
    /// Confidence in percent, rounded.
    pub confidence_pct: u8,
    /// Disposal instructions for the identified category.
    pub instructions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindCentersResponse {
    /// The provider's formatted rendition of the searched address.
    pub formatted_address: String,
    pub center: Coordinate,
    pub places: Vec<NearbyPlace>,
}
