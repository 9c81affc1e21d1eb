/// Recycling-center finder.
///
/// Wraps the external places provider: geocode the address, then rank nearby
/// places matching the configured keyword. Provider failures surface once as
/// opaque messages; nothing here retries at the feature level (the HTTP
/// client handles transport retries internally).
use std::sync::Arc;

use tracing::info;

use waste_common::error::CommonError;
use waste_common::mcp_api::FindCentersResponse;
use waste_common::places::PlacesClient;

use crate::cache::CenterCache;
use crate::error::AppError;

pub struct CenterFinder {
    places: Arc<PlacesClient>,
    cache: Arc<CenterCache>,
    radius_meters: u32,
    keyword: String,
}

impl CenterFinder {
    pub fn new(
        places: Arc<PlacesClient>,
        cache: Arc<CenterCache>,
        radius_meters: u32,
        keyword: String,
    ) -> Self {
        Self {
            places,
            cache,
            radius_meters,
            keyword,
        }
    }

    /// Find recycling centers near a free-text address. The returned place
    /// list is untruncated; the caller applies its own limit. An empty list
    /// means the provider found no centers, which is an answer, not an error.
    pub async fn find(&self, address: &str) -> Result<FindCentersResponse, AppError> {
        if let Some(cached) = self
            .cache
            .get_centers(address, self.radius_meters, &self.keyword)
            .await
        {
            info!(address, "centers cache hit");
            return Ok(cached);
        }

        let geocoded = self
            .places
            .geocode(address)
            .await
            .map_err(CommonError::from)?
            .ok_or_else(|| AppError::AddressNotFound(address.to_string()))?;

        let places = self
            .places
            .nearby_search(geocoded.location, self.radius_meters, &self.keyword)
            .await
            .map_err(CommonError::from)?;

        info!(
            address,
            formatted = %geocoded.formatted_address,
            count = places.len(),
            "nearby search complete"
        );

        let response = FindCentersResponse {
            formatted_address: geocoded.formatted_address,
            center: geocoded.location,
            places,
        };
        self.cache
            .set_centers(address, self.radius_meters, &self.keyword, &response)
            .await;
        Ok(response)
    }
}
