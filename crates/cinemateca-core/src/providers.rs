use cinemateca_models::{OfferType, WatchProvider};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use crate::images::{ImageResolver, ImageSize};
use crate::resolver::{fields, member_id, resolve, resolve_string};

/// Keep the first occurrence of every provider id, drop id-less entries,
/// preserve relative order.
///
/// Callers concatenate tiers as flatrate, rent, buy, so a provider offered
/// in several tiers is reported with the earliest one.
pub fn dedupe(providers: Vec<WatchProvider>) -> Vec<WatchProvider> {
    let mut seen = HashSet::new();
    providers
        .into_iter()
        .filter(|p| !p.id.is_empty())
        .filter(|p| seen.insert(p.id.clone()))
        .collect()
}

/// Tag one tier's raw entries with their offer type
fn tier(region: &Value, offer_type: OfferType, images: &ImageResolver) -> Vec<WatchProvider> {
    region
        .get(offer_type.as_str())
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .map(|entry| WatchProvider {
                    id: member_id(entry, &fields::PROVIDER_ID),
                    name: resolve_string(entry, &fields::PROVIDER_NAME),
                    logo_url: images.to_absolute_url(
                        resolve(entry, &fields::LOGO).and_then(Value::as_str),
                        ImageSize::W185,
                    ),
                    offer_type,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Providers for one region of a watch-providers response.
///
/// Accepts the catalog envelope (`{ results: { ES: {...} } }`) or a bare
/// region object. A region that is absent yields an empty list.
pub fn providers_for_region(response: &Value, region: &str, images: &ImageResolver) -> Vec<WatchProvider> {
    let region_key = region.to_uppercase();
    let region_value = response
        .get("results")
        .and_then(|results| results.get(&region_key))
        .or_else(|| {
            // Bare region object, as served by the legacy API
            OfferType::ALL
                .iter()
                .any(|t| response.get(t.as_str()).is_some())
                .then_some(response)
        });

    let Some(region_value) = region_value else {
        debug!("No watch providers for region {}", region_key);
        return Vec::new();
    };

    let concatenated: Vec<WatchProvider> = OfferType::ALL
        .iter()
        .flat_map(|offer_type| tier(region_value, *offer_type, images))
        .collect();

    dedupe(concatenated)
}
