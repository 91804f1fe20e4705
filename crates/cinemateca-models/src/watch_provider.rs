use serde::{Deserialize, Serialize};
use std::fmt;

/// Commercial category under which a streaming provider offers a title.
///
/// Declaration order is the order the tiers are concatenated in before
/// de-duplication, so it decides which tier a multi-tier provider reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
    /// Subscription
    Flatrate,
    Rent,
    Buy,
}

impl OfferType {
    pub const ALL: [OfferType; 3] = [OfferType::Flatrate, OfferType::Rent, OfferType::Buy];

    /// Key of this tier inside an upstream region object
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferType::Flatrate => "flatrate",
            OfferType::Rent => "rent",
            OfferType::Buy => "buy",
        }
    }
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchProvider {
    pub id: String,
    pub name: String,
    pub logo_url: String,
    pub offer_type: OfferType,
}
