// Hotel records as returned by the search backend, plus the user-owned filter state

use std::{collections::BTreeSet, ops::RangeInclusive};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PRICE_RANGE: RangeInclusive<f64> = 50.0..=1000.0;
pub const DEFAULT_GUEST_RATING_RANGE: RangeInclusive<f64> = 1.0..=10.0;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HotelRecord {
    pub id: String,
    pub name: String,
    pub location: HotelLocation,
    pub star_rating: f64,
    pub guest_rating: GuestRating,
    pub pricing: Pricing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HotelLocation {
    pub address: String,
    pub city: String,
    pub full_address: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GuestRating {
    pub score: f64,
    pub review_count: u32,
    pub text: String,
}

// `total_price` and `price_per_night` are display strings ("$3,106.50").
// Only `price_per_night_unformatted` takes part in filtering and sorting.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Pricing {
    pub total_price: String,
    pub currency: String,
    pub price_per_night: String,
    pub price_per_night_unformatted: f64,
}

impl HotelRecord {
    pub fn nightly_price(&self) -> f64 {
        self.pricing.price_per_night_unformatted
    }

    // Star rating rounded down, the granularity of the star filter.
    pub fn star_class(&self) -> u8 {
        self.star_rating.floor().clamp(0.0, u8::MAX as f64) as u8
    }

    // Lower-cased "name full_address", the haystack for free-text search.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.name, self.location.full_address).to_lowercase()
    }
}

// Constraints chosen by the user, one instance per session.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilterState {
    pub cities: BTreeSet<String>,
    pub price_range: RangeInclusive<f64>,
    pub star_ratings: BTreeSet<u8>,
    pub guest_rating: RangeInclusive<f64>,
    pub min_reviews: u32,
    pub search_query: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            cities: BTreeSet::new(),
            price_range: DEFAULT_PRICE_RANGE,
            star_ratings: BTreeSet::new(),
            guest_rating: DEFAULT_GUEST_RATING_RANGE,
            min_reviews: 0,
            search_query: String::new(),
            check_in: None,
            check_out: None,
        }
    }
}

impl FilterState {
    pub fn with_dates(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> Self {
        Self {
            check_in,
            check_out,
            ..Default::default()
        }
    }

    // A state that lets every hotel through, whatever its price or rating.
    pub fn unrestricted() -> Self {
        Self {
            price_range: f64::NEG_INFINITY..=f64::INFINITY,
            guest_rating: f64::NEG_INFINITY..=f64::INFINITY,
            ..Default::default()
        }
    }

    // Back to defaults, keeping the chosen dates.
    pub fn reset(&mut self) {
        *self = Self::with_dates(self.check_in, self.check_out);
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.check_in.zip(self.check_out)
    }

    pub fn active_filters_count(&self) -> usize {
        self.cities.len()
            + usize::from(!self.star_ratings.is_empty())
            + usize::from(self.min_reviews > 0)
            + usize::from(self.price_range != DEFAULT_PRICE_RANGE)
            + usize::from(self.guest_rating != DEFAULT_GUEST_RATING_RANGE)
    }

    pub fn active_filter_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.cities.iter().cloned().collect();

        if !self.star_ratings.is_empty() {
            let stars: Vec<String> = self.star_ratings.iter().map(u8::to_string).collect();
            labels.push(format!("Star rating: {}", stars.join(", ")));
        }
        if self.min_reviews > 0 {
            labels.push(format!("Min reviews: {}", self.min_reviews));
        }
        if self.price_range != DEFAULT_PRICE_RANGE {
            labels.push(format!(
                "${} - ${}",
                self.price_range.start(),
                self.price_range.end()
            ));
        }
        if self.guest_rating != DEFAULT_GUEST_RATING_RANGE {
            labels.push(format!(
                "Rating: {} - {}",
                self.guest_rating.start(),
                self.guest_rating.end()
            ));
        }

        labels
    }
}

// Sorted, distinct, non-empty city names across a result set.
pub fn extract_cities(hotels: &[HotelRecord]) -> Vec<String> {
    hotels
        .iter()
        .map(|h| h.location.city.as_str())
        .filter(|city| !city.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
