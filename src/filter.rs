// Client-side filtering of a hotel result set against the user's FilterState

use crate::hotel::{FilterState, HotelRecord};

// True when `hotel` satisfies every constraint in `filters`.
// Dates are not consulted here; they only shape the remote request.
pub fn matches(hotel: &HotelRecord, filters: &FilterState) -> bool {
    let city_ok = filters.cities.is_empty() || filters.cities.contains(&hotel.location.city);

    let price_ok = filters.price_range.contains(&hotel.nightly_price());

    // 4.5 stars belongs to the "4" bucket only
    let stars_ok =
        filters.star_ratings.is_empty() || filters.star_ratings.contains(&hotel.star_class());

    let rating_ok = filters.guest_rating.contains(&hotel.guest_rating.score);

    let reviews_ok = hotel.guest_rating.review_count >= filters.min_reviews;

    let query_ok = filters.search_query.is_empty()
        || hotel
            .search_text()
            .contains(&filters.search_query.to_lowercase());

    city_ok && price_ok && stars_ok && rating_ok && reviews_ok && query_ok
}

// The hotels matching `filters`, in their original order.
pub fn filter_hotels(hotels: &[HotelRecord], filters: &FilterState) -> Vec<HotelRecord> {
    hotels
        .iter()
        .filter(|hotel| matches(hotel, filters))
        .cloned()
        .collect()
}
