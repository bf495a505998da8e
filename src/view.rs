// Memoized filter-then-sort pipeline that produces the list actually displayed

use std::sync::Arc;

use tracing::trace;

use crate::{filter::filter_hotels, hotel::FilterState, hotel::HotelRecord, sort::sort_hotels};

// `sort(filter(hotels, filters), sort_key)`, recomputed only when one of
// the three inputs differs by value from the previous call.
#[derive(Debug, Default)]
pub struct DerivedView {
    cached: Option<CachedView>,
    recomputations: usize,
}

#[derive(Debug)]
struct CachedView {
    hotels: Arc<Vec<HotelRecord>>,
    filters: FilterState,
    sort_key: String,
    output: Arc<Vec<HotelRecord>>,
}

impl CachedView {
    fn is_for(&self, hotels: &Arc<Vec<HotelRecord>>, filters: &FilterState, sort_key: &str) -> bool {
        // pointer check first, the list is usually the same allocation
        let same_hotels = Arc::ptr_eq(&self.hotels, hotels) || self.hotels == *hotels;
        same_hotels && self.filters == *filters && self.sort_key == sort_key
    }
}

impl DerivedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        hotels: &Arc<Vec<HotelRecord>>,
        filters: &FilterState,
        sort_key: &str,
    ) -> Arc<Vec<HotelRecord>> {
        if let Some(cached) = &self.cached {
            if cached.is_for(hotels, filters, sort_key) {
                return cached.output.clone();
            }
        }

        let output = Arc::new(derive(hotels, filters, sort_key));
        self.recomputations += 1;
        trace!(
            input = hotels.len(),
            output = output.len(),
            sort_key,
            "derived view recomputed"
        );

        self.cached = Some(CachedView {
            hotels: hotels.clone(),
            filters: filters.clone(),
            sort_key: sort_key.to_string(),
            output: output.clone(),
        });

        output
    }

    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}

// The unmemoized pipeline: always filter first, then sort.
pub fn derive(hotels: &[HotelRecord], filters: &FilterState, sort_key: &str) -> Vec<HotelRecord> {
    sort_hotels(&filter_hotels(hotels, filters), sort_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_hotels;

    fn seattle_filters() -> FilterState {
        let mut filters = FilterState::default();
        filters.price_range = 150.0..=250.0;
        filters.star_ratings.insert(4);
        filters.guest_rating = 8.0..=10.0;
        filters.min_reviews = 900;
        filters
    }

    #[test]
    fn test_filter_then_sort() {
        let hotels = sample_hotels();
        let view = derive(&hotels, &seattle_filters(), "rating-desc");

        let names: Vec<&str> = view.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Kimpton Hotel Monaco",
                "The Edgewater Hotel",
                "The Westin Seattle",
                "Warwick Seattle",
            ]
        );
    }

    #[test]
    fn test_memoized_on_unchanged_inputs() {
        let hotels = Arc::new(sample_hotels());
        let filters = seattle_filters();
        let mut view = DerivedView::new();

        let first = view.get(&hotels, &filters, "price-asc");
        let second = view.get(&hotels, &filters.clone(), "price-asc");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(view.recomputations(), 1);

        // a structurally equal list in a fresh allocation is still a hit
        let copy = Arc::new(sample_hotels());
        let third = view.get(&copy, &filters, "price-asc");
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(view.recomputations(), 1);
    }

    #[test]
    fn test_recomputes_when_any_input_changes() {
        let hotels = Arc::new(sample_hotels());
        let mut filters = seattle_filters();
        let mut view = DerivedView::new();

        view.get(&hotels, &filters, "price-asc");
        view.get(&hotels, &filters, "name-asc");
        assert_eq!(view.recomputations(), 2);

        filters.search_query = "avenue".to_string();
        let narrowed = view.get(&hotels, &filters, "name-asc");
        assert_eq!(view.recomputations(), 3);
        assert_eq!(narrowed.len(), 2);

        let mut fewer = sample_hotels();
        fewer.truncate(2);
        let fewer = Arc::new(fewer);
        view.get(&fewer, &filters, "name-asc");
        assert_eq!(view.recomputations(), 4);
    }
}
