// Ordering of hotel lists by one of the nine user-facing sort options

use std::{cmp::Ordering, fmt, str::FromStr};

use feruca::Collator;

use crate::hotel::HotelRecord;

pub const DEFAULT_SORT: &str = "price-asc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    RatingDesc,
    RatingAsc,
    StarsDesc,
    StarsAsc,
    ReviewsDesc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 9] = [
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::RatingDesc,
        SortKey::RatingAsc,
        SortKey::StarsDesc,
        SortKey::StarsAsc,
        SortKey::ReviewsDesc,
        SortKey::NameAsc,
        SortKey::NameDesc,
    ];

    pub fn token(self) -> &'static str {
        match self {
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::RatingDesc => "rating-desc",
            SortKey::RatingAsc => "rating-asc",
            SortKey::StarsDesc => "stars-desc",
            SortKey::StarsAsc => "stars-asc",
            SortKey::ReviewsDesc => "reviews-desc",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::PriceAsc => "Price: Low to High",
            SortKey::PriceDesc => "Price: High to Low",
            SortKey::RatingDesc => "Guest Rating: High to Low",
            SortKey::RatingAsc => "Guest Rating: Low to High",
            SortKey::StarsDesc => "Star Rating: High to Low",
            SortKey::StarsAsc => "Star Rating: Low to High",
            SortKey::ReviewsDesc => "Most Reviews",
            SortKey::NameAsc => "Name: A to Z",
            SortKey::NameDesc => "Name: Z to A",
        }
    }

    // Name keys go through `names`; the numeric keys never touch it.
    pub fn compare(self, a: &HotelRecord, b: &HotelRecord, names: &mut Collator) -> Ordering {
        match self {
            SortKey::PriceAsc => a.nightly_price().total_cmp(&b.nightly_price()),
            SortKey::PriceDesc => b.nightly_price().total_cmp(&a.nightly_price()),
            SortKey::RatingDesc => b.guest_rating.score.total_cmp(&a.guest_rating.score),
            SortKey::RatingAsc => a.guest_rating.score.total_cmp(&b.guest_rating.score),
            SortKey::StarsDesc => b.star_rating.total_cmp(&a.star_rating),
            SortKey::StarsAsc => a.star_rating.total_cmp(&b.star_rating),
            SortKey::ReviewsDesc => b.guest_rating.review_count.cmp(&a.guest_rating.review_count),
            SortKey::NameAsc => names.collate(&a.name, &b.name),
            SortKey::NameDesc => names.collate(&b.name, &a.name),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort option: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.token() == s)
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

// A new list ordered by the option named `token`.
// Ties keep their input order; an unknown token leaves the order as is.
// Names follow Unicode collation with CLDR root tailoring, so accents and
// case are secondary to the base letters ("Éclat" < "Fairview").
pub fn sort_hotels(hotels: &[HotelRecord], token: &str) -> Vec<HotelRecord> {
    let mut sorted = hotels.to_vec();

    if let Ok(key) = token.parse::<SortKey>() {
        let mut names = Collator::default();
        sorted.sort_by(|a, b| key.compare(a, b, &mut names));
    }

    sorted
}
