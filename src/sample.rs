// Six Seattle listings in the backend's response shape, handy for demos and tests

use crate::hotel::{GuestRating, HotelLocation, HotelRecord, Pricing};

struct Row {
    id: &'static str,
    name: &'static str,
    address: &'static str,
    stars: f64,
    score: f64,
    reviews: u32,
    score_text: &'static str,
    total: &'static str,
    nightly: &'static str,
    nightly_raw: f64,
    meal_plan: &'static str,
    image: &'static str,
}

const ROWS: [Row; 6] = [
    Row {
        id: "hotel_1",
        name: "Warwick Seattle",
        address: "401 Lenora Street",
        stars: 4.0,
        score: 8.1,
        reviews: 1023,
        score_text: "Very Good",
        total: "$3,106.50",
        nightly: "$191.89",
        nightly_raw: 191.89,
        meal_plan: "Breakfast included",
        image: "https://images.unsplash.com/photo-1566073771259-6a8506099945",
    },
    Row {
        id: "hotel_2",
        name: "Hyatt House Seattle",
        address: "201 5th Avenue",
        stars: 3.5,
        score: 9.2,
        reviews: 856,
        score_text: "Exceptional",
        total: "$2,850.00",
        nightly: "$178.13",
        nightly_raw: 178.13,
        meal_plan: "Breakfast & dinner included",
        image: "https://images.unsplash.com/photo-1564501049412-61c2a3083791",
    },
    Row {
        id: "hotel_3",
        name: "The Edgewater Hotel",
        address: "2411 Alaskan Way",
        stars: 4.5,
        score: 8.7,
        reviews: 1245,
        score_text: "Excellent",
        total: "$3,950.50",
        nightly: "$246.91",
        nightly_raw: 246.91,
        meal_plan: "Room only",
        image: "https://images.unsplash.com/photo-1520250497591-112f2f40a3f4",
    },
    Row {
        id: "hotel_4",
        name: "Kimpton Hotel Monaco",
        address: "1101 4th Avenue",
        stars: 4.0,
        score: 8.9,
        reviews: 934,
        score_text: "Excellent",
        total: "$3,280.00",
        nightly: "$205.00",
        nightly_raw: 205.00,
        meal_plan: "Breakfast included",
        image: "https://images.unsplash.com/photo-1551882547-ff40c63fe5fa",
    },
    Row {
        id: "hotel_5",
        name: "Fairmont Olympic Hotel",
        address: "411 University Street",
        stars: 5.0,
        score: 9.5,
        reviews: 1652,
        score_text: "Exceptional",
        total: "$4,800.00",
        nightly: "$300.00",
        nightly_raw: 300.00,
        meal_plan: "Breakfast & dinner included",
        image: "https://images.unsplash.com/photo-1606046604972-77cc76aee944",
    },
    Row {
        id: "hotel_6",
        name: "The Westin Seattle",
        address: "1900 5th Avenue",
        stars: 4.0,
        score: 8.5,
        reviews: 1432,
        score_text: "Very Good",
        total: "$3,440.00",
        nightly: "$215.00",
        nightly_raw: 215.00,
        meal_plan: "Breakfast included",
        image: "https://images.unsplash.com/photo-1566073771259-6a8506099945",
    },
];

pub fn sample_hotels() -> Vec<HotelRecord> {
    ROWS.iter()
        .map(|row| HotelRecord {
            id: row.id.to_string(),
            name: row.name.to_string(),
            location: HotelLocation {
                address: row.address.to_string(),
                city: "Seattle".to_string(),
                full_address: format!("{}, Seattle, Washington", row.address),
            },
            star_rating: row.stars,
            guest_rating: GuestRating {
                score: row.score,
                review_count: row.reviews,
                text: row.score_text.to_string(),
            },
            pricing: Pricing {
                total_price: row.total.to_string(),
                currency: "USD".to_string(),
                price_per_night: row.nightly.to_string(),
                price_per_night_unformatted: row.nightly_raw,
            },
            meal_plan: Some(row.meal_plan.to_string()),
            image_url: Some(row.image.to_string()),
        })
        .collect()
}
