// Hotel search client: filter/sort pipeline over backend results plus the
// orchestration that keeps it fed

pub mod api;
pub mod config;
pub mod filter;
pub mod hotel;
pub mod orchestrator;
pub mod sample;
pub mod sort;
pub mod view;

// Re-export key types for convenience
pub use api::{ApiError, ClientError, HotelApi, HttpHotelApi, SearchParams, SearchResponse};
pub use config::{AppConfig, ClientConfig, SearchConfig};
pub use filter::{filter_hotels, matches};
pub use hotel::{extract_cities, FilterState, HotelRecord};
pub use orchestrator::{
    build_search_params, Notice, NoticeLevel, SearchError, SearchOrchestrator, SearchOutcome,
    SearchStatus,
};
pub use sort::{sort_hotels, SortKey, DEFAULT_SORT};
pub use view::{derive, DerivedView};
