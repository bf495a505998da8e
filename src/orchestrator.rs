// Search orchestration: owns the session's filter/sort state, runs remote
// searches and feeds their results into the derived view.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    api::{ApiError, HotelApi, SearchParams},
    config::SearchConfig,
    hotel::{extract_cities, FilterState, HotelRecord},
    sort::DEFAULT_SORT,
    view::DerivedView,
};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to fetch hotels. Please check if the API server is running.")]
    Transport(#[source] ApiError),

    #[error("Search failed. Please try different search criteria.")]
    Unsuccessful,

    #[error("Both check-in and check-out dates are required.")]
    IncompleteDates,

    #[error("Check-out date must be after check-in date.")]
    InvalidDateRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Searching,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    // The response was applied to the session.
    Applied { results_count: usize },
    // A newer search started while this one was in flight; result dropped.
    Stale,
    // Nothing was sent (dates not chosen yet, or the health check failed).
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

// A user-facing notification, the toast of a graphical front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            description: description.into(),
        }
    }
}

pub const MAX_NOTICES: usize = 32;

struct Session {
    filters: FilterState,
    sort_key: String,
    hotels: Arc<Vec<HotelRecord>>,
    cities: Vec<String>,
    status: SearchStatus,
    error: Option<String>,
    notices: Vec<Notice>,
    api_available: Option<bool>,
    // highest sequence number handed out so far
    issued: u64,
    view: DerivedView,
}

impl Session {
    // Undrained notices are capped; the oldest ones go first.
    fn push_notice(&mut self, notice: Notice) {
        if self.notices.len() >= MAX_NOTICES {
            self.notices.remove(0);
        }
        self.notices.push(notice);
    }
}

#[derive(Clone)]
pub struct SearchOrchestrator {
    api: Arc<dyn HotelApi>,
    config: SearchConfig,
    session: Arc<Mutex<Session>>,
}

// Request for the current filters. Dates are mandatory and must be in order.
pub fn build_search_params(
    filters: &FilterState,
    config: &SearchConfig,
) -> Result<SearchParams, SearchError> {
    let (check_in, check_out) = filters.date_range().ok_or(SearchError::IncompleteDates)?;
    if check_out <= check_in {
        return Err(SearchError::InvalidDateRange);
    }

    let mut params = SearchParams::new(check_in, check_out);

    let max_price = *filters.price_range.end();
    params.max_price = max_price.is_finite().then_some(max_price);

    // lowest selected star class, although the local filter treats the set
    // as exact matches
    params.min_stars = filters.star_ratings.first().copied();
    params.min_reviews = (filters.min_reviews > 0).then_some(filters.min_reviews);

    if filters.cities.len() == 1 {
        params.location = filters
            .cities
            .first()
            .map(|city| format!("{}, {}", city, config.country));
    }

    params.adults = Some(config.adults);
    params.rooms = Some(config.rooms);
    params.children = config.children;

    Ok(params)
}

impl SearchOrchestrator {
    pub fn new(api: Arc<dyn HotelApi>, config: SearchConfig) -> Self {
        Self::with_filters(api, config, FilterState::default())
    }

    // Starts with the configured default stay relative to `today`.
    pub fn with_default_dates(api: Arc<dyn HotelApi>, config: SearchConfig, today: NaiveDate) -> Self {
        let (check_in, check_out) = config.default_dates(today).unzip();
        Self::with_filters(api, config, FilterState::with_dates(check_in, check_out))
    }

    pub fn with_filters(api: Arc<dyn HotelApi>, config: SearchConfig, filters: FilterState) -> Self {
        let session = Session {
            filters,
            sort_key: DEFAULT_SORT.to_string(),
            hotels: Arc::new(Vec::new()),
            cities: Vec::new(),
            status: SearchStatus::Idle,
            error: None,
            notices: Vec::new(),
            api_available: None,
            issued: 0,
            view: DerivedView::new(),
        };

        Self {
            api,
            config,
            session: Arc::new(Mutex::new(session)),
        }
    }

    // Health check, then a first search if dates are already chosen.
    pub async fn startup(&self) -> Result<SearchOutcome, SearchError> {
        if !self.check_health().await {
            return Ok(SearchOutcome::Skipped);
        }

        let dates_set = self.session.lock().filters.date_range().is_some();
        if dates_set {
            self.search().await
        } else {
            Ok(SearchOutcome::Skipped)
        }
    }

    // Checks backend health once. A failure only raises a warning notice.
    pub async fn check_health(&self) -> bool {
        let health = self.api.health().await;

        let mut session = self.session.lock();
        let healthy = match health {
            Ok(true) => true,
            Ok(false) => {
                warn!("hotel search API reported unhealthy");
                session.push_notice(Notice::new(
                    NoticeLevel::Warning,
                    "API Unavailable",
                    "The hotel search API is currently unavailable. Please try again later.",
                ));
                false
            }
            Err(err) => {
                warn!(error = %err, "hotel search API unreachable");
                session.push_notice(Notice::new(
                    NoticeLevel::Warning,
                    "Connection Error",
                    "Failed to connect to the hotel search API. Is the local server running?",
                ));
                false
            }
        };
        session.api_available = Some(healthy);

        healthy
    }

    // Records new dates; searches as soon as both ends are known.
    pub async fn set_dates(
        &self,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> Result<SearchOutcome, SearchError> {
        {
            let mut session = self.session.lock();
            session.filters.check_in = check_in;
            session.filters.check_out = check_out;
        }

        if check_in.is_none() || check_out.is_none() {
            return Ok(SearchOutcome::Skipped);
        }

        self.search().await
    }

    pub async fn refresh(&self) -> Result<SearchOutcome, SearchError> {
        self.search().await
    }

    async fn search(&self) -> Result<SearchOutcome, SearchError> {
        let (params, seq) = {
            let mut session = self.session.lock();
            let params = match build_search_params(&session.filters, &self.config) {
                Ok(params) => params,
                Err(err) => {
                    let title = match err {
                        SearchError::InvalidDateRange => "Invalid dates",
                        _ => "Please select dates",
                    };
                    session.push_notice(Notice::new(NoticeLevel::Error, title, err.to_string()));
                    return Err(err);
                }
            };

            session.issued += 1;
            session.status = SearchStatus::Searching;
            session.error = None;
            (params, session.issued)
        };

        debug!(seq, ?params, "search started");
        let result = self.api.search(params).await;

        let mut session = self.session.lock();
        if seq != session.issued {
            debug!(seq, latest = session.issued, "dropping superseded search result");
            return Ok(SearchOutcome::Stale);
        }

        match result {
            Ok(response) if response.success => {
                let results_count = response.results_count;
                info!(seq, results_count, hotels = response.hotels.len(), "search complete");

                session.cities = extract_cities(&response.hotels);
                session.hotels = Arc::new(response.hotels);
                session.status = SearchStatus::Success;
                session.push_notice(Notice::new(
                    NoticeLevel::Info,
                    "Search Complete",
                    format!("Found {results_count} hotels for your dates."),
                ));

                Ok(SearchOutcome::Applied { results_count })
            }
            Ok(_) => {
                warn!(seq, "search reported unsuccessful");
                let err = SearchError::Unsuccessful;
                session.status = SearchStatus::Failed;
                session.error = Some(err.to_string());
                session.push_notice(Notice::new(
                    NoticeLevel::Error,
                    "Search Failed",
                    err.to_string(),
                ));

                Err(err)
            }
            Err(api_err) => {
                warn!(
                    seq,
                    error = %api_err,
                    retryable = api_err.is_retryable(),
                    "search request failed"
                );
                let err = SearchError::Transport(api_err);
                session.status = SearchStatus::Failed;
                session.error = Some(err.to_string());
                session.push_notice(Notice::new(
                    NoticeLevel::Error,
                    "Search Error",
                    "Failed to fetch hotel data. Please try again.",
                ));

                Err(err)
            }
        }
    }

    pub fn filters(&self) -> FilterState {
        self.session.lock().filters.clone()
    }

    pub fn set_filters(&self, filters: FilterState) {
        self.session.lock().filters = filters;
    }

    pub fn update_filters(&self, update: impl FnOnce(&mut FilterState)) {
        update(&mut self.session.lock().filters);
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.session.lock().filters.search_query = query.into();
    }

    pub fn set_cities<I, S>(&self, cities: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.session.lock().filters.cities = cities.into_iter().map(Into::into).collect();
    }

    pub fn reset_filters(&self) {
        self.session.lock().filters.reset();
    }

    pub fn sort_key(&self) -> String {
        self.session.lock().sort_key.clone()
    }

    pub fn set_sort_key(&self, token: impl Into<String>) {
        self.session.lock().sort_key = token.into();
    }

    pub fn status(&self) -> SearchStatus {
        self.session.lock().status
    }

    pub fn error(&self) -> Option<String> {
        self.session.lock().error.clone()
    }

    pub fn api_available(&self) -> Option<bool> {
        self.session.lock().api_available
    }

    pub fn hotels(&self) -> Arc<Vec<HotelRecord>> {
        self.session.lock().hotels.clone()
    }

    pub fn cities(&self) -> Vec<String> {
        self.session.lock().cities.clone()
    }

    pub fn displayed(&self) -> Arc<Vec<HotelRecord>> {
        let mut guard = self.session.lock();
        let session = &mut *guard;
        session
            .view
            .get(&session.hotels, &session.filters, &session.sort_key)
    }

    pub fn view_recomputations(&self) -> usize {
        self.session.lock().view.recomputations()
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.session.lock().notices)
    }
}
