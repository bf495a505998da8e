use std::{env, sync::Arc};

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use hotel_search::{
    AppConfig, HttpHotelApi, NoticeLevel, SearchOrchestrator, SortKey, DEFAULT_SORT,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn parse_date(arg: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(arg, "%Y-%m-%d")
        .with_context(|| format!("invalid date {arg:?}, expected YYYY-MM-DD"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotel_search=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 4 {
        eprintln!("Usage: {} [checkin YYYY-MM-DD] [checkout YYYY-MM-DD] [sort]", args[0]);
        eprintln!("Sort options:");
        for key in SortKey::ALL {
            eprintln!("  {:<14} {}", key.token(), key.label());
        }
        std::process::exit(1);
    }

    let config = AppConfig::load()?;
    let api = Arc::new(HttpHotelApi::new(&config.client)?);
    let orchestrator = SearchOrchestrator::with_default_dates(
        api,
        config.search.clone(),
        Local::now().date_naive(),
    );

    if let Some(sort) = args.get(3) {
        if sort.parse::<SortKey>().is_err() {
            bail!("unknown sort option {sort:?}");
        }
        orchestrator.set_sort_key(sort.as_str());
    } else {
        orchestrator.set_sort_key(DEFAULT_SORT);
    }

    let outcome = match (args.get(1), args.get(2)) {
        (Some(check_in), Some(check_out)) => {
            let dates = (Some(parse_date(check_in)?), Some(parse_date(check_out)?));
            // a failed health check only warns, search anyway
            orchestrator.check_health().await;
            orchestrator.set_dates(dates.0, dates.1).await
        }
        (Some(_), None) => bail!("check-out date is required when check-in is given"),
        _ => orchestrator.startup().await,
    };

    for notice in orchestrator.take_notices() {
        let marker = match notice.level {
            NoticeLevel::Info => "ℹ",
            NoticeLevel::Warning => "⚠",
            NoticeLevel::Error => "✖",
        };
        println!("{marker} {}: {}", notice.title, notice.description);
    }

    outcome?;

    let filters = orchestrator.filters();
    if let Some((check_in, check_out)) = filters.date_range() {
        println!("\n🏨 Hotels from {check_in} to {check_out}");
    }
    println!("Cities: {}", orchestrator.cities().join(", "));

    let displayed = orchestrator.displayed();
    println!("{} hotels found\n", displayed.len());
    for (i, hotel) in displayed.iter().enumerate() {
        println!(
            "  {}. {}  {}★  {} ({} reviews, {})  {}/night",
            i + 1,
            hotel.name,
            hotel.star_rating,
            hotel.guest_rating.score,
            hotel.guest_rating.review_count,
            hotel.guest_rating.text,
            hotel.pricing.price_per_night,
        );
        println!("     {}", hotel.location.full_address);
        if let Some(meal_plan) = &hotel.meal_plan {
            println!("     {meal_plan}");
        }
    }

    Ok(())
}
