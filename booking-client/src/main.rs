use booking_client::BookingError;
use booking_client::api::{BookingClient, BookingConfig};
use booking_client::domain::DepartureDate;
use tracing_subscriber::EnvFilter;

/// Kyiv-Pasazhyrskyi.
const DEFAULT_FROM: &str = "2200001";

/// Lviv.
const DEFAULT_TILL: &str = "2218000";

const DEFAULT_DATE: &str = "05.20.2015";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("booking_client=info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BookingError> {
    let from = env_or("BOOKING_FROM", DEFAULT_FROM);
    let till = env_or("BOOKING_TILL", DEFAULT_TILL);
    let date = DepartureDate::parse(&env_or("BOOKING_DATE", DEFAULT_DATE))?;

    let mut config = BookingConfig::new();
    if let Ok(url) = std::env::var("BOOKING_BASE_URL") {
        config = config.with_base_url(url);
    }

    let client = BookingClient::connect(config).await?;

    let trains = client.find_trains(&from, &till, date).await?;
    println!("Found {} trains from {from} to {till} on {date}", trains.len());

    let Some(train) = trains.first() else {
        return Ok(());
    };

    println!(
        "{} {} -> {} departs {} arrives {}, {} free seats",
        train.name,
        train.from_station,
        train.till_station,
        train.from_time,
        train.till_time,
        train.total_free_seats()
    );

    let report = client.coaches_info_for_train(train).await?;

    for (coach_type, coaches) in &report.coaches {
        println!("{coach_type}:");
        for coach in coaches {
            println!(
                "  coach {} (class {}): {} free seats, reservation {}",
                coach.number,
                coach.class,
                coach.free_seat_count(),
                coach.book_price
            );
            for block in &coach.free_places {
                println!("    {:>8.2}  {:?}", block.price, block.seats);
            }
        }
    }

    for failure in &report.failures {
        println!(
            "skipped {} {} {}: {}",
            failure.stage,
            failure.coach_type,
            failure.coach.as_deref().unwrap_or("-"),
            failure.message
        );
    }

    if !report.is_complete() {
        println!("Result is partial: {} requests rejected", report.failures.len());
    }

    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
