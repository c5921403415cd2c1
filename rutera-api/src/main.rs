use chrono::{Duration, Utc};
use rutera_api::{app, AppState};
use rutera_core::{
    InMemoryBookingService, InMemoryTripDirectory, StaticSessionProvider, Stop, Trip,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rutera_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = rutera_api::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Rutera API on port {}", config.server.port);

    let directory = Arc::new(InMemoryTripDirectory::new());
    if config.demo.seed {
        seed_trips(&directory, config.demo.per_seat_fare);
    }

    let app_state = AppState::new(
        directory,
        Arc::new(InMemoryBookingService::new(config.demo.per_seat_fare)),
        Arc::new(StaticSessionProvider::new(
            config.auth.demo_token.clone(),
            config.auth.demo_user.clone(),
        )),
    );

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Sample departures for tomorrow so the search endpoint has something to
/// return out of the box.
fn seed_trips(directory: &InMemoryTripDirectory, fare: i32) {
    let tomorrow = Utc::now() + Duration::days(1);
    let morning = tomorrow.date_naive().and_hms_opt(6, 30, 0);
    let evening = tomorrow.date_naive().and_hms_opt(21, 0, 0);

    let (Some(morning), Some(evening)) = (morning, evening) else {
        return;
    };

    let routes = [
        ("Hill Express", "Pune", "Mumbai", morning, 3.5, vec![3, 4]),
        ("Coastal Travels", "Mumbai", "Goa", evening, 11.0, vec![]),
    ];

    for (operator, from, to, departs, hours, booked) in routes {
        let departure = departs.and_utc();
        let trip = Trip {
            id: Uuid::new_v4(),
            operator_name: operator.to_string(),
            from_city: from.to_string(),
            to_city: to.to_string(),
            departure,
            arrival: departure + Duration::minutes((hours * 60.0) as i64),
            total_seats: 40,
            booked_seats: booked.into_iter().collect(),
            fare,
            boarding_points: vec![
                Stop {
                    location: "Central Depot".to_string(),
                    time: "06:00 AM".to_string(),
                },
                Stop {
                    location: "Airport Road".to_string(),
                    time: "06:20 AM".to_string(),
                },
            ],
            dropping_points: vec![Stop {
                location: "City Center".to_string(),
                time: "on arrival".to_string(),
            }],
        };
        tracing::debug!(trip_id = %trip.id, %trip.from_city, %trip.to_city, "seeded trip");
        directory.insert(trip);
    }
}
