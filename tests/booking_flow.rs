//! End-to-end booking flow and concurrency properties against a real
//! Postgres instance. Each test provisions its own bus, route, schedule
//! and users, so tests can share a database. All tests skip cleanly
//! when DATABASE_URL is not set.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use nextstop_booking::dto::booking_dto::BookTicketRequest;
use nextstop_booking::repositories::seat_repository::SeatRepository;
use nextstop_booking::repositories::schedule_repository::ScheduleRepository;
use nextstop_booking::services::booking_service::BookingService;
use nextstop_booking::services::seat_allocator::SeatAllocator;
use nextstop_booking::utils::errors::AppError;

async fn try_pool() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping: DATABASE_URL not set");
            return None;
        }
    };
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    Some(pool)
}

struct Trip {
    user_id: Uuid,
    bus_id: Uuid,
    schedule_id: Uuid,
}

async fn create_user(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, name, email) VALUES ($1, $2, $3)")
        .bind(id)
        .bind("Test Passenger")
        .bind(format!("{}@example.com", id))
        .execute(pool)
        .await
        .expect("insert user");
    id
}

/// Provisions a bus with the given seats, a route and a schedule with
/// the given per-seat fare, plus one passenger.
async fn setup_trip(pool: &PgPool, seat_labels: &[&str], fare: Decimal) -> Trip {
    let user_id = create_user(pool).await;

    let bus_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO buses (id, bus_number, bus_name, bus_type, total_seats) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(bus_id)
    .bind(format!("NS-{}", bus_id))
    .bind("Test Express")
    .bind("AC Sleeper")
    .bind(seat_labels.len().max(1) as i32)
    .execute(pool)
    .await
    .expect("insert bus");

    let route_id = Uuid::new_v4();
    sqlx::query("INSERT INTO routes (id, origin, destination, distance) VALUES ($1, $2, $3, $4)")
        .bind(route_id)
        .bind("Lisboa")
        .bind("Porto")
        .bind(Decimal::new(31000, 2))
        .execute(pool)
        .await
        .expect("insert route");

    let schedule_id = Uuid::new_v4();
    let departure = Utc::now() + Duration::days(1);
    sqlx::query(
        r#"
        INSERT INTO schedules (id, bus_id, route_id, departure_time, arrival_time, fare, travel_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(schedule_id)
    .bind(bus_id)
    .bind(route_id)
    .bind(departure)
    .bind(departure + Duration::hours(4))
    .bind(fare)
    .bind(departure.date_naive())
    .execute(pool)
    .await
    .expect("insert schedule");

    if !seat_labels.is_empty() {
        let labels: Vec<String> = seat_labels.iter().map(|s| s.to_string()).collect();
        SeatRepository::new(pool.clone())
            .create_for_bus(bus_id, &labels)
            .await
            .expect("create seats");
    }

    Trip { user_id, bus_id, schedule_id }
}

fn book_request(user_id: Uuid, schedule_id: Uuid, seats: &[&str]) -> BookTicketRequest {
    BookTicketRequest {
        user_id,
        schedule_id,
        selected_seats: seats.iter().map(|s| s.to_string()).collect(),
    }
}

async fn available_labels(pool: &PgPool, bus_id: Uuid) -> Vec<String> {
    SeatRepository::new(pool.clone())
        .find_available_by_bus(bus_id)
        .await
        .expect("list available")
        .into_iter()
        .map(|s| s.seat_number)
        .collect()
}

#[tokio::test]
async fn test_booking_two_seats_locks_fare_and_claims_exactly_those_seats() {
    let Some(pool) = try_pool().await else { return };
    let trip = setup_trip(&pool, &["A1", "A2", "A3"], Decimal::new(10000, 2)).await;
    let service = BookingService::new(pool.clone());

    let booking = service
        .book(book_request(trip.user_id, trip.schedule_id, &["A1", "A2"]))
        .await
        .expect("booking succeeds");

    assert_eq!(booking.total_fare, Decimal::new(20000, 2));
    assert_eq!(booking.status, "confirmed");
    assert_eq!(booking.reserved_seats, vec!["A1".to_string(), "A2".to_string()]);

    // A1/A2 claimed and linked, A3 untouched
    let seats = SeatRepository::new(pool.clone())
        .find_by_bus(trip.bus_id)
        .await
        .unwrap();
    for seat in &seats {
        if seat.seat_number == "A3" {
            assert!(seat.is_available);
            assert!(seat.booking_id.is_none());
        } else {
            assert!(!seat.is_available);
            assert_eq!(seat.booking_id, Some(booking.booking_id));
        }
    }

    // exactly one audit entry, in booking order
    let log = service.get_seat_log(booking.booking_id).await.expect("seat log exists");
    assert_eq!(log.seats, "A1,A2");
    assert_eq!(log.bus_id, trip.bus_id);
}

#[tokio::test]
async fn test_overlapping_booking_fails_without_partial_claim() {
    let Some(pool) = try_pool().await else { return };
    let trip = setup_trip(&pool, &["A1", "A2", "A3"], Decimal::new(10000, 2)).await;
    let service = BookingService::new(pool.clone());

    service
        .book(book_request(trip.user_id, trip.schedule_id, &["A1", "A2"]))
        .await
        .expect("first booking succeeds");

    let second_user = create_user(&pool).await;
    let err = service
        .book(book_request(second_user, trip.schedule_id, &["A2", "A3"]))
        .await
        .expect_err("A2 is taken");

    match err {
        AppError::SeatsUnavailable(msg) => assert!(msg.contains("A2"), "message names the taken seat: {}", msg),
        other => panic!("expected SeatsUnavailable, got {:?}", other),
    }

    // no partial claim: A3 still available, only one booking exists
    assert_eq!(available_labels(&pool, trip.bus_id).await, vec!["A3".to_string()]);
    let bookings = service.list_by_schedule(trip.schedule_id).await.unwrap();
    assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn test_insufficient_inventory_rejected_before_row_checks() {
    let Some(pool) = try_pool().await else { return };
    let trip = setup_trip(&pool, &["A1", "A2"], Decimal::new(5000, 2)).await;
    let service = BookingService::new(pool.clone());

    let err = service
        .book(book_request(trip.user_id, trip.schedule_id, &["A1", "A2", "A3"]))
        .await
        .expect_err("only two seats exist");

    assert!(matches!(err, AppError::InsufficientInventory { requested: 3, available: 2 }));
    assert_eq!(available_labels(&pool, trip.bus_id).await.len(), 2);
}

#[tokio::test]
async fn test_cancel_releases_seats_and_is_idempotent() {
    let Some(pool) = try_pool().await else { return };
    let trip = setup_trip(&pool, &["A1", "A2", "A3"], Decimal::new(10000, 2)).await;
    let service = BookingService::new(pool.clone());

    let booking = service
        .book(book_request(trip.user_id, trip.schedule_id, &["A1", "A2"]))
        .await
        .unwrap();

    assert!(service.cancel(booking.booking_id).await.unwrap());

    // seats released, linkage cleared
    let mut labels = available_labels(&pool, trip.bus_id).await;
    labels.sort();
    assert_eq!(labels, vec!["A1".to_string(), "A2".to_string(), "A3".to_string()]);
    for seat in SeatRepository::new(pool.clone()).find_by_bus(trip.bus_id).await.unwrap() {
        assert!(seat.booking_id.is_none());
    }

    // booking row survives as cancelled, audit entry still queryable
    let cancelled = service.get_by_booking_id(booking.booking_id).await.unwrap();
    assert_eq!(cancelled.status, "cancelled");
    assert_eq!(cancelled.reserved_seats, vec!["A1".to_string(), "A2".to_string()]);
    assert!(service.get_seat_log(booking.booking_id).await.is_ok());

    // second cancel is a no-op, not a duplicate release
    assert!(!service.cancel(booking.booking_id).await.unwrap());
    let mut labels_after = available_labels(&pool, trip.bus_id).await;
    labels_after.sort();
    assert_eq!(labels_after, labels);
}

#[tokio::test]
async fn test_cancel_unknown_booking_is_noop() {
    let Some(pool) = try_pool().await else { return };
    let service = BookingService::new(pool.clone());
    assert!(!service.cancel(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_disjoint_claims_both_succeed() {
    let Some(pool) = try_pool().await else { return };
    let trip = setup_trip(&pool, &["A1", "A2", "B1", "B2"], Decimal::new(10000, 2)).await;
    let second_user = create_user(&pool).await;

    let service_a = BookingService::new(pool.clone());
    let service_b = BookingService::new(pool.clone());

    let (first, second) = futures::join!(
        service_a.book(book_request(trip.user_id, trip.schedule_id, &["A1", "A2"])),
        service_b.book(book_request(second_user, trip.schedule_id, &["B1", "B2"])),
    );

    first.expect("disjoint claim A succeeds");
    second.expect("disjoint claim B succeeds");
    assert!(available_labels(&pool, trip.bus_id).await.is_empty());
}

#[tokio::test]
async fn test_concurrent_overlapping_claims_have_one_winner() {
    let Some(pool) = try_pool().await else { return };
    let trip = setup_trip(&pool, &["A1", "A2", "A3"], Decimal::new(10000, 2)).await;
    let second_user = create_user(&pool).await;

    let service_a = BookingService::new(pool.clone());
    let service_b = BookingService::new(pool.clone());

    let (first, second) = futures::join!(
        service_a.book(book_request(trip.user_id, trip.schedule_id, &["A1", "A2"])),
        service_b.book(book_request(second_user, trip.schedule_id, &["A2", "A3"])),
    );

    let successes = [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one claimant wins the contested seat");

    // the winner claimed exactly two seats; the loser claimed nothing
    assert_eq!(available_labels(&pool, trip.bus_id).await.len(), 1);

    let contested = SeatRepository::new(pool.clone())
        .find_by_bus_and_number(trip.bus_id, "A2")
        .await
        .unwrap()
        .expect("contested seat exists");
    assert!(!contested.is_available);
    assert!(contested.booking_id.is_some());
}

#[tokio::test]
async fn test_total_fare_is_locked_in_at_booking_time() {
    let Some(pool) = try_pool().await else { return };
    let trip = setup_trip(&pool, &["A1", "A2"], Decimal::new(10000, 2)).await;
    let service = BookingService::new(pool.clone());

    let booking = service
        .book(book_request(trip.user_id, trip.schedule_id, &["A1", "A2"]))
        .await
        .unwrap();
    assert_eq!(booking.total_fare, Decimal::new(20000, 2));

    // raise the fare after booking
    ScheduleRepository::new(pool.clone())
        .update(trip.schedule_id, None, None, None, None, Some(Decimal::new(15000, 2)), None)
        .await
        .unwrap()
        .expect("schedule exists");

    let fetched = service.get_by_booking_id(booking.booking_id).await.unwrap();
    assert_eq!(fetched.total_fare, Decimal::new(20000, 2));
}

#[tokio::test]
async fn test_reconciliation_releases_orphaned_claims() {
    let Some(pool) = try_pool().await else { return };
    let trip = setup_trip(&pool, &["A1", "A2"], Decimal::new(10000, 2)).await;

    // simulate a claim stranded by a crash: unavailable, no owning booking
    sqlx::query("UPDATE seats SET is_available = FALSE WHERE bus_id = $1 AND seat_number = 'A1'")
        .bind(trip.bus_id)
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(available_labels(&pool, trip.bus_id).await, vec!["A2".to_string()]);

    let released = SeatAllocator::new(pool.clone()).release_orphaned().await.unwrap();
    assert!(released >= 1);

    let mut labels = available_labels(&pool, trip.bus_id).await;
    labels.sort();
    assert_eq!(labels, vec!["A1".to_string(), "A2".to_string()]);
}

#[tokio::test]
async fn test_reconciliation_keeps_live_claims() {
    let Some(pool) = try_pool().await else { return };
    let trip = setup_trip(&pool, &["A1", "A2"], Decimal::new(10000, 2)).await;
    let service = BookingService::new(pool.clone());

    let booking = service
        .book(book_request(trip.user_id, trip.schedule_id, &["A1"]))
        .await
        .unwrap();

    SeatAllocator::new(pool.clone()).release_orphaned().await.unwrap();

    let seat = SeatRepository::new(pool.clone())
        .find_by_bus_and_number(trip.bus_id, "A1")
        .await
        .unwrap()
        .unwrap();
    assert!(!seat.is_available, "confirmed claim must survive the sweep");
    assert_eq!(seat.booking_id, Some(booking.booking_id));
}

#[tokio::test]
async fn test_list_queries_return_empty_for_unknown_parents() {
    let Some(pool) = try_pool().await else { return };
    let service = BookingService::new(pool.clone());

    assert!(service.list_by_user(Uuid::new_v4()).await.unwrap().is_empty());
    assert!(service.list_by_schedule(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_unknown_schedule_or_user_is_not_found() {
    let Some(pool) = try_pool().await else { return };
    let trip = setup_trip(&pool, &["A1"], Decimal::new(10000, 2)).await;
    let service = BookingService::new(pool.clone());

    let err = service
        .book(book_request(trip.user_id, Uuid::new_v4(), &["A1"]))
        .await
        .expect_err("unknown schedule");
    assert!(matches!(err, AppError::NotFound(_)));

    let err = service
        .book(book_request(Uuid::new_v4(), trip.schedule_id, &["A1"]))
        .await
        .expect_err("unknown user");
    assert!(matches!(err, AppError::NotFound(_)));

    // nothing was claimed by the failed attempts
    assert_eq!(available_labels(&pool, trip.bus_id).await, vec!["A1".to_string()]);
}
