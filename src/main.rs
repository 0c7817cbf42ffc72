pub mod availability;
pub mod bookings;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod schedule;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use validator::Validate;

use availability::AvailabilityService;
use bookings::{BookingService, BookingsRepository};
use clock::{SharedClock, SystemClock};
use config::AppConfig;
use db::DbPool;
use error::ApiError;
use models::{CreateCustomer, CreateFacility, Customer, Facility, UpdateFacility};
use schedule::ScheduleRepository;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        create_facility,
        get_all_facilities,
        get_facility_by_id,
        update_facility,
        delete_facility,
        create_customer,
        get_customer_by_id,
        schedule::handlers::set_operating_hours_handler,
        schedule::handlers::get_operating_hours_handler,
        schedule::handlers::create_time_block_handler,
        schedule::handlers::get_time_blocks_handler,
        schedule::handlers::delete_time_block_handler,
        availability::handlers::check_availability_handler,
        availability::handlers::search_availability_handler,
        availability::handlers::day_schedule_handler,
        bookings::handlers::create_booking_handler,
        bookings::handlers::get_booking_handler,
        bookings::handlers::list_bookings_handler,
        bookings::handlers::update_booking_handler,
        bookings::handlers::cancel_booking_handler,
    ),
    components(
        schemas(
            Facility,
            CreateFacility,
            UpdateFacility,
            models::SportType,
            Customer,
            CreateCustomer,
            schedule::OperatingHours,
            schedule::OperatingHoursItem,
            schedule::SetOperatingHoursRequest,
            schedule::BlockType,
            schedule::TimeBlock,
            schedule::CreateTimeBlock,
            availability::AvailabilityConflictType,
            availability::TimeSlot,
            availability::TimeSlotStatus,
            availability::AvailableFacilityItem,
            availability::handlers::CheckAvailabilityResponse,
            availability::handlers::SearchAvailabilityResponse,
            availability::handlers::DayScheduleResponse,
            bookings::Booking,
            bookings::BookingStatus,
            bookings::BookingType,
            bookings::CancellationResult,
            bookings::CreateBookingRequest,
            bookings::UpdateBookingRequest,
            bookings::CancelBookingResponse,
        )
    ),
    tags(
        (name = "facilities", description = "Facility management endpoints"),
        (name = "customers", description = "Customer registration endpoints"),
        (name = "schedule", description = "Operating hours and time block administration"),
        (name = "availability", description = "Availability checks, searches, and day schedules"),
        (name = "bookings", description = "Booking lifecycle endpoints")
    ),
    info(
        title = "Sports Center API",
        version = "1.0.0",
        description = "RESTful API for facility availability and booking management"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub schedule_repo: ScheduleRepository,
    pub bookings_repo: BookingsRepository,
    pub availability: AvailabilityService,
    pub booking_service: BookingService,
    pub clock: SharedClock,
}

/// Handler for POST /api/facilities
/// Creates a new bookable facility
#[utoipa::path(
    post,
    path = "/api/facilities",
    request_body = CreateFacility,
    responses(
        (status = 201, description = "Facility created successfully", body = Facility),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Facility name already taken")
    ),
    tag = "facilities"
)]
async fn create_facility(
    State(state): State<AppState>,
    Json(payload): Json<CreateFacility>,
) -> Result<(StatusCode, Json<Facility>), ApiError> {
    tracing::debug!("Creating new facility: {}", payload.name);

    payload.validate()?;

    if payload.min_booking_duration_minutes > payload.max_booking_duration_minutes {
        return Err(ApiError::BadRequest(
            "Minimum booking duration must not exceed maximum".to_string(),
        ));
    }

    if db::check_duplicate_facility(&state.db, &payload.name).await? {
        tracing::warn!("Attempt to create duplicate facility: {}", payload.name);
        return Err(ApiError::Conflict {
            message: format!("Facility with name '{}' already exists", payload.name),
        });
    }

    let facility = sqlx::query_as::<_, Facility>(
        r#"
        INSERT INTO facilities
            (name, sport_type, max_players, price_per_hour, is_active,
             min_booking_duration_minutes, max_booking_duration_minutes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, name, sport_type, max_players, price_per_hour, is_active,
                  min_booking_duration_minutes, max_booking_duration_minutes
        "#,
    )
    .bind(&payload.name)
    .bind(payload.sport_type)
    .bind(payload.max_players)
    .bind(payload.price_per_hour)
    .bind(payload.is_active)
    .bind(payload.min_booking_duration_minutes)
    .bind(payload.max_booking_duration_minutes)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Successfully created facility with id: {}", facility.id);
    Ok((StatusCode::CREATED, Json(facility)))
}

/// Handler for GET /api/facilities
#[utoipa::path(
    get,
    path = "/api/facilities",
    responses(
        (status = 200, description = "List of all facilities", body = Vec<Facility>)
    ),
    tag = "facilities"
)]
async fn get_all_facilities(State(state): State<AppState>) -> Result<Json<Vec<Facility>>, ApiError> {
    let facilities = sqlx::query_as::<_, Facility>(
        r#"
        SELECT id, name, sport_type, max_players, price_per_hour, is_active,
               min_booking_duration_minutes, max_booking_duration_minutes
        FROM facilities
        ORDER BY id
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    tracing::debug!("Retrieved {} facilities", facilities.len());
    Ok(Json(facilities))
}

/// Handler for GET /api/facilities/:id
#[utoipa::path(
    get,
    path = "/api/facilities/{id}",
    params(("id" = i32, Path, description = "Facility ID")),
    responses(
        (status = 200, description = "Facility found", body = Facility),
        (status = 404, description = "Facility not found")
    ),
    tag = "facilities"
)]
async fn get_facility_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Facility>, ApiError> {
    let facility = availability::fetch_facility(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Facility".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(facility))
}

/// Handler for PUT /api/facilities/:id
/// Updates a facility; omitted fields keep their current values
#[utoipa::path(
    put,
    path = "/api/facilities/{id}",
    params(("id" = i32, Path, description = "Facility ID")),
    request_body = UpdateFacility,
    responses(
        (status = 200, description = "Facility updated successfully", body = Facility),
        (status = 400, description = "Invalid input data"),
        (status = 404, description = "Facility not found"),
        (status = 409, description = "Facility name already taken")
    ),
    tag = "facilities"
)]
async fn update_facility(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFacility>,
) -> Result<Json<Facility>, ApiError> {
    tracing::debug!("Updating facility with id: {}", id);

    payload.validate()?;

    // Transaction keeps the read-merge-write atomic
    let mut tx = state.db.begin().await?;

    let existing = sqlx::query_as::<_, Facility>(
        r#"
        SELECT id, name, sport_type, max_players, price_per_hour, is_active,
               min_booking_duration_minutes, max_booking_duration_minutes
        FROM facilities
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Facility".to_string(),
        id: id.to_string(),
    })?;

    if let Some(ref new_name) = payload.name {
        if new_name != &existing.name
            && db::check_duplicate_facility_excluding_id(&state.db, new_name, id).await?
        {
            tracing::warn!("Attempt to rename facility {} to duplicate name: {}", id, new_name);
            return Err(ApiError::Conflict {
                message: format!("Facility with name '{}' already exists", new_name),
            });
        }
    }

    let min_duration = payload
        .min_booking_duration_minutes
        .unwrap_or(existing.min_booking_duration_minutes);
    let max_duration = payload
        .max_booking_duration_minutes
        .unwrap_or(existing.max_booking_duration_minutes);
    if min_duration > max_duration {
        return Err(ApiError::BadRequest(
            "Minimum booking duration must not exceed maximum".to_string(),
        ));
    }

    let updated = sqlx::query_as::<_, Facility>(
        r#"
        UPDATE facilities
        SET name = $1,
            sport_type = $2,
            max_players = $3,
            price_per_hour = $4,
            is_active = $5,
            min_booking_duration_minutes = $6,
            max_booking_duration_minutes = $7
        WHERE id = $8
        RETURNING id, name, sport_type, max_players, price_per_hour, is_active,
                  min_booking_duration_minutes, max_booking_duration_minutes
        "#,
    )
    .bind(payload.name.unwrap_or(existing.name))
    .bind(payload.sport_type.unwrap_or(existing.sport_type))
    .bind(payload.max_players.unwrap_or(existing.max_players))
    .bind(payload.price_per_hour.unwrap_or(existing.price_per_hour))
    .bind(payload.is_active.unwrap_or(existing.is_active))
    .bind(min_duration)
    .bind(max_duration)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Successfully updated facility with id: {}", id);
    Ok(Json(updated))
}

/// Handler for DELETE /api/facilities/:id
/// Deactivates the facility; booking history stays intact
#[utoipa::path(
    delete,
    path = "/api/facilities/{id}",
    params(("id" = i32, Path, description = "Facility ID")),
    responses(
        (status = 204, description = "Facility deactivated"),
        (status = 404, description = "Facility not found")
    ),
    tag = "facilities"
)]
async fn delete_facility(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("UPDATE facilities SET is_active = FALSE WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound {
            resource: "Facility".to_string(),
            id: id.to_string(),
        });
    }

    tracing::info!("Deactivated facility with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomer,
    responses(
        (status = 201, description = "Customer registered", body = Customer),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Email already registered")
    ),
    tag = "customers"
)]
async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    payload.validate()?;

    let email_taken: Option<bool> =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE email = $1)")
            .bind(&payload.email)
            .fetch_one(&state.db)
            .await?;
    if email_taken.unwrap_or(false) {
        return Err(ApiError::Conflict {
            message: format!("Customer with email '{}' already exists", payload.email),
        });
    }

    // The existence check above races with concurrent registrations; the
    // unique constraint is the authority
    let customer = sqlx::query_as::<_, Customer>(
        r#"
        INSERT INTO customers (first_name, last_name, email)
        VALUES ($1, $2, $3)
        RETURNING id, first_name, last_name, email
        "#,
    )
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            ApiError::Conflict {
                message: format!("Customer with email '{}' already exists", payload.email),
            }
        } else {
            ApiError::DatabaseError(e)
        }
    })?;

    tracing::info!("Registered customer with id: {}", customer.id);
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Handler for GET /api/customers/:id
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer found", body = Customer),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers"
)]
async fn get_customer_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Customer>, ApiError> {
    let customer = sqlx::query_as::<_, Customer>(
        "SELECT id, first_name, last_name, email FROM customers WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Customer".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(customer))
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(db: DbPool, config: &AppConfig) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let clock: SharedClock = Arc::new(SystemClock);
    let state = AppState {
        db: db.clone(),
        schedule_repo: ScheduleRepository::new(db.clone()),
        bookings_repo: BookingsRepository::new(db.clone()),
        availability: AvailabilityService::new(db.clone()),
        booking_service: BookingService::new(
            db,
            clock.clone(),
            config.cancellation_cutoff_minutes,
        ),
        clock,
    };

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Facility administration
        .route("/api/facilities", post(create_facility))
        .route("/api/facilities", get(get_all_facilities))
        .route("/api/facilities/:id", get(get_facility_by_id))
        .route("/api/facilities/:id", put(update_facility))
        .route("/api/facilities/:id", delete(delete_facility))
        // Customers
        .route("/api/customers", post(create_customer))
        .route("/api/customers/:id", get(get_customer_by_id))
        // Schedule administration
        .route(
            "/api/facilities/:id/operating-hours",
            put(schedule::set_operating_hours_handler),
        )
        .route(
            "/api/facilities/:id/operating-hours",
            get(schedule::get_operating_hours_handler),
        )
        .route(
            "/api/facilities/:id/time-blocks",
            post(schedule::create_time_block_handler),
        )
        .route(
            "/api/facilities/:id/time-blocks",
            get(schedule::get_time_blocks_handler),
        )
        .route("/api/time-blocks/:id", delete(schedule::delete_time_block_handler))
        // Availability
        .route(
            "/api/availability/check",
            get(availability::check_availability_handler),
        )
        .route(
            "/api/availability/search",
            get(availability::search_availability_handler),
        )
        .route("/api/facilities/:id/slots", get(availability::day_schedule_handler))
        // Bookings
        .route("/api/bookings", post(bookings::create_booking_handler))
        .route("/api/bookings", get(bookings::list_bookings_handler))
        .route("/api/bookings/:id", get(bookings::get_booking_handler))
        .route("/api/bookings/:id", put(bookings::update_booking_handler))
        .route("/api/bookings/:id/cancel", post(bookings::cancel_booking_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Sports Center API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Create the application router
    let app = create_router(db_pool, &config);

    // Start the Axum server
    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Sports Center API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
