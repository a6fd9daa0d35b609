//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use chrono::{Duration, Utc};
use desk_server::db::{DbService, SeedData};
use desk_server::{Config, Server, ServerState};
use http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::{
    Appointment, AppointmentStatus, Customer, CustomerStatus, CustomerType, RequestStatus,
    RequestType, Role, ServiceRequest, User,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

pub const TEST_SECRET: &str = "integration-test-secret-with-at-least-32-chars";

pub const ADMIN: (i64, &str, &str) = (1, "alice", "Admin");
pub const MANAGER: (i64, &str, &str) = (2, "bob", "manager");
pub const STAFF: (i64, &str, &str) = (3, "carol", "staff");
pub const ANALYST: (i64, &str, &str) = (4, "dave", "analyst");
pub const DISABLED: (i64, &str, &str) = (5, "erin", "manager");

fn millis_days_ago(days: i64) -> i64 {
    (Utc::now() - Duration::days(days)).timestamp_millis()
}

fn customer(id: i64, days_ago: i64, status: CustomerStatus, kind: Option<CustomerType>) -> Customer {
    let created_at = millis_days_ago(days_ago);
    Customer {
        id,
        name: format!("Customer {id}"),
        email: None,
        phone: None,
        status,
        customer_type: kind,
        created_at,
        updated_at: created_at,
    }
}

fn request(id: i64, days_ago: i64, status: RequestStatus, customer_id: Option<i64>) -> ServiceRequest {
    let created_at = millis_days_ago(days_ago);
    ServiceRequest {
        id,
        title: format!("Request {id}"),
        contact_name: "Contact".into(),
        contact_email: None,
        status,
        request_type: Some(RequestType::Quote),
        customer_id,
        created_at,
        updated_at: created_at,
    }
}

fn appointment(id: i64, date: &str, status: AppointmentStatus, customer_id: Option<i64>) -> Appointment {
    Appointment {
        id,
        title: format!("Appointment {id}"),
        appointment_date: date.into(),
        status,
        customer_id,
        created_at: millis_days_ago(0),
    }
}

fn user(account: (i64, &str, &str), is_active: bool) -> User {
    User {
        id: account.0,
        username: account.1.into(),
        role: account.2.into(),
        permissions: vec![],
        is_active,
    }
}

/// Three customers and two requests in the current month, plus one record of
/// each kind far outside any default window.
pub fn seed() -> SeedData {
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();

    SeedData {
        roles: vec![Role {
            name: "analyst".into(),
            description: Some("Statistics only".into()),
            permissions: vec!["statistics:view".into()],
            is_system: false,
        }],
        users: vec![
            user(ADMIN, true),
            user(MANAGER, true),
            user(STAFF, true),
            user(ANALYST, true),
            user(DISABLED, false),
        ],
        customers: vec![
            customer(1, 0, CustomerStatus::Active, Some(CustomerType::Business)),
            customer(2, 0, CustomerStatus::Active, Some(CustomerType::Individual)),
            customer(3, 0, CustomerStatus::Inactive, None),
            customer(4, 3 * 365, CustomerStatus::Active, None),
        ],
        requests: vec![
            request(1, 0, RequestStatus::Converted, Some(1)),
            request(2, 0, RequestStatus::New, None),
            request(3, 3 * 365, RequestStatus::Closed, None),
        ],
        appointments: vec![
            appointment(1, &today, AppointmentStatus::Scheduled, Some(1)),
            appointment(2, &today, AppointmentStatus::Completed, None),
            appointment(3, "", AppointmentStatus::Scheduled, None),
            appointment(4, "not a date", AppointmentStatus::Cancelled, None),
        ],
    }
}

pub struct TestApp {
    pub state: ServerState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::for_testing(TEST_SECRET))
    }

    pub fn with_config(config: Config) -> Self {
        let state = ServerState::new(config, DbService::from_seed(seed()));
        let router = Server::build_router(&state);
        Self { state, router }
    }

    pub fn token_for(&self, user: (i64, &str, &str)) -> String {
        self.state
            .jwt_service
            .generate_token(user.0, user.1, user.2)
            .expect("token generation")
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).expect("request")).await
    }

    pub async fn post_json(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response: Response<Body> = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }
}

/// Counts events on the `security` target
#[derive(Clone, Default)]
pub struct SecurityEvents(Arc<AtomicUsize>);

impl SecurityEvents {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: tracing::Subscriber> Layer<S> for SecurityEvents {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() == "security" {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}
