//! Shared wiring for the booking integration suites.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use chrono::{Days, NaiveDate, NaiveTime};
use serde_json::Value;

use medbook::Trace;
use medbook::domain::{Account, BookingPorts, UserId};
use medbook::inbound::http::access::USER_ID_HEADER;
use medbook::inbound::http::configure_api;
use medbook::inbound::http::state::HttpState;
use medbook::outbound::cache::InMemoryScheduleCache;
use medbook::outbound::memory::InMemoryBookingStore;
use medbook::outbound::notifications::RecordingNotificationDispatcher;
use medbook::test_support::{MutableClock, admin, client, doctor};

/// Fixed "today" for every suite.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 10).expect("valid date")
}

pub fn days_from_today(days: u64) -> NaiveDate {
    today()
        .checked_add_days(Days::new(days))
        .expect("date in range")
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

/// In-memory booking world with a few well-known accounts.
pub struct World {
    pub store: Arc<InMemoryBookingStore>,
    pub notifier: Arc<RecordingNotificationDispatcher>,
    pub clock: Arc<MutableClock>,
    pub ports: BookingPorts,
    pub alice: Account,
    pub bob: Account,
    pub house: Account,
    pub admin: Account,
}

impl World {
    pub fn new() -> Self {
        let alice = client("Alice Client");
        let bob = client("Bob Client");
        let house = doctor("Gregory House", "Diagnostics");
        let admin = admin("Root Admin");
        let store = Arc::new(InMemoryBookingStore::with_accounts([
            alice.clone(),
            bob.clone(),
            house.clone(),
            admin.clone(),
        ]));
        let notifier = Arc::new(RecordingNotificationDispatcher::new());
        let clock = Arc::new(MutableClock::at_morning_of(today()));
        let ports = BookingPorts {
            accounts: store.clone(),
            availability: store.clone(),
            reservations: store.clone(),
            revocations: store.clone(),
            cache: Arc::new(InMemoryScheduleCache::new(Duration::from_secs(600))),
            notifier: notifier.clone(),
            clock: clock.clone(),
        };
        Self {
            store,
            notifier,
            clock,
            ports,
            alice,
            bob,
            house,
            admin,
        }
    }

    /// Messages delivered to `recipient`, oldest first.
    pub fn messages_for(&self, recipient: UserId) -> Vec<String> {
        self.notifier
            .sent()
            .into_iter()
            .filter(|n| n.recipient == recipient)
            .map(|n| n.event.message())
            .collect()
    }

    /// Send `request` as `caller` through the `/api/v1` surface.
    pub async fn call(&self, caller: &Account, request: TestRequest) -> (StatusCode, Value) {
        self.call_raw(request.insert_header((USER_ID_HEADER, caller.id.to_string())))
            .await
    }

    /// Send `request` without adding an identity header.
    pub async fn call_raw(&self, request: TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::from_ports(self.ports.clone())))
                .wrap(Trace)
                .service(web::scope("/api/v1").configure(configure_api)),
        )
        .await;
        let res = test::call_service(&app, request.to_request()).await;
        let status = res.status();
        let bytes = test::read_body(res).await;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}
