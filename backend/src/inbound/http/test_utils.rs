//! Mock-backed HTTP state for handler tests.

use std::sync::Arc;

use crate::domain::Account;
use crate::domain::ports::{
    MockAccountRepository, MockAvailabilityCommand, MockDoctorRoleCommand, MockReservationCommand,
    MockScheduleQuery,
};
use crate::inbound::http::state::HttpState;

/// One mock per driving port, plus the account lookup used by the gate.
#[derive(Default)]
pub(crate) struct StateMocks {
    pub schedule: MockScheduleQuery,
    pub availability: MockAvailabilityCommand,
    pub reservations: MockReservationCommand,
    pub doctor_roles: MockDoctorRoleCommand,
    pub accounts: MockAccountRepository,
}

impl StateMocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Let `account` through the access gate.
    pub(crate) fn signed_in(mut self, account: &Account) -> Self {
        let expected = account.id;
        let stored = account.clone();
        self.accounts
            .expect_find_by_id()
            .withf(move |id| *id == expected)
            .returning(move |_| Ok(Some(stored.clone())));
        self
    }

    pub(crate) fn into_state(self) -> HttpState {
        HttpState {
            schedule: Arc::new(self.schedule),
            availability: Arc::new(self.availability),
            reservations: Arc::new(self.reservations),
            doctor_roles: Arc::new(self.doctor_roles),
            accounts: Arc::new(self.accounts),
        }
    }
}

pub(crate) fn state_with_accounts(accounts: MockAccountRepository) -> HttpState {
    StateMocks {
        accounts,
        ..StateMocks::default()
    }
    .into_state()
}

/// Run `request` against the full `/api/v1` surface backed by `mocks`.
pub(crate) async fn send(
    mocks: StateMocks,
    request: actix_web::test::TestRequest,
) -> (actix_web::http::StatusCode, serde_json::Value) {
    use actix_web::{App, test, web};

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(mocks.into_state()))
            .service(web::scope("/api/v1").configure(super::configure_api)),
    )
    .await;
    let res = test::call_service(&app, request.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}
