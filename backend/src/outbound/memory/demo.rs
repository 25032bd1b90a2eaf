//! Demo accounts provisioned into the in-memory store on start-up.
//!
//! Ids are fixed so a local client can put them in `x-user-id` straight
//! away.

use uuid::Uuid;

use crate::domain::{Account, Role, Specialization, UserId};

/// Client account id.
pub const DEMO_CLIENT_ID: Uuid = Uuid::from_u128(0x6d65_6462_6f6f_4b00_8000_0000_0000_0001);
/// Administrator account id.
pub const DEMO_ADMIN_ID: Uuid = Uuid::from_u128(0x6d65_6462_6f6f_4b00_8000_0000_0000_0002);
/// Doctor account id.
pub const DEMO_DOCTOR_ID: Uuid = Uuid::from_u128(0x6d65_6462_6f6f_4b00_8000_0000_0000_0003);

fn account(id: Uuid, name: &str, email: &str, role: Role) -> Account {
    Account {
        id: UserId::from_uuid(id),
        name: name.to_owned(),
        email: email.to_owned(),
        role,
        specialization: None,
    }
}

/// A client, an administrator and a cardiologist.
pub fn demo_accounts() -> Vec<Account> {
    let mut doctor = account(DEMO_DOCTOR_ID, "Doctor", "doctor@example.com", Role::Doctor);
    doctor.specialization = Specialization::new("Cardiologist").ok();
    vec![
        account(DEMO_CLIENT_ID, "Test User", "test@example.com", Role::Client),
        account(DEMO_ADMIN_ID, "Admin", "admin@example.com", Role::Admin),
        doctor,
    ]
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn one_account_per_role() {
        let accounts = demo_accounts();
        for role in [Role::Client, Role::Admin, Role::Doctor] {
            assert_eq!(accounts.iter().filter(|a| a.role == role).count(), 1);
        }
    }

    #[rstest]
    fn demo_doctor_is_bookable() {
        let accounts = demo_accounts();
        let doctor = accounts
            .iter()
            .find(|a| a.id == UserId::from_uuid(DEMO_DOCTOR_ID))
            .expect("doctor present");
        assert!(doctor.is_doctor());
        assert_eq!(doctor.specialization_label().as_deref(), Some("Cardiologist"));
    }
}
