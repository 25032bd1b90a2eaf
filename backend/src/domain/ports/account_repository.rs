//! Port for account lookup and role changes.

use async_trait::async_trait;

use crate::domain::{Account, Role, Specialization, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// A stored row could not be turned into an [`Account`].
        Corrupt { message: String } =>
            "stored account is invalid: {message}",
    }
}

/// Read and update access to provisioned accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Replace the account's role and specialisation.
    ///
    /// Returns `false` when no such account exists.
    async fn update_role(
        &self,
        id: &UserId,
        role: Role,
        specialization: Option<Specialization>,
    ) -> Result<bool, AccountRepositoryError>;

    /// Doctors with at least one published window, ordered by name.
    async fn list_doctors_with_availability(&self) -> Result<Vec<Account>, AccountRepositoryError>;
}
