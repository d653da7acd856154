//! Persistence for check-in windows.
//!
//! Every call is scoped by `company_id`; a window owned by another company is
//! indistinguishable from a missing one.

use async_trait::async_trait;

use crate::error::WindowError;
use crate::model::check_in_window::{CheckInWindow, WindowDraft};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub use mysql::MySqlWindowStore;

#[async_trait]
pub trait WindowStore: Send + Sync {
    async fn insert(
        &self,
        company_id: u64,
        draft: &WindowDraft,
    ) -> Result<CheckInWindow, WindowError>;

    /// Ordered by `start_time`, then `id`.
    async fn list(
        &self,
        company_id: u64,
        active_only: bool,
    ) -> Result<Vec<CheckInWindow>, WindowError>;

    async fn find(&self, company_id: u64, id: u64) -> Result<Option<CheckInWindow>, WindowError>;

    /// Overwrites every mutable column. `None` when the window does not exist.
    async fn replace(
        &self,
        company_id: u64,
        id: u64,
        draft: &WindowDraft,
    ) -> Result<Option<CheckInWindow>, WindowError>;

    /// `false` when nothing was deleted.
    async fn delete(&self, company_id: u64, id: u64) -> Result<bool, WindowError>;
}
