use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::evaluator::{self, CheckInDecision};
use crate::error::WindowError;
use crate::model::check_in_window::{
    CheckInWindow, ClockTime, CreateCheckInWindow, DaysOfWeek, UpdateCheckInWindow, WindowDraft,
};
use crate::store::WindowStore;

/// Registry and evaluator of a company's recurring check-in windows.
#[derive(Clone)]
pub struct CheckInWindowService {
    store: Arc<dyn WindowStore>,
}

impl CheckInWindowService {
    pub fn new(store: Arc<dyn WindowStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        company_id: u64,
        input: CreateCheckInWindow,
    ) -> Result<CheckInWindow, WindowError> {
        let start_time = parse_time("start_time", &input.start_time)?;
        let end_time = parse_time("end_time", &input.end_time)?;
        ensure_ordered(start_time, end_time)?;

        let draft = WindowDraft {
            name: validate_name(input.name)?,
            description: input.description,
            start_time,
            end_time,
            days_of_week: parse_days(input.days_of_week)?,
            is_active: input.is_active.unwrap_or(true),
        };

        let window = self.store.insert(company_id, &draft).await?;
        info!(company_id, window_id = window.id, name = %window.name, "Check-in window created");
        Ok(window)
    }

    pub async fn list(
        &self,
        company_id: u64,
        active_only: bool,
    ) -> Result<Vec<CheckInWindow>, WindowError> {
        let mut windows = self.store.list(company_id, active_only).await?;
        windows.sort_by_key(|w| (w.start_time, w.id));
        Ok(windows)
    }

    /// Applies the supplied fields, then re-checks the resulting start/end pair.
    pub async fn update(
        &self,
        company_id: u64,
        window_id: u64,
        input: UpdateCheckInWindow,
    ) -> Result<CheckInWindow, WindowError> {
        let current = self
            .store
            .find(company_id, window_id)
            .await?
            .ok_or(WindowError::NotFound(window_id))?;
        let mut draft = WindowDraft::from(current);

        if let Some(start) = input.start_time {
            draft.start_time = parse_time("start_time", &start)?;
        }
        if let Some(end) = input.end_time {
            draft.end_time = parse_time("end_time", &end)?;
        }
        ensure_ordered(draft.start_time, draft.end_time)?;

        if let Some(name) = input.name {
            draft.name = validate_name(name)?;
        }
        if let Some(description) = input.description {
            draft.description = description;
        }
        if let Some(days) = input.days_of_week {
            draft.days_of_week = parse_days(days)?;
        }
        if let Some(is_active) = input.is_active {
            draft.is_active = is_active;
        }

        let window = self
            .store
            .replace(company_id, window_id, &draft)
            .await?
            .ok_or(WindowError::NotFound(window_id))?;
        info!(company_id, window_id, "Check-in window updated");
        Ok(window)
    }

    pub async fn remove(&self, company_id: u64, window_id: u64) -> Result<(), WindowError> {
        if !self.store.delete(company_id, window_id).await? {
            return Err(WindowError::NotFound(window_id));
        }
        info!(company_id, window_id, "Check-in window deleted");
        Ok(())
    }

    /// `now` is server-local wall-clock time.
    pub async fn evaluate(
        &self,
        company_id: u64,
        now: NaiveDateTime,
    ) -> Result<CheckInDecision, WindowError> {
        let windows = self.list(company_id, true).await?;
        let decision = evaluator::evaluate(&windows, now);

        debug!(
            company_id,
            %now,
            candidates = windows.len(),
            allowed = decision.allowed,
            "Evaluated check-in window"
        );
        Ok(decision)
    }
}

fn parse_time(field: &str, raw: &str) -> Result<ClockTime, WindowError> {
    raw.parse()
        .map_err(|e| WindowError::Validation(format!("Invalid {field}: {e}")))
}

fn ensure_ordered(start: ClockTime, end: ClockTime) -> Result<(), WindowError> {
    if end <= start {
        return Err(WindowError::Validation(format!(
            "end_time ({end}) must be later than start_time ({start})"
        )));
    }
    Ok(())
}

fn validate_name(name: String) -> Result<String, WindowError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(WindowError::Validation("name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

fn parse_days(days: Vec<i64>) -> Result<DaysOfWeek, WindowError> {
    DaysOfWeek::from_indices(days).map_err(WindowError::Validation)
}
