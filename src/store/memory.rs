use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::WindowStore;
use crate::error::WindowError;
use crate::model::check_in_window::{CheckInWindow, WindowDraft};

/// In-process store for tests. Ids are never reused, like AUTO_INCREMENT.
#[derive(Default)]
pub struct MemoryWindowStore {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    windows: Vec<CheckInWindow>,
    last_id: u64,
}

#[async_trait]
impl WindowStore for MemoryWindowStore {
    async fn insert(
        &self,
        company_id: u64,
        draft: &WindowDraft,
    ) -> Result<CheckInWindow, WindowError> {
        let mut state = self.state.write().expect("window store poisoned");
        state.last_id += 1;
        let id = state.last_id;
        let now = Utc::now();

        let window = CheckInWindow {
            id,
            company_id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            start_time: draft.start_time,
            end_time: draft.end_time,
            days_of_week: draft.days_of_week.clone(),
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        };
        state.windows.push(window.clone());
        Ok(window)
    }

    async fn list(
        &self,
        company_id: u64,
        active_only: bool,
    ) -> Result<Vec<CheckInWindow>, WindowError> {
        let state = self.state.read().expect("window store poisoned");
        let mut found: Vec<_> = state
            .windows
            .iter()
            .filter(|w| w.company_id == company_id && (!active_only || w.is_active))
            .cloned()
            .collect();
        found.sort_by_key(|w| (w.start_time, w.id));
        Ok(found)
    }

    async fn find(&self, company_id: u64, id: u64) -> Result<Option<CheckInWindow>, WindowError> {
        let state = self.state.read().expect("window store poisoned");
        Ok(state
            .windows
            .iter()
            .find(|w| w.id == id && w.company_id == company_id)
            .cloned())
    }

    async fn replace(
        &self,
        company_id: u64,
        id: u64,
        draft: &WindowDraft,
    ) -> Result<Option<CheckInWindow>, WindowError> {
        let mut state = self.state.write().expect("window store poisoned");
        let Some(window) = state
            .windows
            .iter_mut()
            .find(|w| w.id == id && w.company_id == company_id)
        else {
            return Ok(None);
        };

        window.name = draft.name.clone();
        window.description = draft.description.clone();
        window.start_time = draft.start_time;
        window.end_time = draft.end_time;
        window.days_of_week = draft.days_of_week.clone();
        window.is_active = draft.is_active;
        window.updated_at = Utc::now();
        Ok(Some(window.clone()))
    }

    async fn delete(&self, company_id: u64, id: u64) -> Result<bool, WindowError> {
        let mut state = self.state.write().expect("window store poisoned");
        let before = state.windows.len();
        state
            .windows
            .retain(|w| !(w.id == id && w.company_id == company_id));
        Ok(state.windows.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::check_in_window::DaysOfWeek;

    fn draft(name: &str) -> WindowDraft {
        WindowDraft {
            name: name.to_string(),
            description: None,
            start_time: "08:00".parse().unwrap(),
            end_time: "10:00".parse().unwrap(),
            days_of_week: DaysOfWeek::from_indices([1]).unwrap(),
            is_active: true,
        }
    }

    #[actix_web::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryWindowStore::default();
        let first = store.insert(1, &draft("First")).await.unwrap();
        let second = store.insert(1, &draft("Second")).await.unwrap();

        assert!(store.delete(1, second.id).await.unwrap());
        let third = store.insert(1, &draft("Third")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
        assert!(store.find(1, second.id).await.unwrap().is_none());
    }
}
