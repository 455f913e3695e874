// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side activity store.
//!
//! Caches activity records fetched from the API and tracks the UI flags
//! (loading, submitting, selection, edit mode) that views render from.
//!
//! State lives in a `watch` channel. Every mutation goes through a single
//! `send_modify` call, so subscribers only ever observe complete snapshots:
//! the result of an API call and the reset of its busy flag are published
//! together.
//!
//! Selection is cache-first: `load_activity` serves a cached record without
//! a network call and falls back to a detail fetch on a miss.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use tokio::sync::watch;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::Activity;
use crate::services::ActivityApi;
use crate::time_utils::{date_key, parse_timestamp};

/// Network-backed store actions, used to tag failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreAction {
    LoadActivities,
    LoadActivity,
    CreateActivity,
    EditActivity,
    DeleteActivity,
}

impl fmt::Display for StoreAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreAction::LoadActivities => "load_activities",
            StoreAction::LoadActivity => "load_activity",
            StoreAction::CreateActivity => "create_activity",
            StoreAction::EditActivity => "edit_activity",
            StoreAction::DeleteActivity => "delete_activity",
        };
        f.write_str(name)
    }
}

/// Most recent failure, kept for views that want to show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFailure {
    pub action: StoreAction,
    pub message: String,
}

/// Observable store state. Cloned out as a snapshot for readers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Activity id -> record, in first-fetch order. The only copy of
    /// cached data.
    pub registry: IndexMap<String, Activity>,
    /// Bulk list or detail fetch in flight
    pub loading_initial: bool,
    /// Create/edit/delete in flight
    pub submitting: bool,
    /// Name of the control that triggered an in-flight delete ("" when idle)
    pub target: String,
    /// Selected/active activity, if any
    pub activity: Option<Activity>,
    /// Show the create/edit form instead of the detail view
    pub edit_mode: bool,
    pub last_error: Option<ActionFailure>,
}

impl StoreState {
    /// All cached activities in chronological order.
    ///
    /// Ordering compares parsed timestamps, day first. The sort is stable,
    /// so equal timestamps keep registry (fetch) order. Unparseable days
    /// sort last, grouped by their raw day text.
    pub fn sorted_activities(&self) -> Vec<&Activity> {
        let mut activities: Vec<&Activity> = self.registry.values().collect();
        activities.sort_by_cached_key(|a| sort_key(a));
        activities
    }

    /// Activities bucketed by calendar day, buckets and members both in
    /// chronological order.
    pub fn activities_by_date(&self) -> Vec<(String, Vec<Activity>)> {
        let mut groups: Vec<(String, Vec<Activity>)> = Vec::new();

        for activity in self.sorted_activities() {
            let key = bucket_key(activity);
            match groups.last_mut() {
                Some((day, members)) if *day == key => members.push(activity.clone()),
                _ => groups.push((key, vec![activity.clone()])),
            }
        }

        groups
    }

    /// True when no request is in flight.
    pub fn is_idle(&self) -> bool {
        !self.loading_initial && !self.submitting && self.target.is_empty()
    }

    fn upsert(&mut self, activity: Activity) {
        self.registry.insert(activity.id.clone(), activity);
    }

    fn record_failure(&mut self, action: StoreAction, err: &AppError) {
        self.last_error = Some(ActionFailure {
            action,
            message: err.to_string(),
        });
    }

    fn clear_failure(&mut self, action: StoreAction) {
        if self.last_error.as_ref().is_some_and(|e| e.action == action) {
            self.last_error = None;
        }
    }
}

type SortKey = (bool, Option<NaiveDate>, Option<String>, bool, Option<NaiveDateTime>);

fn day_of(activity: &Activity) -> Option<NaiveDate> {
    parse_timestamp(date_key(&activity.date)).map(|t| t.date())
}

fn sort_key(activity: &Activity) -> SortKey {
    let day = day_of(activity);
    let raw_day = day
        .is_none()
        .then(|| date_key(&activity.date).to_string());
    let ts = activity.timestamp();
    (day.is_none(), day, raw_day, ts.is_none(), ts)
}

fn bucket_key(activity: &Activity) -> String {
    match day_of(activity) {
        Some(day) => day.format("%Y-%m-%d").to_string(),
        None => date_key(&activity.date).to_string(),
    }
}

/// Busy flag that is cleared exactly once, either together with the
/// action's outcome or when the action future is dropped mid-flight.
struct BusyGuard<'a> {
    state: &'a watch::Sender<StoreState>,
    reset: fn(&mut StoreState),
    armed: bool,
}

impl<'a> BusyGuard<'a> {
    fn begin(
        state: &'a watch::Sender<StoreState>,
        set: impl FnOnce(&mut StoreState),
        reset: fn(&mut StoreState),
    ) -> Self {
        state.send_modify(set);
        Self {
            state,
            reset,
            armed: true,
        }
    }

    /// Apply the outcome and clear the flag as one published update.
    fn finish(mut self, outcome: impl FnOnce(&mut StoreState)) {
        self.armed = false;
        let reset = self.reset;
        self.state.send_modify(|s| {
            outcome(s);
            reset(s);
        });
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(self.reset);
        }
    }
}

fn reset_loading(s: &mut StoreState) {
    s.loading_initial = false;
}

fn reset_submitting(s: &mut StoreState) {
    s.submitting = false;
}

fn reset_delete(s: &mut StoreState) {
    s.submitting = false;
    s.target.clear();
}

#[derive(Debug, Clone, Copy)]
enum Submit {
    Create,
    Edit,
}

impl Submit {
    fn action(self) -> StoreAction {
        match self {
            Submit::Create => StoreAction::CreateActivity,
            Submit::Edit => StoreAction::EditActivity,
        }
    }
}

/// Activity store backed by an [`ActivityApi`].
pub struct ActivityStore<A> {
    api: A,
    state: watch::Sender<StoreState>,
}

impl<A: ActivityApi> ActivityStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: watch::Sender::new(StoreState::default()),
        }
    }

    /// Receiver notified after every published state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Cached record for `id`, without touching the network.
    pub fn get_activity(&self, id: &str) -> Option<Activity> {
        self.state.borrow().registry.get(id).cloned()
    }

    /// Date-grouped view of the cache.
    pub fn activities_by_date(&self) -> Vec<(String, Vec<Activity>)> {
        self.state.borrow().activities_by_date()
    }

    /// Fetch all activities and merge them into the registry.
    ///
    /// Entries missing from the response are kept.
    pub async fn load_activities(&self) -> Result<()> {
        tracing::debug!("Loading activities");
        let guard = BusyGuard::begin(&self.state, |s| s.loading_initial = true, reset_loading);

        match self.api.list().await {
            Ok(activities) => {
                let count = activities.len();
                guard.finish(|s| {
                    for activity in activities {
                        s.upsert(activity.normalized());
                    }
                    s.clear_failure(StoreAction::LoadActivities);
                });
                tracing::info!(count, "Activities loaded");
                Ok(())
            }
            Err(err) => Err(self.fail(guard, StoreAction::LoadActivities, err)),
        }
    }

    /// Make `id` the active activity, fetching it if it is not cached.
    pub async fn load_activity(&self, id: &str) -> Result<Activity> {
        if let Some(cached) = self.get_activity(id) {
            tracing::debug!(id, "Activity served from cache");
            self.state.send_modify(|s| {
                s.activity = Some(cached.clone());
                s.edit_mode = false;
            });
            return Ok(cached);
        }

        tracing::debug!(id, "Activity not cached, fetching");
        let guard = BusyGuard::begin(&self.state, |s| s.loading_initial = true, reset_loading);

        match self.api.details(id).await {
            Ok(activity) => {
                let activity = activity.normalized();
                let result = activity.clone();
                guard.finish(|s| {
                    s.upsert(activity.clone());
                    s.activity = Some(activity);
                    s.edit_mode = false;
                    s.clear_failure(StoreAction::LoadActivity);
                });
                tracing::info!(id, "Activity loaded");
                Ok(result)
            }
            Err(err) => Err(self.fail(guard, StoreAction::LoadActivity, err)),
        }
    }

    /// Drop the active selection. The cached record stays.
    pub fn clear_activity(&self) {
        self.state.send_if_modified(|s| s.activity.take().is_some());
    }

    /// Create `activity` remotely, then cache and select it.
    pub async fn create_activity(&self, activity: Activity) -> Result<()> {
        self.submit(Submit::Create, activity).await
    }

    /// Update `activity` remotely, then replace the cached entry and select it.
    pub async fn edit_activity(&self, activity: Activity) -> Result<()> {
        self.submit(Submit::Edit, activity).await
    }

    async fn submit(&self, kind: Submit, activity: Activity) -> Result<()> {
        activity.validate()?;
        let action = kind.action();
        tracing::debug!(id = %activity.id, %action, "Submitting activity");

        // The API gets the record as given; only the cached copy is normalized.
        let guard = BusyGuard::begin(&self.state, |s| s.submitting = true, reset_submitting);
        let sent = match kind {
            Submit::Create => self.api.create(&activity).await,
            Submit::Edit => self.api.update(&activity).await,
        };

        match sent {
            Ok(()) => {
                let activity = activity.normalized();
                let id = activity.id.clone();
                guard.finish(|s| {
                    s.upsert(activity.clone());
                    s.activity = Some(activity);
                    s.edit_mode = false;
                    s.clear_failure(action);
                });
                tracing::info!(id = %id, %action, "Activity saved");
                Ok(())
            }
            Err(err) => Err(self.fail(guard, action, err)),
        }
    }

    /// Delete `id` remotely, then drop it from the cache.
    ///
    /// `target` names the control that triggered the delete and is exposed
    /// in state while the request is in flight.
    pub async fn delete_activity(&self, id: &str, target: &str) -> Result<()> {
        tracing::debug!(id, target, "Deleting activity");
        let guard = BusyGuard::begin(
            &self.state,
            |s| {
                s.submitting = true;
                s.target = target.to_string();
            },
            reset_delete,
        );

        match self.api.delete(id).await {
            Ok(()) => {
                guard.finish(|s| {
                    s.registry.shift_remove(id);
                    if s.activity.as_ref().is_some_and(|a| a.id == id) {
                        s.activity = None;
                    }
                    s.clear_failure(StoreAction::DeleteActivity);
                });
                tracing::info!(id, "Activity deleted");
                Ok(())
            }
            Err(err) => Err(self.fail(guard, StoreAction::DeleteActivity, err)),
        }
    }

    /// Show an empty form for a new activity.
    pub fn open_create_form(&self) {
        self.state.send_modify(|s| {
            s.activity = None;
            s.edit_mode = true;
        });
    }

    /// Show the edit form for a cached activity.
    pub fn open_edit_form(&self, id: &str) -> Result<()> {
        let activity = self
            .get_activity(id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        self.state.send_modify(|s| {
            s.activity = Some(activity);
            s.edit_mode = true;
        });
        Ok(())
    }

    /// Leave edit mode, keeping the selection.
    pub fn close_form(&self) {
        self.state.send_if_modified(|s| std::mem::take(&mut s.edit_mode));
    }

    fn fail(&self, guard: BusyGuard<'_>, action: StoreAction, err: AppError) -> AppError {
        tracing::error!(%action, error = %err, "Activity action failed");
        guard.finish(|s| s.record_failure(action, &err));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, date: &str) -> Activity {
        Activity {
            id: id.to_string(),
            title: format!("Activity {}", id),
            description: String::new(),
            category: "culture".to_string(),
            date: date.to_string(),
            city: "Paris".to_string(),
            venue: "Louvre".to_string(),
        }
    }

    fn state_with(activities: &[Activity]) -> StoreState {
        let mut state = StoreState::default();
        for a in activities {
            state.upsert(a.clone());
        }
        state
    }

    #[test]
    fn test_grouping_example() {
        let a1 = activity("a1", "2023-01-05T10:00:00");
        let a2 = activity("a2", "2023-01-01T10:00:00");
        let a3 = activity("a3", "2023-01-05T10:00:00");
        let state = state_with(&[a1.clone(), a2.clone(), a3.clone()]);

        assert_eq!(
            state.activities_by_date(),
            vec![
                ("2023-01-01".to_string(), vec![a2]),
                ("2023-01-05".to_string(), vec![a1, a3]),
            ]
        );
    }

    #[test]
    fn test_sort_uses_time_within_day() {
        let late = activity("a", "2023-03-01T21:00:00");
        let early = activity("b", "2023-03-01T08:15:00");
        let state = state_with(&[late.clone(), early.clone()]);

        let ids: Vec<&str> = state
            .sorted_activities()
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_date_only_and_date_time_compare_by_value() {
        let midnight = activity("z", "2023-03-01");
        let morning = activity("a", "2023-03-01T09:00:00");
        let state = state_with(&[morning, midnight]);

        let groups = state.activities_by_date();
        assert_eq!(groups.len(), 1);
        let ids: Vec<&str> = groups[0].1.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn test_unparseable_dates_sort_last() {
        let bad = activity("a", "someday");
        let good = activity("b", "2030-01-01T00:00:00");
        let state = state_with(&[bad, good]);

        let groups = state.activities_by_date();
        assert_eq!(groups[0].0, "2030-01-01");
        assert_eq!(groups[1].0, "someday");
    }

    #[test]
    fn test_equal_timestamps_keep_fetch_order() {
        let first = activity("zz-first", "2023-06-01T12:00:00");
        let second = activity("aa-second", "2023-06-01T12:00:00");
        let state = state_with(&[first, second]);

        let groups = state.activities_by_date();
        let ids: Vec<&str> = groups[0].1.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["zz-first", "aa-second"]);
    }

    #[test]
    fn test_upsert_keeps_original_slot() {
        let mut state = state_with(&[
            activity("b", "2023-06-01T12:00:00"),
            activity("a", "2023-06-01T12:00:00"),
        ]);
        let mut renamed = activity("b", "2023-06-01T12:00:00");
        renamed.title = "Renamed".to_string();
        state.upsert(renamed);

        let ids: Vec<&str> = state
            .sorted_activities()
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_bad_time_stays_in_its_day_bucket() {
        let state = state_with(&[
            activity("a", "2023-01-05T10:00:00"),
            activity("b", "2023-01-07T10:00:00"),
            activity("c", "2023-01-05Tlate"),
            activity("d", "someday"),
            activity("e", "anyday"),
            activity("f", "someday"),
        ]);

        let groups: Vec<(String, Vec<String>)> = state
            .activities_by_date()
            .into_iter()
            .map(|(day, members)| (day, members.into_iter().map(|a| a.id).collect()))
            .collect();

        assert_eq!(
            groups,
            vec![
                ("2023-01-05".to_string(), vec!["a".to_string(), "c".to_string()]),
                ("2023-01-07".to_string(), vec!["b".to_string()]),
                ("anyday".to_string(), vec!["e".to_string()]),
                ("someday".to_string(), vec!["d".to_string(), "f".to_string()]),
            ]
        );
    }

    #[test]
    fn test_empty_registry_groups_to_nothing() {
        assert!(StoreState::default().activities_by_date().is_empty());
        assert!(StoreState::default().is_idle());
    }

    #[test]
    fn test_clear_failure_only_matches_same_action() {
        let mut state = StoreState::default();
        state.record_failure(StoreAction::DeleteActivity, &AppError::Api("down".into()));

        state.clear_failure(StoreAction::LoadActivities);
        assert!(state.last_error.is_some());

        state.clear_failure(StoreAction::DeleteActivity);
        assert!(state.last_error.is_none());
    }
}
