// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_store::error::{AppError, Result};
use activity_store::models::Activity;
use activity_store::services::ActivityApi;
use activity_store::ActivityStore;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Build a complete, valid activity.
#[allow(dead_code)]
pub fn sample_activity(id: &str, date: &str) -> Activity {
    Activity {
        id: id.to_string(),
        title: format!("Activity {}", id),
        description: "Test activity".to_string(),
        category: "music".to_string(),
        date: date.to_string(),
        city: "London".to_string(),
        venue: "Royal Albert Hall".to_string(),
    }
}

/// How the fake fails while failure is switched on.
#[allow(dead_code)]
#[derive(Clone, Copy)]
pub enum Failure {
    Transport,
    NotFound,
    Validation,
}

/// In-memory stand-in for the remote API.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeApi {
    records: Mutex<IndexMap<String, Activity>>,
    failure: Mutex<Option<Failure>>,
    calls: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

#[allow(dead_code)]
impl FakeApi {
    pub fn with_records(records: Vec<Activity>) -> Arc<Self> {
        let api = Self::default();
        api.set_records(records);
        Arc::new(api)
    }

    /// Replace the server-side data set.
    pub fn set_records(&self, records: Vec<Activity>) {
        let mut map = self.records.lock().unwrap();
        map.clear();
        for r in records {
            map.insert(r.id.clone(), r);
        }
    }

    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Hold every request until the returned `Notify` is signalled.
    pub fn hold_requests(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Server-side copy of a record, as it was sent.
    pub fn record(&self, id: &str) -> Option<Activity> {
        self.records.lock().unwrap().get(id).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call.clone());

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match *self.failure.lock().unwrap() {
            None => Ok(()),
            Some(Failure::Transport) => Err(AppError::Api("connection refused".to_string())),
            Some(Failure::NotFound) => Err(AppError::NotFound(call)),
            Some(Failure::Validation) => Err(AppError::Validation("rejected".to_string())),
        }
    }
}

#[async_trait]
impl ActivityApi for FakeApi {
    async fn list(&self) -> Result<Vec<Activity>> {
        self.enter("list".to_string()).await?;
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn details(&self, id: &str) -> Result<Activity> {
        self.enter(format!("details {}", id)).await?;
        self.records
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    async fn create(&self, activity: &Activity) -> Result<()> {
        self.enter(format!("create {}", activity.id)).await?;
        self.records
            .lock()
            .unwrap()
            .insert(activity.id.clone(), activity.clone());
        Ok(())
    }

    async fn update(&self, activity: &Activity) -> Result<()> {
        self.enter(format!("update {}", activity.id)).await?;
        let mut records = self.records.lock().unwrap();
        if !records.contains_key(&activity.id) {
            return Err(AppError::NotFound(activity.id.clone()));
        }
        records.insert(activity.id.clone(), activity.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.enter(format!("delete {}", id)).await?;
        self.records
            .lock()
            .unwrap()
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }
}

/// Store over a shared fake, so tests can keep steering the fake.
#[allow(dead_code)]
pub fn create_test_store(records: Vec<Activity>) -> (Arc<ActivityStore<Arc<FakeApi>>>, Arc<FakeApi>) {
    let api = FakeApi::with_records(records);
    (Arc::new(ActivityStore::new(api.clone())), api)
}
