// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity API contract consumed by the store.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Activity;

/// Remote operations on activity records.
///
/// Implementations own transport, serialization and status mapping;
/// the store only sees parsed records or an [`AppError`](crate::error::AppError).
#[async_trait]
pub trait ActivityApi: Send + Sync {
    /// Fetch every activity.
    async fn list(&self) -> Result<Vec<Activity>>;

    /// Fetch one activity. Missing ids fail with `NotFound`.
    async fn details(&self, id: &str) -> Result<Activity>;

    /// Persist a new activity.
    async fn create(&self, activity: &Activity) -> Result<()>;

    /// Persist changes to an existing activity, matched by id.
    async fn update(&self, activity: &Activity) -> Result<()>;

    /// Remove an activity by id.
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl<T: ActivityApi + ?Sized> ActivityApi for std::sync::Arc<T> {
    async fn list(&self) -> Result<Vec<Activity>> {
        (**self).list().await
    }

    async fn details(&self, id: &str) -> Result<Activity> {
        (**self).details(id).await
    }

    async fn create(&self, activity: &Activity) -> Result<()> {
        (**self).create(activity).await
    }

    async fn update(&self, activity: &Activity) -> Result<()> {
        (**self).update(activity).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }
}
