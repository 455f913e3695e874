// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity store: a cached client for an activities REST API
//!
//! This crate provides the client-side state container views read from,
//! plus the HTTP client it talks to the backend through.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod time_utils;

pub use store::{ActionFailure, ActivityStore, StoreAction, StoreState};
