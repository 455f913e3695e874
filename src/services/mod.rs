// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - access to the remote activities API.

pub mod api;
pub mod http;

pub use api::ActivityApi;
pub use http::HttpActivityApi;
