// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tours Server - tour catalog API with stateless JWT authentication
//!
//! Users log in once with a password and receive a signed bearer token.
//! Every later request is authenticated from that token alone, without a
//! store lookup.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, authentication filter, principals and authorities
//! - `store` - Credential store contract and in-memory implementation
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
pub mod telemetry;
