//! # Rockets Backend
//!
//! In-memory scheduling store for meetings, calendars, participants and
//! attachments, exposed as a REST API via Axum.
//!
//! ## Features
//!
//! - **Entities**: CRUD for four collections with field validation
//! - **Associations**: symmetric many-to-many links backed by one edge set per relationship
//! - **Embedded views**: every read resolves associations into full peer objects
//! - **HTTP API**: RESTful endpoints under `/api` plus an optional static console
//!
//! ## Architecture
//!
//! - [`models`]: Entity records, payloads, views and kind/relation types
//! - [`db`]: Repository traits, the in-memory store and the service layer
//! - [`config`]: TOML and environment configuration for the server
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
