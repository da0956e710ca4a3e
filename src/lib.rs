//! Task tracker: an axum + redb server and its terminal client.
//!
//! Server side: `store` holds the in-memory task set, `persist` is the redb
//! save file, `api` maps both onto REST. Client side: `client` talks to the
//! API, `board` owns the filter/sort pipeline and form state, `ui` renders it.

pub mod api;
pub mod board;
pub mod client;
pub mod config;
pub mod persist;
pub mod store;
pub mod ui;
