//! Room-scoped real-time relay over WebSocket.
//!
//! Clients connect, claim an identity (which joins a room of the same name)
//! and exchange notifications and messages scoped to rooms.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
