//! Tasklet: terminal client for a remote task list with optimistic updates.

pub mod api;
pub mod app;
pub mod config;
pub mod net;
pub mod tasks;
pub mod ui;
