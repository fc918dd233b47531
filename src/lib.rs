//! Recruiting roster browser.
//!
//! Everything except the desktop window lives here so it can run and be
//! tested headless. The binary in `main.rs` wraps [`app::AppState`] in Tauri
//! commands.

pub mod admin;
pub mod app;
pub mod auth;
pub mod bookmarks;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod errors;
pub mod export;
pub mod filter;
pub mod home;
pub mod hr;
pub mod keys;
pub mod logging;
pub mod model;
pub mod notice;
pub mod roster;
pub mod storage;
pub mod store;
pub mod view;
