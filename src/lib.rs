//! Session service behind the "rate a few movies, get a predicted rating"
//! widget: catalog matching, an in-memory ratings ledger and a client for the
//! remote rating predictor.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
