// src/lib.rs

//! CrisisConnect opportunity aggregation library

pub mod error;
pub mod models;
pub mod services;
pub mod utils;
