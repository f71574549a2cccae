// src/lib.rs

//! EC2 Event Reporter Library

pub mod config;
pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod reporter;
pub mod storage;
pub mod utils;
