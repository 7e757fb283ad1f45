//! Payroll engine for time-log ingestion and semi-monthly payroll reports.
//!
//! This crate ingests per-employee time-log CSV files, stores each
//! submission exactly once, and aggregates the stored work-logs into a
//! payroll report with one amount per employee and pay period.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod service;
pub mod store;
