//! Workforce Analytics Engine for HRMS records
//!
//! This crate computes workforce analytics (performance scores, leave and
//! attendance forecasts, burnout risk, rule-based anomaly findings) and
//! period reports with CSV export over attendance, leave and payroll
//! records, and serves them over a read-only HTTP API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod repository;
