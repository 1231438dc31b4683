//! UK housing market dashboard.
//!
//! Loads interest-rate, house-price, population, dwelling-stock, GDP deflator
//! and wage series, normalises them to one point per year for a chosen
//! region, rebases them to a common anchor year, and draws three line charts.

pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod ui;
