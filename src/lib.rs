//! NRAR Viz - Simulation KPI Dashboard
//!
//! Loads pre-computed simulation outputs (one CSV per scenario, first column
//! is the time step) and turns selected KPI columns into chart figures.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
