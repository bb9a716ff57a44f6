//! Core data types for the Solwind platform

pub mod cost;
pub mod profit;
pub mod project;
