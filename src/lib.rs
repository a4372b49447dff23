//! Nutrilog Library
//!
//! Nutrition aggregation, recipe label inference and the diary built on them.

pub mod build_info;
pub mod config;
pub mod context;
pub mod db;
pub mod feed;
pub mod labels;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod summary;
pub mod tools;
