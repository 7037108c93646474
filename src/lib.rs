//! lakescan - Screen lake outline polygons for floatplane-landable straight runs

pub mod analysis;
pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod ingest;
pub mod report;
