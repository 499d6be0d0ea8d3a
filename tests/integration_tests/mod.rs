//! Integration tests module
//!
//! End-to-end tests for the corpus pipeline:
//! - raw corpus → refined corpus → annotation-refined corpus
//! - annotation-refined corpus → mention anchors → expand / filter

pub mod anchors_test;
pub mod fixtures;
pub mod pipeline_test;
