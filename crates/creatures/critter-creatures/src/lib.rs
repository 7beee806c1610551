//! Authored creatures for critter-rig-core.
//!
//! Each module owns one creature type: its rest-pose node table, motion
//! program and action clips.

pub mod feral_ratlantean;

pub use feral_ratlantean::FeralRatlanteanAnimation;
