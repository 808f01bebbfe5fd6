//! Evaluation Strategy Module
//!
//! Alternative ways of driving the axes over many items:
//! - Parallel axis steps (Rayon), behind the `parallel` feature

pub mod parallel;

pub use parallel::{map_parallel, step_parallel};
