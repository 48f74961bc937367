//! Shared test fixtures and utilities for robostage crates.
//!
//! Provides robot descriptions and trajectory tables for common
//! scenarios, temporary file helpers, Bevy test app builders, and
//! deterministic RNG setup. Meant for `tests/` integration suites.

pub mod app;
pub mod fixtures;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use app::{full_test_app, minimal_test_app, scene_test_app};
pub use fixtures::{
    ARM_URDF, QUARTER_TURN_CSV, TWO_PARENT_URDF, chain_urdf, parse_fixture, write_file, write_temp,
};
pub use rng::{deterministic_vec, seeded_rng};
