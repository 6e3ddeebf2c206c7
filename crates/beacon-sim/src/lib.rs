//! Simulated landing-page metrics.
//!
//! Every generator takes an explicit RNG so callers control determinism;
//! [`SimulatedSource`] wires them behind [`beacon_core::MetricsSource`].

pub mod audits;
pub mod experiments;
pub mod iterations;
pub mod source;
pub mod vitals;

pub use source::SimulatedSource;
