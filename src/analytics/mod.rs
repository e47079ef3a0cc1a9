//! The curve-derivation and stress-classification engine.
//!
//! Everything in here is a pure function over in-memory values: no I/O, no
//! shared state, same input -> same output. The store and the CLI adapters
//! live elsewhere; this module only sees already-typed observations.
//!
//! - `builder`: tenor-aligned today/prior curve join
//! - `metrics`: slopes, carry, shape and regime classification
//! - `stress`: consecutive-day front-end stress streak
//! - `macro_delta`: day-over-day macro scalar deltas
//! - `momentum`: lookback percent-change classification
//! - `correlate`: Pearson correlation / divergence between the two metals

pub mod builder;
pub mod correlate;
pub mod macro_delta;
pub mod metrics;
pub mod momentum;
pub mod stress;

pub use builder::*;
pub use correlate::*;
pub use macro_delta::*;
pub use metrics::*;
pub use momentum::*;
pub use stress::*;
