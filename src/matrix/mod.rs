//! Naive matrix products - correctness baselines.
//!
//! These are the stage-one implementations the blocked engine is
//! measured and verified against. Slow on purpose; never used by the
//! engine at runtime.

pub mod naive_ijk;
pub mod naive_ikj;
