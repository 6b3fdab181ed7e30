//! Cache-blocked GEMM schedulers.
//!
//! Both drivers walk the same three-level block nest - N blocks (`jc`),
//! K blocks (`pc`), M blocks (`ic`) - sized by [`crate::params::BlockingParams`],
//! pack operand panels, and hand MR×NR tiles to a microkernel family:
//!
//! - `gemm_6x16`: AVX2+FMA path built around the 6×16 wide kernel with the
//!   full remainder cascade (6×16 → 4×16 → 6×8/4×8 → scalar).
//! - `gemm_scalar`: portable path, same nest and packing, scalar kernel
//!   for every tile. Runs anywhere and doubles as a reference for the
//!   SIMD path.
//!
//! The block sizes only decide what stays cache-resident; the computed
//! product is identical (up to floating-point rounding) for any valid
//! choice.

pub mod gemm_6x16;
pub mod gemm_scalar;
