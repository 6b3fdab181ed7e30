//! SIMD microkernels for the inner loop of the blocked GEMM.
//!
//! Each kernel computes a fixed-shape tile `C[mr, nr] += A_slice × B_slice`
//! as KC sequential rank-1 updates, using FMA so there is no intermediate
//! rounding between the multiply and the add. On `first_k` the accumulators
//! start from zero instead of loading C, which is how partial products from
//! successive K blocks sum up correctly without ever reading stale memory.
//!
//! The tile shapes are register-budget decisions for AVX2 (16 YMM
//! registers, 8 floats each):
//!
//! - `kernel_6x16`: 12 YMM accumulators, 4 left for A broadcasts and B
//!   loads. 24 FLOPs per operand load - the best ratio that doesn't spill.
//! - `kernel_4x16`: 8 accumulators, handles row remainders of 4 or 5.
//! - `kernel_6x8` / `kernel_4x8`: one accumulator per row, handle column
//!   remainders of 8..15 straight from the strided source.
//! - `kernel_scalar`: portable arbitrary-shape fallback, also the whole
//!   kernel set on targets without AVX2.
//!
//! An 8×16 tile would need all 16 registers for C alone and spill; that is
//! why the wide kernel stops at 6 rows.

pub mod kernel_4x16;
pub mod kernel_6x16;
pub mod kernel_edge;
pub mod kernel_scalar;

/// Tile height of the wide kernel.
pub const MR: usize = 6;
/// Tile width of the wide and 4×16 kernels (two YMM registers per row).
pub const NR: usize = 16;
/// Tile height of the narrow row-remainder kernel.
pub const MR_EDGE: usize = 4;
/// Tile width of the column-remainder kernels (one YMM register per row).
pub const NR_EDGE: usize = 8;
