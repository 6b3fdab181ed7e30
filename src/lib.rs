//! Single-precision blocked matrix multiplication, built from scratch.
//!
//! I built this to see how far cache blocking, operand packing, and a
//! register-budgeted microkernel get you toward BLAS on one core. The
//! answer is: most of the way, and every step is a data change, not a
//! rewrite - each optimization stage is just a different
//! [`BlockingParams`] value fed to the same scheduler.
//!
//! ## Usage
//!
//! ```
//! use sgemm::{multiply, BlockingParams};
//!
//! let n = 64;
//! let a = vec![1.0f32; n * n];
//! let b = vec![1.0f32; n * n];
//! let mut c = vec![0.0f32; n * n];
//!
//! multiply(&a, &b, &mut c, n, &BlockingParams::TUNED);
//! assert_eq!(c[0], n as f32);
//! ```
//!
//! ## What's inside
//!
//! - A 6×16 AVX2+FMA microkernel (12 YMM accumulators) with 4×16,
//!   6×8/4×8, and scalar fallbacks for remainder tiles
//! - Three-level cache blocking (MC/KC/NC) over packed operand panels
//! - Eager and lazy (just-in-time) A packing, pack-on-first-use B packing
//! - A portable scalar path with the same blocking, for any target

pub mod blocked;
pub mod kernels;
pub mod matrix;
pub mod packing;
pub mod params;

pub use matrix::naive_ijk::matmul_naive_ijk;
pub use matrix::naive_ikj::matmul_naive_ikj;
pub use params::{BlockingParams, PackingPolicy};

/// Matrix multiply: C = A · B
///
/// All three matrices are n×n, row-major, leading dimension n. C is
/// overwritten; whatever it held before the call never reaches the
/// result. Picks the AVX2+FMA blocked path when the CPU supports it,
/// the portable blocked path otherwise.
///
/// # Panics
///
/// Panics if any slice length differs from `n * n`, or if `params`
/// violates the blocking invariants (see [`BlockingParams::validate`]).
pub fn multiply(a: &[f32], b: &[f32], c: &mut [f32], n: usize, params: &BlockingParams) {
    assert_eq!(a.len(), n * n, "A: expected {}x{}={} elements", n, n, n * n);
    assert_eq!(b.len(), n * n, "B: expected {}x{}={} elements", n, n, n * n);
    assert_eq!(c.len(), n * n, "C: expected {}x{}={} elements", n, n, n * n);
    params.validate();

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            unsafe { blocked::gemm_6x16::gemm_blocked_6x16(a, b, c, n, params) };
            return;
        }
    }

    blocked::gemm_scalar::gemm_blocked_scalar(a, b, c, n, params);
}
