//! 6×8 and 4×8 AVX2 microkernels for column remainders.
//!
//! When fewer than 16 but at least 8 columns remain in an N block, these
//! kernels update a half-width tile. The tail strip is only visited once
//! per (K block, N block), so B is read straight from the strided source
//! instead of being packed - each row access is still 8 contiguous floats.

use super::{MR, MR_EDGE};

/// Computes a 6×8 tile: C[0:6, 0:8] += A_packed × B
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2 and FMA (checked via `#[target_feature]`)
/// - `a_pack` points to `kc * 6` contiguous f32 values (packed A slice)
/// - `b.add(p * ldb)` is valid for 8 f32 reads for p in 0..kc
/// - `c.add(row * ldc)` is valid for row in 0..6, each allowing
///   read/write of 8 f32s
#[target_feature(enable = "avx2,fma")]
#[allow(clippy::identity_op)]
#[allow(clippy::erasing_op)]
#[allow(clippy::too_many_arguments)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn kernel_6x8_avx2(
    a_pack: *const f32,
    b: *const f32,
    ldb: usize,
    c: *mut f32,
    ldc: usize,
    kc: usize,
    first_k: bool,
) {
    use std::arch::x86_64::*;

    let (mut c0, mut c1, mut c2, mut c3, mut c4, mut c5);
    if first_k {
        c0 = _mm256_setzero_ps();
        c1 = _mm256_setzero_ps();
        c2 = _mm256_setzero_ps();
        c3 = _mm256_setzero_ps();
        c4 = _mm256_setzero_ps();
        c5 = _mm256_setzero_ps();
    } else {
        c0 = _mm256_loadu_ps(c.add(0 * ldc));
        c1 = _mm256_loadu_ps(c.add(1 * ldc));
        c2 = _mm256_loadu_ps(c.add(2 * ldc));
        c3 = _mm256_loadu_ps(c.add(3 * ldc));
        c4 = _mm256_loadu_ps(c.add(4 * ldc));
        c5 = _mm256_loadu_ps(c.add(5 * ldc));
    }

    for p in 0..kc {
        let b_vec = _mm256_loadu_ps(b.add(p * ldb));

        c0 = _mm256_fmadd_ps(_mm256_broadcast_ss(&*a_pack.add(p * MR)), b_vec, c0);
        c1 = _mm256_fmadd_ps(_mm256_broadcast_ss(&*a_pack.add(p * MR + 1)), b_vec, c1);
        c2 = _mm256_fmadd_ps(_mm256_broadcast_ss(&*a_pack.add(p * MR + 2)), b_vec, c2);
        c3 = _mm256_fmadd_ps(_mm256_broadcast_ss(&*a_pack.add(p * MR + 3)), b_vec, c3);
        c4 = _mm256_fmadd_ps(_mm256_broadcast_ss(&*a_pack.add(p * MR + 4)), b_vec, c4);
        c5 = _mm256_fmadd_ps(_mm256_broadcast_ss(&*a_pack.add(p * MR + 5)), b_vec, c5);
    }

    _mm256_storeu_ps(c.add(0 * ldc), c0);
    _mm256_storeu_ps(c.add(1 * ldc), c1);
    _mm256_storeu_ps(c.add(2 * ldc), c2);
    _mm256_storeu_ps(c.add(3 * ldc), c3);
    _mm256_storeu_ps(c.add(4 * ldc), c4);
    _mm256_storeu_ps(c.add(5 * ldc), c5);
}

/// Computes a 4×8 tile: C[0:4, 0:8] += A_packed × B
///
/// Used where both a row remainder (4 or 5 rows) and a column remainder
/// (8..15 columns) meet.
///
/// # Safety
///
/// Same as [`kernel_6x8_avx2`] but with 4 rows and `a_pack` holding
/// `kc * 4` values.
#[target_feature(enable = "avx2,fma")]
#[allow(clippy::identity_op)]
#[allow(clippy::erasing_op)]
#[allow(clippy::too_many_arguments)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn kernel_4x8_avx2(
    a_pack: *const f32,
    b: *const f32,
    ldb: usize,
    c: *mut f32,
    ldc: usize,
    kc: usize,
    first_k: bool,
) {
    use std::arch::x86_64::*;

    let (mut c0, mut c1, mut c2, mut c3);
    if first_k {
        c0 = _mm256_setzero_ps();
        c1 = _mm256_setzero_ps();
        c2 = _mm256_setzero_ps();
        c3 = _mm256_setzero_ps();
    } else {
        c0 = _mm256_loadu_ps(c.add(0 * ldc));
        c1 = _mm256_loadu_ps(c.add(1 * ldc));
        c2 = _mm256_loadu_ps(c.add(2 * ldc));
        c3 = _mm256_loadu_ps(c.add(3 * ldc));
    }

    for p in 0..kc {
        let b_vec = _mm256_loadu_ps(b.add(p * ldb));

        c0 = _mm256_fmadd_ps(_mm256_broadcast_ss(&*a_pack.add(p * MR_EDGE)), b_vec, c0);
        c1 = _mm256_fmadd_ps(_mm256_broadcast_ss(&*a_pack.add(p * MR_EDGE + 1)), b_vec, c1);
        c2 = _mm256_fmadd_ps(_mm256_broadcast_ss(&*a_pack.add(p * MR_EDGE + 2)), b_vec, c2);
        c3 = _mm256_fmadd_ps(_mm256_broadcast_ss(&*a_pack.add(p * MR_EDGE + 3)), b_vec, c3);
    }

    _mm256_storeu_ps(c.add(0 * ldc), c0);
    _mm256_storeu_ps(c.add(1 * ldc), c1);
    _mm256_storeu_ps(c.add(2 * ldc), c2);
    _mm256_storeu_ps(c.add(3 * ldc), c3);
}
