//! 4×16 AVX2 microkernel for row remainders.

use super::{MR_EDGE, NR};

/// Computes a 4×16 tile: C[0:4, 0:16] += A_packed × B_packed
///
/// The narrow companion to `kernel_6x16`: 8 YMM accumulators instead of
/// 12. The scheduler selects it when fewer than 6 but at least 4 rows
/// remain in an M block, so the bulk of an odd-sized matrix still runs
/// through vector code instead of dropping straight to scalar.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2 and FMA (checked via `#[target_feature]`)
/// - `a_pack` points to `kc * 4` contiguous f32 values (packed A slice)
/// - `b_pack` points to `kc * 16` contiguous f32 values (packed B strip)
/// - `c.add(row * ldc)` is valid for row in 0..4, each allowing
///   read/write of 16 f32s
#[target_feature(enable = "avx2,fma")]
#[allow(clippy::identity_op)]
#[allow(clippy::erasing_op)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn kernel_4x16_avx2(
    a_pack: *const f32,
    b_pack: *const f32,
    c: *mut f32,
    ldc: usize,
    kc: usize,
    first_k: bool,
) {
    use std::arch::x86_64::*;

    let (mut c00, mut c01, mut c10, mut c11);
    let (mut c20, mut c21, mut c30, mut c31);

    if first_k {
        c00 = _mm256_setzero_ps();
        c01 = _mm256_setzero_ps();
        c10 = _mm256_setzero_ps();
        c11 = _mm256_setzero_ps();
        c20 = _mm256_setzero_ps();
        c21 = _mm256_setzero_ps();
        c30 = _mm256_setzero_ps();
        c31 = _mm256_setzero_ps();
    } else {
        c00 = _mm256_loadu_ps(c.add(0 * ldc));
        c01 = _mm256_loadu_ps(c.add(0 * ldc + 8));
        c10 = _mm256_loadu_ps(c.add(1 * ldc));
        c11 = _mm256_loadu_ps(c.add(1 * ldc + 8));
        c20 = _mm256_loadu_ps(c.add(2 * ldc));
        c21 = _mm256_loadu_ps(c.add(2 * ldc + 8));
        c30 = _mm256_loadu_ps(c.add(3 * ldc));
        c31 = _mm256_loadu_ps(c.add(3 * ldc + 8));
    }

    for p in 0..kc {
        let b0 = _mm256_loadu_ps(b_pack.add(p * NR));
        let b1 = _mm256_loadu_ps(b_pack.add(p * NR + 8));

        let a0 = _mm256_broadcast_ss(&*a_pack.add(p * MR_EDGE));
        let a1 = _mm256_broadcast_ss(&*a_pack.add(p * MR_EDGE + 1));
        let a2 = _mm256_broadcast_ss(&*a_pack.add(p * MR_EDGE + 2));
        let a3 = _mm256_broadcast_ss(&*a_pack.add(p * MR_EDGE + 3));

        c00 = _mm256_fmadd_ps(a0, b0, c00);
        c01 = _mm256_fmadd_ps(a0, b1, c01);
        c10 = _mm256_fmadd_ps(a1, b0, c10);
        c11 = _mm256_fmadd_ps(a1, b1, c11);
        c20 = _mm256_fmadd_ps(a2, b0, c20);
        c21 = _mm256_fmadd_ps(a2, b1, c21);
        c30 = _mm256_fmadd_ps(a3, b0, c30);
        c31 = _mm256_fmadd_ps(a3, b1, c31);
    }

    _mm256_storeu_ps(c.add(0 * ldc), c00);
    _mm256_storeu_ps(c.add(0 * ldc + 8), c01);
    _mm256_storeu_ps(c.add(1 * ldc), c10);
    _mm256_storeu_ps(c.add(1 * ldc + 8), c11);
    _mm256_storeu_ps(c.add(2 * ldc), c20);
    _mm256_storeu_ps(c.add(2 * ldc + 8), c21);
    _mm256_storeu_ps(c.add(3 * ldc), c30);
    _mm256_storeu_ps(c.add(3 * ldc + 8), c31);
}
