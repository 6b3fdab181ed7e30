//! 6×16 AVX2 microkernel - the wide primary kernel.

use super::{MR, NR};

/// Computes a 6×16 tile: C[0:6, 0:16] += A_packed × B
///
/// Uses 12 YMM registers as accumulators (6 rows × 2 halves of 8 floats).
/// A values arrive packed with stride MR and are broadcast one at a time;
/// B rows are read 16 floats at a time.
///
/// When `pack_b` is set, B is read from the strided source `b_src` and the
/// rows streaming through registers are stored into `b_pack` on the way -
/// pack-on-first-use, no dedicated packing pass. When clear, B is read
/// from `b_pack` and `b_src`/`ldb` are ignored.
///
/// On `first_k` the accumulators start at zero; otherwise the existing C
/// tile is loaded and accumulated into.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2 and FMA (checked via `#[target_feature]`)
/// - `a_pack` points to `kc * 6` contiguous f32 values (packed A slice)
/// - `b_pack` points to `kc * 16` contiguous f32 values, initialized
///   unless `pack_b` is set
/// - if `pack_b`, `b_src.add(p * ldb)` is valid for 16 f32 reads for
///   p in 0..kc
/// - `c.add(row * ldc)` is valid for row in 0..6, each allowing
///   read/write of 16 f32s
#[target_feature(enable = "avx2,fma")]
#[allow(clippy::identity_op)]
#[allow(clippy::erasing_op)]
#[allow(clippy::too_many_arguments)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn kernel_6x16_avx2(
    a_pack: *const f32,
    b_src: *const f32,
    ldb: usize,
    b_pack: *mut f32,
    c: *mut f32,
    ldc: usize,
    kc: usize,
    first_k: bool,
    pack_b: bool,
) {
    use std::arch::x86_64::*;

    let (mut c00, mut c01, mut c10, mut c11, mut c20, mut c21);
    let (mut c30, mut c31, mut c40, mut c41, mut c50, mut c51);

    if first_k {
        c00 = _mm256_setzero_ps();
        c01 = _mm256_setzero_ps();
        c10 = _mm256_setzero_ps();
        c11 = _mm256_setzero_ps();
        c20 = _mm256_setzero_ps();
        c21 = _mm256_setzero_ps();
        c30 = _mm256_setzero_ps();
        c31 = _mm256_setzero_ps();
        c40 = _mm256_setzero_ps();
        c41 = _mm256_setzero_ps();
        c50 = _mm256_setzero_ps();
        c51 = _mm256_setzero_ps();
    } else {
        c00 = _mm256_loadu_ps(c.add(0 * ldc));
        c01 = _mm256_loadu_ps(c.add(0 * ldc + 8));
        c10 = _mm256_loadu_ps(c.add(1 * ldc));
        c11 = _mm256_loadu_ps(c.add(1 * ldc + 8));
        c20 = _mm256_loadu_ps(c.add(2 * ldc));
        c21 = _mm256_loadu_ps(c.add(2 * ldc + 8));
        c30 = _mm256_loadu_ps(c.add(3 * ldc));
        c31 = _mm256_loadu_ps(c.add(3 * ldc + 8));
        c40 = _mm256_loadu_ps(c.add(4 * ldc));
        c41 = _mm256_loadu_ps(c.add(4 * ldc + 8));
        c50 = _mm256_loadu_ps(c.add(5 * ldc));
        c51 = _mm256_loadu_ps(c.add(5 * ldc + 8));
    }

    for p in 0..kc {
        let (b0, b1) = if pack_b {
            let b0 = _mm256_loadu_ps(b_src.add(p * ldb));
            let b1 = _mm256_loadu_ps(b_src.add(p * ldb + 8));
            _mm256_storeu_ps(b_pack.add(p * NR), b0);
            _mm256_storeu_ps(b_pack.add(p * NR + 8), b1);
            (b0, b1)
        } else {
            (
                _mm256_loadu_ps(b_pack.add(p * NR)),
                _mm256_loadu_ps(b_pack.add(p * NR + 8)),
            )
        };

        let mut a = _mm256_broadcast_ss(&*a_pack.add(p * MR));
        c00 = _mm256_fmadd_ps(a, b0, c00);
        c01 = _mm256_fmadd_ps(a, b1, c01);
        a = _mm256_broadcast_ss(&*a_pack.add(p * MR + 1));
        c10 = _mm256_fmadd_ps(a, b0, c10);
        c11 = _mm256_fmadd_ps(a, b1, c11);
        a = _mm256_broadcast_ss(&*a_pack.add(p * MR + 2));
        c20 = _mm256_fmadd_ps(a, b0, c20);
        c21 = _mm256_fmadd_ps(a, b1, c21);
        a = _mm256_broadcast_ss(&*a_pack.add(p * MR + 3));
        c30 = _mm256_fmadd_ps(a, b0, c30);
        c31 = _mm256_fmadd_ps(a, b1, c31);
        a = _mm256_broadcast_ss(&*a_pack.add(p * MR + 4));
        c40 = _mm256_fmadd_ps(a, b0, c40);
        c41 = _mm256_fmadd_ps(a, b1, c41);
        a = _mm256_broadcast_ss(&*a_pack.add(p * MR + 5));
        c50 = _mm256_fmadd_ps(a, b0, c50);
        c51 = _mm256_fmadd_ps(a, b1, c51);
    }

    _mm256_storeu_ps(c.add(0 * ldc), c00);
    _mm256_storeu_ps(c.add(0 * ldc + 8), c01);
    _mm256_storeu_ps(c.add(1 * ldc), c10);
    _mm256_storeu_ps(c.add(1 * ldc + 8), c11);
    _mm256_storeu_ps(c.add(2 * ldc), c20);
    _mm256_storeu_ps(c.add(2 * ldc + 8), c21);
    _mm256_storeu_ps(c.add(3 * ldc), c30);
    _mm256_storeu_ps(c.add(3 * ldc + 8), c31);
    _mm256_storeu_ps(c.add(4 * ldc), c40);
    _mm256_storeu_ps(c.add(4 * ldc + 8), c41);
    _mm256_storeu_ps(c.add(5 * ldc), c50);
    _mm256_storeu_ps(c.add(5 * ldc + 8), c51);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_6x16_packs_and_reuses() {
        if !is_x86_feature_detected!("avx2") {
            println!("Skipping - AVX2 not available");
            return;
        }

        let kc = 16;
        let ldb = 32;
        let a: Vec<f32> = (0..MR * kc).map(|i| (i % 7) as f32).collect();
        let b: Vec<f32> = (0..kc * ldb).map(|i| (i % 9) as f32).collect();

        // Pack A: for each k position, 6 consecutive row values
        let mut a_pack = vec![0.0f32; kc * MR];
        for p in 0..kc {
            for i in 0..MR {
                a_pack[p * MR + i] = a[i * kc + p];
            }
        }

        let mut b_pack = vec![0.0f32; kc * NR];
        let mut c_first = vec![0.0f32; MR * NR];
        unsafe {
            kernel_6x16_avx2(
                a_pack.as_ptr(),
                b.as_ptr(),
                ldb,
                b_pack.as_mut_ptr(),
                c_first.as_mut_ptr(),
                NR,
                kc,
                true,
                true,
            );
        }

        // The strip captured on the fly must match the source rows
        for p in 0..kc {
            for j in 0..NR {
                assert_eq!(b_pack[p * NR + j], b[p * ldb + j]);
            }
        }

        // Second call reads the packed strip and must agree
        let mut c_reuse = vec![0.0f32; MR * NR];
        unsafe {
            kernel_6x16_avx2(
                a_pack.as_ptr(),
                std::ptr::null(),
                0,
                b_pack.as_mut_ptr(),
                c_reuse.as_mut_ptr(),
                NR,
                kc,
                true,
                false,
            );
        }
        assert_eq!(c_first, c_reuse);

        // Naive reference
        let mut c_expected = vec![0.0f32; MR * NR];
        for i in 0..MR {
            for j in 0..NR {
                for p in 0..kc {
                    c_expected[i * NR + j] += a[i * kc + p] * b[p * ldb + j];
                }
            }
        }

        for i in 0..MR * NR {
            assert!(
                (c_first[i] - c_expected[i]).abs() < 1e-4,
                "Mismatch at {}: got {}, expected {}",
                i,
                c_first[i],
                c_expected[i]
            );
        }
    }

    #[test]
    fn test_kernel_6x16_accumulates_across_k_blocks() {
        if !is_x86_feature_detected!("avx2") {
            println!("Skipping - AVX2 not available");
            return;
        }

        let kc = 8;
        let a_pack: Vec<f32> = (0..kc * MR).map(|i| (i % 5) as f32).collect();
        let mut b_pack: Vec<f32> = (0..kc * NR).map(|i| (i % 3) as f32).collect();

        // Garbage in C must be ignored when first_k is set
        let mut c = vec![123.0f32; MR * NR];
        unsafe {
            kernel_6x16_avx2(
                a_pack.as_ptr(),
                std::ptr::null(),
                0,
                b_pack.as_mut_ptr(),
                c.as_mut_ptr(),
                NR,
                kc,
                true,
                false,
            );
        }
        let after_first = c.clone();

        // A second K block with first_k = false doubles every element
        unsafe {
            kernel_6x16_avx2(
                a_pack.as_ptr(),
                std::ptr::null(),
                0,
                b_pack.as_mut_ptr(),
                c.as_mut_ptr(),
                NR,
                kc,
                false,
                false,
            );
        }
        for i in 0..MR * NR {
            assert_eq!(c[i], 2.0 * after_first[i]);
        }
    }
}
