//! Portable blocked GEMM driver using the scalar microkernel.

use crate::kernels::kernel_scalar::kernel_scalar;
use crate::kernels::{MR, NR};
use crate::packing::{pack_a_block, pack_a_slice, pack_b_block, pack_b_strip};
use crate::params::{BlockingParams, PackingPolicy};

/// Cache-blocked single-precision matrix product C = A·B without SIMD.
///
/// Same block nest, packing discipline and `first_k` accumulation
/// contract as the AVX2 driver, but every tile goes through the scalar
/// kernel. This is the fallback on targets without AVX2+FMA and the
/// portable reference the SIMD path is checked against - cache blocking
/// and packing still pay off here, just without the vector speedup.
///
/// Panics on slice-length mismatches or invalid blocking parameters.
pub fn gemm_blocked_scalar(
    a: &[f32],
    b: &[f32],
    c: &mut [f32],
    n: usize,
    params: &BlockingParams,
) {
    assert_eq!(a.len(), n * n, "A: expected {}x{}={} elements", n, n, n * n);
    assert_eq!(b.len(), n * n, "B: expected {}x{}={} elements", n, n, n * n);
    assert_eq!(c.len(), n * n, "C: expected {}x{}={} elements", n, n, n * n);
    params.validate();

    let BlockingParams { mc, kc, nc, policy } = *params;
    let lazy = policy == PackingPolicy::Lazy;

    let mut a_panel = vec![0.0f32; mc.div_ceil(MR) * MR * kc];
    let mut b_panel = vec![0.0f32; kc * nc];
    let mut b_ready = vec![false; nc / NR];

    for jc in (0..n).step_by(nc) {
        let nc_eff = nc.min(n - jc);
        let strips = nc_eff / NR;
        let tail = nc_eff - strips * NR;
        let tail_col = jc + strips * NR;

        for pc in (0..n).step_by(kc) {
            let kc_eff = kc.min(n - pc);
            let first_k = pc == 0;
            b_ready[..strips].fill(false);
            if !lazy {
                pack_b_block(b, n, pc, jc, kc_eff, nc_eff, &mut b_panel);
                b_ready[..strips].fill(true);
            }

            for ic in (0..n).step_by(mc) {
                let mc_eff = mc.min(n - ic);

                if !lazy {
                    pack_a_block(a, n, ic, pc, mc_eff, kc_eff, &mut a_panel);
                }

                let mut ir = 0;
                while ir + MR <= mc_eff {
                    let slice_off = (ir / MR) * MR * kc_eff;
                    if lazy {
                        let dst = &mut a_panel[slice_off..slice_off + MR * kc_eff];
                        pack_a_slice(a, n, ic + ir, pc, MR, kc_eff, dst);
                    }

                    for s in 0..strips {
                        if !b_ready[s] {
                            let dst = &mut b_panel[s * kc_eff * NR..(s + 1) * kc_eff * NR];
                            pack_b_strip(b, n, pc, jc + s * NR, kc_eff, NR, dst);
                            b_ready[s] = true;
                        }
                        let col = jc + s * NR;
                        unsafe {
                            kernel_scalar(
                                a_panel.as_ptr().add(slice_off),
                                1,
                                MR,
                                b_panel.as_ptr().add(s * kc_eff * NR),
                                NR,
                                c.as_mut_ptr().add((ic + ir) * n + col),
                                n,
                                MR,
                                NR,
                                kc_eff,
                                first_k,
                            );
                        }
                    }
                    if tail > 0 {
                        unsafe {
                            kernel_scalar(
                                a_panel.as_ptr().add(slice_off),
                                1,
                                MR,
                                b.as_ptr().add(pc * n + tail_col),
                                n,
                                c.as_mut_ptr().add((ic + ir) * n + tail_col),
                                n,
                                MR,
                                tail,
                                kc_eff,
                                first_k,
                            );
                        }
                    }
                    ir += MR;
                }

                // Leftover rows (< MR): stream A from the strided source
                if ir < mc_eff {
                    let rows = mc_eff - ir;
                    for s in 0..strips {
                        if !b_ready[s] {
                            let dst = &mut b_panel[s * kc_eff * NR..(s + 1) * kc_eff * NR];
                            pack_b_strip(b, n, pc, jc + s * NR, kc_eff, NR, dst);
                            b_ready[s] = true;
                        }
                        let col = jc + s * NR;
                        unsafe {
                            kernel_scalar(
                                a.as_ptr().add((ic + ir) * n + pc),
                                n,
                                1,
                                b_panel.as_ptr().add(s * kc_eff * NR),
                                NR,
                                c.as_mut_ptr().add((ic + ir) * n + col),
                                n,
                                rows,
                                NR,
                                kc_eff,
                                first_k,
                            );
                        }
                    }
                    if tail > 0 {
                        unsafe {
                            kernel_scalar(
                                a.as_ptr().add((ic + ir) * n + pc),
                                n,
                                1,
                                b.as_ptr().add(pc * n + tail_col),
                                n,
                                c.as_mut_ptr().add((ic + ir) * n + tail_col),
                                n,
                                rows,
                                tail,
                                kc_eff,
                                first_k,
                            );
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::naive_ijk::matmul_naive_ijk;

    fn check(n: usize, params: &BlockingParams) {
        let a: Vec<f32> = (0..n * n).map(|i| (i % 9) as f32).collect();
        let b: Vec<f32> = (0..n * n).map(|i| (i % 11) as f32).collect();

        let mut c_naive = vec![0.0f32; n * n];
        matmul_naive_ijk(&a, &b, &mut c_naive, n);

        let mut c_gemm = vec![f32::NAN; n * n];
        gemm_blocked_scalar(&a, &b, &mut c_gemm, n, params);

        for i in 0..n * n {
            assert!(
                (c_naive[i] - c_gemm[i]).abs() < 1e-3,
                "n={}: mismatch at {}: naive={}, gemm={}",
                n,
                i,
                c_naive[i],
                c_gemm[i]
            );
        }
    }

    #[test]
    fn test_gemm_scalar_small_and_odd_sizes() {
        for n in [1, 2, 3, 5, 6, 7, 15, 16, 17, 31, 48, 50] {
            check(n, &BlockingParams::DEFAULT);
            check(n, &BlockingParams::TUNED);
        }
    }

    #[test]
    fn test_gemm_scalar_tight_blocks() {
        for policy in [PackingPolicy::Eager, PackingPolicy::Lazy] {
            check(40, &BlockingParams::new(6, 4, 16, policy));
            check(37, &BlockingParams::new(12, 8, 32, policy));
        }
    }
}
