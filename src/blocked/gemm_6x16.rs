//! Blocked GEMM driver around the 6×16 AVX2 kernel family.

use crate::kernels::kernel_4x16::kernel_4x16_avx2;
use crate::kernels::kernel_6x16::kernel_6x16_avx2;
use crate::kernels::kernel_edge::{kernel_4x8_avx2, kernel_6x8_avx2};
use crate::kernels::kernel_scalar::kernel_scalar;
use crate::kernels::{MR, MR_EDGE, NR, NR_EDGE};
use crate::packing::{pack_a_block, pack_a_slice, pack_b_block, pack_b_strip};
use crate::params::{BlockingParams, PackingPolicy};

/// Cache-blocked single-precision matrix product C = A·B using the
/// 6×16 AVX2 kernel family.
///
/// Loop nest: `jc` over N blocks (step NC), `pc` over K blocks (step KC,
/// `first_k = (pc == 0)` zero-initializes each output tile exactly once),
/// `ic` over M blocks (step MC). Within a block, A slices are packed
/// eagerly per (ic, pc) or lazily per row pass depending on the policy.
/// Full 16-wide B strips are packed once per (pc, jc) pair: up front
/// under the eager policy, or on their first read under the lazy one -
/// fused into the wide kernel's first pass when possible - and reused by
/// every later tile and M block of that pair.
///
/// Row remainders cascade 6 → 4 → scalar, column remainders 16 → 8 →
/// scalar, so any n ≥ 1 is handled.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX2 and FMA. Slice lengths are
/// checked against `n` and panic on mismatch.
#[target_feature(enable = "avx2,fma")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn gemm_blocked_6x16(
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

    // Scratch panels, allocated once per invocation and reused for every
    // block. Freed on all exit paths, panics included.
    let mut a_panel = vec![0.0f32; mc.div_ceil(MR) * MR * kc];
    let mut a_edge = vec![0.0f32; MR_EDGE * kc];
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
            // Packed B belongs to this (pc, jc) pair
            b_ready[..strips].fill(false);
            if !lazy {
                // Eager: every full strip of the B block packed up front,
                // once per (pc, jc)
                pack_b_block(b, n, pc, jc, kc_eff, nc_eff, &mut b_panel);
                b_ready[..strips].fill(true);
            }

            for ic in (0..n).step_by(mc) {
                let mc_eff = mc.min(n - ic);

                if !lazy {
                    // Eager: whole A block packed before any kernel call
                    pack_a_block(a, n, ic, pc, mc_eff, kc_eff, &mut a_panel);
                }

                // Full 6-row tiles
                let mut ir = 0;
                while ir + MR <= mc_eff {
                    let slice_off = (ir / MR) * MR * kc_eff;
                    if lazy {
                        // Just-in-time: pack this slice right before its
                        // sweep so it is still hot when the kernel reads it
                        let dst = &mut a_panel[slice_off..slice_off + MR * kc_eff];
                        pack_a_slice(a, n, ic + ir, pc, MR, kc_eff, dst);
                    }
                    let a_slice = a_panel.as_ptr().add(slice_off);

                    for s in 0..strips {
                        let col = jc + s * NR;
                        let b_strip = b_panel.as_mut_ptr().add(s * kc_eff * NR);
                        let c_tile = c.as_mut_ptr().add((ic + ir) * n + col);
                        if b_ready[s] {
                            kernel_6x16_avx2(
                                a_slice,
                                std::ptr::null(),
                                0,
                                b_strip,
                                c_tile,
                                n,
                                kc_eff,
                                first_k,
                                false,
                            );
                        } else {
                            // First read of this strip: capture the rows
                            // streaming through registers into the panel
                            kernel_6x16_avx2(
                                a_slice,
                                b.as_ptr().add(pc * n + col),
                                n,
                                b_strip,
                                c_tile,
                                n,
                                kc_eff,
                                first_k,
                                true,
                            );
                            b_ready[s] = true;
                        }
                    }

                    if tail >= NR_EDGE {
                        kernel_6x8_avx2(
                            a_slice,
                            b.as_ptr().add(pc * n + tail_col),
                            n,
                            c.as_mut_ptr().add((ic + ir) * n + tail_col),
                            n,
                            kc_eff,
                            first_k,
                        );
                    }
                    let rem = if tail >= NR_EDGE { tail - NR_EDGE } else { tail };
                    if rem > 0 {
                        let col = jc + nc_eff - rem;
                        kernel_scalar(
                            a_slice,
                            1,
                            MR,
                            b.as_ptr().add(pc * n + col),
                            n,
                            c.as_mut_ptr().add((ic + ir) * n + col),
                            n,
                            MR,
                            rem,
                            kc_eff,
                            first_k,
                        );
                    }
                    ir += MR;
                }

                // 4-row remainder tile (4 or 5 rows left)
                if mc_eff - ir >= MR_EDGE {
                    pack_a_slice(a, n, ic + ir, pc, MR_EDGE, kc_eff, &mut a_edge);
                    for s in 0..strips {
                        if !b_ready[s] {
                            let dst = &mut b_panel[s * kc_eff * NR..(s + 1) * kc_eff * NR];
                            pack_b_strip(b, n, pc, jc + s * NR, kc_eff, NR, dst);
                            b_ready[s] = true;
                        }
                        let col = jc + s * NR;
                        kernel_4x16_avx2(
                            a_edge.as_ptr(),
                            b_panel.as_ptr().add(s * kc_eff * NR),
                            c.as_mut_ptr().add((ic + ir) * n + col),
                            n,
                            kc_eff,
                            first_k,
                        );
                    }
                    if tail >= NR_EDGE {
                        kernel_4x8_avx2(
                            a_edge.as_ptr(),
                            b.as_ptr().add(pc * n + tail_col),
                            n,
                            c.as_mut_ptr().add((ic + ir) * n + tail_col),
                            n,
                            kc_eff,
                            first_k,
                        );
                    }
                    let rem = if tail >= NR_EDGE { tail - NR_EDGE } else { tail };
                    if rem > 0 {
                        let col = jc + nc_eff - rem;
                        kernel_scalar(
                            a_edge.as_ptr(),
                            1,
                            MR_EDGE,
                            b.as_ptr().add(pc * n + col),
                            n,
                            c.as_mut_ptr().add((ic + ir) * n + col),
                            n,
                            MR_EDGE,
                            rem,
                            kc_eff,
                            first_k,
                        );
                    }
                    ir += MR_EDGE;
                }

                // Fewer than 4 rows left: scalar over the strided source
                if ir < mc_eff {
                    let rows = mc_eff - ir;
                    let a_rows = a.as_ptr().add((ic + ir) * n + pc);
                    for s in 0..strips {
                        if !b_ready[s] {
                            let dst = &mut b_panel[s * kc_eff * NR..(s + 1) * kc_eff * NR];
                            pack_b_strip(b, n, pc, jc + s * NR, kc_eff, NR, dst);
                            b_ready[s] = true;
                        }
                        let col = jc + s * NR;
                        kernel_scalar(
                            a_rows,
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
                    if tail > 0 {
                        kernel_scalar(
                            a_rows,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::naive_ijk::matmul_naive_ijk;

    fn check(n: usize, params: &BlockingParams) {
        let a: Vec<f32> = (0..n * n).map(|i| (i % 10) as f32).collect();
        let b: Vec<f32> = (0..n * n).map(|i| (i % 7) as f32).collect();

        let mut c_naive = vec![0.0f32; n * n];
        matmul_naive_ijk(&a, &b, &mut c_naive, n);

        let mut c_gemm = vec![f32::NAN; n * n];
        unsafe {
            gemm_blocked_6x16(&a, &b, &mut c_gemm, n, params);
        }

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
    fn test_gemm_6x16_multiple_of_tile() {
        if !is_x86_feature_detected!("avx2") {
            println!("Skipping - AVX2 not available");
            return;
        }
        // 48 = lcm(6, 16); every tile is a full 6x16
        for n in [48, 96] {
            check(n, &BlockingParams::DEFAULT);
            check(n, &BlockingParams::TUNED);
        }
    }

    #[test]
    fn test_gemm_6x16_remainder_cascade() {
        if !is_x86_feature_detected!("avx2") {
            println!("Skipping - AVX2 not available");
            return;
        }
        // Row remainders 1..5 and column remainders covering
        // scalar-only (<8), exactly 8, and 8-plus-scalar tails
        for n in [49, 50, 51, 52, 53, 56, 59, 63, 65, 67, 71, 77] {
            check(n, &BlockingParams::DEFAULT);
            check(n, &BlockingParams::TUNED);
        }
    }

    #[test]
    fn test_gemm_6x16_blocks_smaller_than_matrix() {
        if !is_x86_feature_detected!("avx2") {
            println!("Skipping - AVX2 not available");
            return;
        }
        // Force several iterations of every block loop
        for policy in [PackingPolicy::Eager, PackingPolicy::Lazy] {
            check(100, &BlockingParams::new(12, 16, 32, policy));
            check(97, &BlockingParams::new(6, 8, 16, policy));
        }
    }
}
