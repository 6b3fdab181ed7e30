//! Operand packing: relayout strided sub-blocks into kernel read order.
//!
//! The microkernels stream their operands sequentially. Packing copies a
//! strided sub-block of the source matrix into a contiguous scratch buffer
//! laid out exactly in that read order:
//!
//! - An A slice of `mr` rows × `kc` columns becomes `dst[p * mr + i]`, so
//!   each rank-1 step reads `mr` neighbouring values to broadcast.
//! - A B strip of `kc` rows × `nr` columns becomes `dst[p * nr + j]`, so
//!   each rank-1 step reads one contiguous `nr`-float row.
//!
//! Packing is a pure function of the source region: packing the same
//! offsets twice produces bit-identical buffers, and the scheduler only
//! repacks a buffer when its source indices change (pack once, read many).

use crate::kernels::{MR, NR};

/// Pack one A slice of `mr` rows × `kc` columns starting at
/// `(row, col)` of the row-major source `a` (leading dimension `lda`).
///
/// Destination layout: `dst[p * mr + i] = a[(row + i) * lda + col + p]`.
///
/// Panics if the requested region or `dst` is too small - packing past
/// the end of an operand is a scheduler bug, not a runtime condition.
pub fn pack_a_slice(
    a: &[f32],
    lda: usize,
    row: usize,
    col: usize,
    mr: usize,
    kc: usize,
    dst: &mut [f32],
) {
    assert!(mr * kc <= dst.len(), "packed A slice does not fit dst");
    assert!((row + mr - 1) * lda + col + kc <= a.len(), "A slice out of bounds");

    for p in 0..kc {
        for i in 0..mr {
            dst[p * mr + i] = a[(row + i) * lda + col + p];
        }
    }
}

/// Eagerly pack every full MR-row slice of an MC×KC block of A.
///
/// Slice s lands at `dst[s * MR * kc ..]`. Rows past the last full
/// slice (`mc % MR`) are left to the edge path, which packs or streams
/// them itself.
pub fn pack_a_block(
    a: &[f32],
    lda: usize,
    ic: usize,
    pc: usize,
    mc: usize,
    kc: usize,
    dst: &mut [f32],
) {
    let full = mc / MR;
    for s in 0..full {
        pack_a_slice(a, lda, ic + s * MR, pc, MR, kc, &mut dst[s * MR * kc..(s + 1) * MR * kc]);
    }
}

/// Pack one B strip of `kc` rows × `nr` columns starting at `(row, col)`
/// of the row-major source `b` (leading dimension `ldb`).
///
/// Destination layout: `dst[p * nr + j] = b[(row + p) * ldb + col + j]`.
pub fn pack_b_strip(
    b: &[f32],
    ldb: usize,
    row: usize,
    col: usize,
    kc: usize,
    nr: usize,
    dst: &mut [f32],
) {
    assert!(kc * nr <= dst.len(), "packed B strip does not fit dst");
    assert!((row + kc - 1) * ldb + col + nr <= b.len(), "B strip out of bounds");

    for p in 0..kc {
        dst[p * nr..p * nr + nr].copy_from_slice(&b[(row + p) * ldb + col..(row + p) * ldb + col + nr]);
    }
}

/// Eagerly pack every full NR-wide strip of a KC×NC block of B.
///
/// Strip s lands at `dst[s * kc * NR ..]`. Leftover columns
/// (`nc % NR`) stay unpacked; the column-remainder kernels read them
/// from the strided source.
pub fn pack_b_block(
    b: &[f32],
    ldb: usize,
    pc: usize,
    jc: usize,
    kc: usize,
    nc: usize,
    dst: &mut [f32],
) {
    let strips = nc / NR;
    for s in 0..strips {
        pack_b_strip(b, ldb, pc, jc + s * NR, kc, NR, &mut dst[s * kc * NR..(s + 1) * kc * NR]);
    }
}
