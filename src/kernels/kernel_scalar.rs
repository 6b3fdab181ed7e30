//! Portable scalar microkernel - the ultimate fallback.

/// Computes an arbitrary mr×nr tile: C[0:mr, 0:nr] += A × B
///
/// Works on any target and any tile shape, so it closes every gap the
/// vector kernels leave (fewer than 4 rows, fewer than 8 columns) and
/// serves as the whole kernel set on machines without AVX2. Each update
/// uses `f32::mul_add`, keeping the fused multiply-add semantics of the
/// vector kernels: no intermediate rounding between multiply and add.
///
/// A is addressed through two strides so both layouts the scheduler
/// produces work unchanged:
/// - packed slice (element (i, p) at `p * mr + i`): `a_rs = 1, a_cs = mr`
/// - strided source (row-major, leading dimension lda): `a_rs = lda, a_cs = 1`
///
/// B is row-strided: element (p, j) at `p * ldb + j`. A packed 16-wide
/// strip is just `ldb = 16`.
///
/// # Safety
///
/// Caller must ensure:
/// - `a.add(i * a_rs + p * a_cs)` is valid for i in 0..mr, p in 0..kc
/// - `b.add(p * ldb + j)` is valid for p in 0..kc, j in 0..nr
/// - `c.add(i * ldc + j)` is valid for read/write for i in 0..mr, j in 0..nr
#[allow(clippy::too_many_arguments)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn kernel_scalar(
    a: *const f32,
    a_rs: usize,
    a_cs: usize,
    b: *const f32,
    ldb: usize,
    c: *mut f32,
    ldc: usize,
    mr: usize,
    nr: usize,
    kc: usize,
    first_k: bool,
) {
    for i in 0..mr {
        for j in 0..nr {
            let mut acc = if first_k { 0.0 } else { *c.add(i * ldc + j) };
            for p in 0..kc {
                acc = (*a.add(i * a_rs + p * a_cs)).mul_add(*b.add(p * ldb + j), acc);
            }
            *c.add(i * ldc + j) = acc;
        }
    }
}
