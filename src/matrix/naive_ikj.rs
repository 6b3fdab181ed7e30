/// Cache-friendly naive matrix product using i-k-j loop order: C = A·B.
///
/// Swapping the j and k loops makes the innermost loop walk both B and
/// C sequentially, which alone is worth several times the i-j-k order
/// on large matrices. Still scalar, still no blocking - this is the
/// baseline the blocked engine improves on.
///
/// # Arguments
///
/// * `a` - Matrix A (n × n), row-major
/// * `b` - Matrix B (n × n), row-major
/// * `c` - Matrix C (n × n), row-major, overwritten with the product
/// * `n` - Matrix dimension
pub fn matmul_naive_ikj(a: &[f32], b: &[f32], c: &mut [f32], n: usize) {
    for i in 0..n {
        c[i * n..(i + 1) * n].fill(0.0);
        for p in 0..n {
            let a_ip = a[i * n + p];
            for j in 0..n {
                c[i * n + j] += a_ip * b[p * n + j];
            }
        }
    }
}
