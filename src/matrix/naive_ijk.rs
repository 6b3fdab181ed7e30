/// Naive matrix product using i-j-k loop order: C = A·B.
///
/// The textbook triple loop. The innermost loop walks B column-wise
/// with stride `n`, missing cache on nearly every access, so this runs
/// at a few percent of peak. It is the trusted reference every
/// optimized path is compared against.
///
/// # Arguments
///
/// * `a` - Matrix A (n × n), row-major
/// * `b` - Matrix B (n × n), row-major
/// * `c` - Matrix C (n × n), row-major, overwritten with the product
/// * `n` - Matrix dimension
pub fn matmul_naive_ijk(a: &[f32], b: &[f32], c: &mut [f32], n: usize) {
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0f32;
            for p in 0..n {
                sum += a[i * n + p] * b[p * n + j];
            }
            c[i * n + j] = sum;
        }
    }
}
