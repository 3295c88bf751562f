use super::*;

#[test]
fn test_from_vec() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-6);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-6);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0]);
    assert!(result.is_err());
}

#[test]
fn test_zeros() {
    let m = Matrix::<f32>::zeros(2, 3);
    assert_eq!(m.shape(), (2, 3));
    assert!(m.as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn test_from_rows() {
    let m = Matrix::from_rows(vec![vec![1.0_f32, 2.0], vec![3.0, 4.0]], 2)
        .expect("rows have consistent length 2");
    assert_eq!(m.shape(), (2, 2));
    assert!((m.get(1, 0) - 3.0).abs() < 1e-6);
}

#[test]
fn test_from_rows_inconsistent_length_error() {
    let result = Matrix::from_rows(vec![vec![1.0_f32, 2.0], vec![3.0]], 2);
    assert!(result.is_err());
}

#[test]
fn test_transpose() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let t = m.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert!((t.get(0, 0) - 1.0).abs() < 1e-6);
    assert!((t.get(0, 1) - 4.0).abs() < 1e-6);
    assert!((t.get(2, 1) - 6.0).abs() < 1e-6);
}

#[test]
fn test_row() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let row = m.row(1);
    assert_eq!(row.len(), 3);
    assert!((row[0] - 4.0).abs() < 1e-6);
    assert!((row[1] - 5.0).abs() < 1e-6);
    assert!((row[2] - 6.0).abs() < 1e-6);
}

#[test]
fn test_row_slice() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.row_slice(0), &[1.0, 2.0, 3.0]);
    assert_eq!(m.row_slice(1), &[4.0, 5.0, 6.0]);
}

#[test]
fn test_matmul() {
    // 2x3 * 3x2 = 2x2
    let a = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let b = Matrix::from_vec(3, 2, vec![7.0_f32, 8.0, 9.0, 10.0, 11.0, 12.0])
        .expect("test data has correct dimensions: 3*2=6 elements");
    let c = a
        .matmul(&b)
        .expect("matrix dimensions are compatible for multiplication: 2x3 * 3x2");

    assert_eq!(c.shape(), (2, 2));
    // c[0,0] = 1*7 + 2*9 + 3*11 = 7 + 18 + 33 = 58
    assert!((c.get(0, 0) - 58.0).abs() < 1e-6);
    // c[0,1] = 1*8 + 2*10 + 3*12 = 8 + 20 + 36 = 64
    assert!((c.get(0, 1) - 64.0).abs() < 1e-6);
}

#[test]
fn test_matmul_dimension_error() {
    let a = Matrix::from_vec(2, 3, vec![1.0_f32; 6])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let b = Matrix::from_vec(2, 2, vec![1.0_f32; 4])
        .expect("test data has correct dimensions: 2*2=4 elements");
    assert!(a.matmul(&b).is_err());
}

#[test]
fn test_matvec() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let v = Vector::from_slice(&[1.0_f32, 2.0, 3.0]);
    let result = m
        .matvec(&v)
        .expect("matrix columns match vector length: both 3");

    assert_eq!(result.len(), 2);
    // result[0] = 1*1 + 2*2 + 3*3 = 14
    assert!((result[0] - 14.0).abs() < 1e-6);
    // result[1] = 4*1 + 5*2 + 6*3 = 32
    assert!((result[1] - 32.0).abs() < 1e-6);
}

#[test]
fn test_cholesky_solve() {
    // Solve A*x = b where A is symmetric positive definite
    // A = [[4, 2], [2, 3]]
    // b = [1, 2]
    // Solution: x = [-0.125, 0.75]
    let a = Matrix::from_vec(2, 2, vec![4.0_f32, 2.0, 2.0, 3.0])
        .expect("test data has correct dimensions: 2*2=4 elements");
    let b = Vector::from_slice(&[1.0_f32, 2.0]);
    let x = a
        .cholesky_solve(&b)
        .expect("matrix is square, symmetric positive definite, and vector matches size");

    assert_eq!(x.len(), 2);
    assert!((x[0] - (-0.125)).abs() < 1e-5);
    assert!((x[1] - 0.75).abs() < 1e-5);
}

#[test]
fn test_cholesky_solve_3x3() {
    // A = [[9, 3, 3], [3, 5, 1], [3, 1, 4]], b = [15, 9, 8] => x = [1, 1, 1]
    let a = Matrix::from_vec(3, 3, vec![9.0_f32, 3.0, 3.0, 3.0, 5.0, 1.0, 3.0, 1.0, 4.0])
        .expect("test data has correct dimensions: 3*3=9 elements");
    let b = Vector::from_slice(&[15.0_f32, 9.0, 8.0]);
    let x = a
        .cholesky_solve(&b)
        .expect("matrix is square, symmetric positive definite, and vector matches size");

    assert!((x[0] - 1.0).abs() < 1e-6);
    assert!((x[1] - 1.0).abs() < 1e-6);
    assert!((x[2] - 1.0).abs() < 1e-6);

    // Verify A*x = b
    let verify = a
        .matvec(&x)
        .expect("matrix columns match vector length: both 3");
    assert!((verify[0] - 15.0).abs() < 1e-6);
    assert!((verify[1] - 9.0).abs() < 1e-6);
    assert!((verify[2] - 8.0).abs() < 1e-6);
}

#[test]
fn test_cholesky_solve_not_positive_definite() {
    let a = Matrix::from_vec(2, 2, vec![0.0_f32, 1.0, 1.0, 0.0])
        .expect("test data has correct dimensions: 2*2=4 elements");
    let b = Vector::from_slice(&[1.0_f32, 1.0]);
    assert!(a.cholesky_solve(&b).is_err());
}

#[test]
fn test_cholesky_solve_not_square() {
    let a = Matrix::from_vec(2, 3, vec![1.0_f32; 6])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let b = Vector::from_slice(&[1.0_f32, 1.0]);
    assert!(a.cholesky_solve(&b).is_err());
}

#[test]
fn test_set() {
    let mut m = Matrix::<f32>::zeros(2, 2);
    m.set(0, 1, 5.0);
    assert!((m.get(0, 1) - 5.0).abs() < 1e-6);
}
