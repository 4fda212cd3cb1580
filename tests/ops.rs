//! Integration tests for addition and inversion error signalling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use square_matrix::{Matrix, MatrixError};

fn multiply(a: &Matrix<f64>, b: &Matrix<f64>) -> Matrix<f64> {
    let n = a.size();
    Matrix::from_fn(n, |i, j| (0..n).map(|k| a[(i, k)] * b[(k, j)]).sum())
}

fn assert_close(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64) {
    assert_eq!(a.size(), b.size());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < tol, "{} vs {}\n{}\n---\n{}", x, y, a, b);
    }
}

// ---------------------------------------------------------------------------
// Addition
// ---------------------------------------------------------------------------

#[test]
fn add_different_sizes_reports_both() {
    let mut a = Matrix::<i64>::try_new(3, 1).unwrap();
    let b = Matrix::<i64>::try_new(17, 1).unwrap();
    let before = a.clone();

    let err = a.try_add_assign(&b).unwrap_err();
    assert!(matches!(
        err,
        MatrixError::DimensionMismatch {
            left: 3,
            right: 17
        }
    ));
    assert_eq!(err.dimensions(), Some((3, 17)));
    assert_eq!(err.to_string(), "different sizes: 3 and 17");
    assert_eq!(a, before);
}

#[test]
fn checked_add_different_sizes_reports_both() {
    let a = Matrix::<f32>::zeros(17);
    let b = Matrix::<f32>::zeros(3);
    let err = a.checked_add(&b).unwrap_err();
    assert_eq!(err.dimensions(), Some((17, 3)));
}

#[test]
fn add_is_element_wise() {
    let mut a = Matrix::from_fn(3, |r, c| (r * 3 + c) as i32);
    let b = Matrix::new(3, 10);
    let sum = a.checked_add(&b).unwrap();
    a.try_add_assign(&b).unwrap();
    assert_eq!(a, sum);
    assert_eq!(a.row(0), &[10, 1, 2]);
    assert_eq!(a.row(2), &[6, 7, 18]);
}

#[test]
fn other_errors_carry_no_dimensions() {
    assert_eq!(MatrixError::Singular.dimensions(), None);
}

// ---------------------------------------------------------------------------
// Inversion
// ---------------------------------------------------------------------------

#[test]
fn inverse_of_known_matrix() {
    let a = Matrix::try_from(vec![vec![4.0, 7.0], vec![2.0, 6.0]]).unwrap();
    let inv = a.inverse().unwrap();
    let expected = Matrix::try_from(vec![vec![0.6, -0.7], vec![-0.2, 0.4]]).unwrap();
    assert_close(&inv, &expected, 1e-12);
}

#[test]
fn inverse_needs_row_exchange() {
    let a = Matrix::try_from(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
    let inv = a.inverse().unwrap();
    assert_close(&inv, &a, 1e-12);
}

#[test]
fn inverse_of_singular_matrix_fails() {
    let a = Matrix::try_from(vec![
        vec![1.0, 2.0, 3.0],
        vec![2.0, 4.0, 6.0],
        vec![0.0, 1.0, 1.0],
    ])
    .unwrap();
    assert!(matches!(a.inverse(), Err(MatrixError::Singular)));
}

#[test]
fn inverse_of_zero_matrix_fails() {
    let z = Matrix::<f64>::zeros(4);
    assert!(matches!(z.inverse(), Err(MatrixError::Singular)));
}

#[test]
fn inverse_of_nan_matrix_fails() {
    let m = Matrix::new(2, f32::NAN);
    assert!(matches!(m.inverse(), Err(MatrixError::Singular)));
}

#[test]
fn inverse_of_identity_and_empty() {
    let id = Matrix::<f64>::identity(5);
    assert_eq!(id.inverse().unwrap(), id);

    let empty = Matrix::<f64>::default();
    assert!(empty.inverse().unwrap().is_empty());
}

#[test]
fn random_matrices_invert() {
    let mut rng = StdRng::seed_from_u64(21);
    for n in 1..8 {
        let a = Matrix::from_fn(n, |r, c| {
            let v: f64 = rng.gen_range(-1.0..1.0);
            // diagonally dominant, so never singular
            if r == c {
                v + n as f64 + 1.0
            } else {
                v
            }
        });
        let inv = a.inverse().unwrap();
        assert_close(&multiply(&a, &inv), &Matrix::identity(n), 1e-9);
        assert_close(&multiply(&inv, &a), &Matrix::identity(n), 1e-9);
    }
}
