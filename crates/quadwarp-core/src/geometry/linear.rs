//! Dense linear system solver.
//!
//! Solves `A·x = b` for square systems by Gaussian elimination with partial
//! pivoting followed by back substitution. The system size is a const
//! generic so the homography estimator can work on stack-allocated 8×8
//! matrices without any dimension checks at runtime.

use super::GeometryError;

/// Smallest acceptable pivot, relative to the largest absolute entry of `A`.
pub const PIVOT_EPSILON: f64 = 1e-12;

/// Solve the square linear system `a·x = b`.
///
/// At each elimination step the row with the largest absolute value in the
/// pivot column is swapped into place (ties keep the upper row). The inputs
/// are taken by value and consumed.
///
/// # Errors
///
/// Returns [`GeometryError::SingularSystem`] if a pivot falls below
/// [`PIVOT_EPSILON`] scaled by the largest entry of `a`, if `a` contains
/// non-finite values, or if the solution is not finite.
pub fn solve<const N: usize>(
    mut a: [[f64; N]; N],
    mut b: [f64; N],
) -> Result<[f64; N], GeometryError> {
    let scale = a
        .iter()
        .flatten()
        .fold(0.0f64, |max, v| max.max(v.abs()));
    if !scale.is_finite() || a.iter().flatten().any(|v| v.is_nan()) {
        return Err(GeometryError::SingularSystem);
    }
    let threshold = if scale > 0.0 {
        PIVOT_EPSILON * scale
    } else {
        PIVOT_EPSILON
    };

    // Forward elimination
    for col in 0..N {
        let mut pivot_row = col;
        let mut pivot_abs = a[col][col].abs();
        for row in (col + 1)..N {
            let v = a[row][col].abs();
            if v > pivot_abs {
                pivot_abs = v;
                pivot_row = row;
            }
        }

        if pivot_abs < threshold {
            return Err(GeometryError::SingularSystem);
        }

        if pivot_row != col {
            a.swap(col, pivot_row);
            b.swap(col, pivot_row);
        }

        let pivot = a[col];
        for row in (col + 1)..N {
            let factor = a[row][col] / pivot[col];
            if factor == 0.0 {
                continue;
            }
            for k in col..N {
                a[row][k] -= factor * pivot[k];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution
    let mut x = [0.0f64; N];
    for i in (0..N).rev() {
        let sum: f64 = ((i + 1)..N).map(|j| a[i][j] * x[j]).sum();
        x[i] = (b[i] - sum) / a[i][i];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(GeometryError::SingularSystem);
    }

    Ok(x)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: For diagonally dominant systems, A·x reproduces b.
        #[test]
        fn prop_solution_satisfies_system(
            entries in prop::array::uniform4(prop::array::uniform4(-10.0f64..10.0)),
            b in prop::array::uniform4(-100.0f64..100.0),
        ) {
            let mut a = entries;
            for (i, row) in a.iter_mut().enumerate() {
                // Make the matrix strictly diagonally dominant (non-singular)
                let off: f64 = row.iter().map(|v| v.abs()).sum();
                row[i] = off + 1.0;
            }

            let x = solve(a, b).unwrap();
            for i in 0..4 {
                let lhs: f64 = (0..4).map(|j| a[i][j] * x[j]).sum();
                prop_assert!((lhs - b[i]).abs() < 1e-6, "row {}: {} vs {}", i, lhs, b[i]);
            }
        }

        /// Property: A solve never returns non-finite values.
        #[test]
        fn prop_never_returns_nan(
            a in prop::array::uniform3(prop::array::uniform3(-5.0f64..5.0)),
            b in prop::array::uniform3(-5.0f64..5.0),
        ) {
            if let Ok(x) = solve(a, b) {
                prop_assert!(x.iter().all(|v| v.is_finite()));
            }
        }
    }
}
