//! Closed-form least squares for a three-feature linear model.
//!
//! Model:
//! - Center every column and the target.
//! - Solve the centered normal equations `S b = s` with the pseudo-inverse of
//!   `S` (Jacobi eigen-decomposition), so constant or collinear columns get the
//!   minimum-norm solution instead of a singular-matrix failure.
//! - Recover the intercept from the means.

use serde::{Deserialize, Serialize};

const FEATURES: usize = 3;

/// Eigenvalues below `RELATIVE_TOLERANCE * max_eigenvalue` are treated as zero.
const RELATIVE_TOLERANCE: f64 = 1e-10;
const MAX_SWEEPS: usize = 64;

/// Fitted parameters of `units = intercept + month*m + year*y + category*c`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub intercept: f64,
    pub month: f64,
    pub year: f64,
    pub category: f64,
}

impl Coefficients {
    pub fn predict(&self, x: [f64; FEATURES]) -> f64 {
        self.intercept + self.month * x[0] + self.year * x[1] + self.category * x[2]
    }
}

/// Fit by least squares. Returns `None` when there are no samples.
pub fn fit(features: &[[f64; FEATURES]], targets: &[f64]) -> Option<Coefficients> {
    let n = features.len().min(targets.len());
    if n == 0 {
        return None;
    }
    let nf = n as f64;

    let mut x_mean = [0.0; FEATURES];
    for x in &features[..n] {
        for j in 0..FEATURES {
            x_mean[j] += x[j];
        }
    }
    for m in &mut x_mean {
        *m /= nf;
    }
    let y_mean = targets[..n].iter().sum::<f64>() / nf;

    // Centered scatter matrix and cross-covariance vector.
    let mut s = [[0.0; FEATURES]; FEATURES];
    let mut sy = [0.0; FEATURES];
    for (x, &y) in features[..n].iter().zip(&targets[..n]) {
        let d = [x[0] - x_mean[0], x[1] - x_mean[1], x[2] - x_mean[2]];
        let dy = y - y_mean;
        for i in 0..FEATURES {
            sy[i] += d[i] * dy;
            for j in 0..FEATURES {
                s[i][j] += d[i] * d[j];
            }
        }
    }

    let b = pseudo_solve(s, sy);
    let intercept = y_mean - (b[0] * x_mean[0] + b[1] * x_mean[1] + b[2] * x_mean[2]);

    Some(Coefficients {
        intercept,
        month: b[0],
        year: b[1],
        category: b[2],
    })
}

/// `S⁺ rhs` for a symmetric positive semi-definite `S`.
fn pseudo_solve(s: [[f64; FEATURES]; FEATURES], rhs: [f64; FEATURES]) -> [f64; FEATURES] {
    let (values, vectors) = symmetric_eigen(s);
    let max = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let mut out = [0.0; FEATURES];
    if max == 0.0 {
        return out;
    }

    for k in 0..FEATURES {
        let lambda = values[k];
        if lambda <= max * RELATIVE_TOLERANCE {
            continue;
        }
        // Projection of rhs on eigenvector k (column k of `vectors`).
        let proj: f64 = (0..FEATURES).map(|i| vectors[i][k] * rhs[i]).sum();
        for i in 0..FEATURES {
            out[i] += vectors[i][k] * proj / lambda;
        }
    }
    out
}

/// Cyclic Jacobi eigen-decomposition. Returns eigenvalues and eigenvectors as columns.
fn symmetric_eigen(mut a: [[f64; FEATURES]; FEATURES]) -> ([f64; FEATURES], [[f64; FEATURES]; FEATURES]) {
    let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    for _ in 0..MAX_SWEEPS {
        let off: f64 = a[0][1].powi(2) + a[0][2].powi(2) + a[1][2].powi(2);
        let diag: f64 = a[0][0].powi(2) + a[1][1].powi(2) + a[2][2].powi(2);
        if off <= f64::EPSILON * f64::EPSILON * diag || off == 0.0 {
            break;
        }

        for p in 0..FEATURES - 1 {
            for q in p + 1..FEATURES {
                if a[p][q] == 0.0 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..FEATURES {
                    let (akp, akq) = (a[k][p], a[k][q]);
                    a[k][p] = c * akp - s * akq;
                    a[k][q] = s * akp + c * akq;
                }
                for k in 0..FEATURES {
                    let (apk, aqk) = (a[p][k], a[q][k]);
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for row in &mut v {
                    let (vkp, vkq) = (row[p], row[q]);
                    row[p] = c * vkp - s * vkq;
                    row[q] = s * vkp + c * vkq;
                }
            }
        }
    }

    ([a[0][0], a[1][1], a[2][2]], v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn recovers_exact_linear_relationship() {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for month in 1..=12 {
            for year in [2021, 2022, 2023] {
                for cat in 0..4 {
                    let x = [month as f64, year as f64, cat as f64];
                    xs.push(x);
                    ys.push(7.0 + 3.0 * x[0] - 2.0 * (x[1] - 2000.0) + 11.0 * x[2]);
                }
            }
        }
        let c = fit(&xs, &ys).unwrap();
        assert!(close(c.month, 3.0), "{c:?}");
        assert!(close(c.year, -2.0), "{c:?}");
        assert!(close(c.category, 11.0), "{c:?}");
        for (x, y) in xs.iter().zip(&ys) {
            assert!(close(c.predict(*x), *y));
        }
    }

    #[test]
    fn constant_columns_get_zero_weight() {
        // Single year and single category: only month varies.
        let xs: Vec<[f64; 3]> = (1..=12).map(|m| [m as f64, 2024.0, 0.0]).collect();
        let ys: Vec<f64> = (1..=12).map(|m| 100.0 * m as f64).collect();
        let c = fit(&xs, &ys).unwrap();
        assert!(close(c.month, 100.0));
        assert_eq!(c.year, 0.0);
        assert_eq!(c.category, 0.0);
        assert!(close(c.predict([6.0, 2024.0, 0.0]), 600.0));
    }

    #[test]
    fn all_constant_features_predict_the_mean() {
        let xs = vec![[3.0, 2024.0, 1.0]; 4];
        let ys = vec![10.0, 20.0, 30.0, 40.0];
        let c = fit(&xs, &ys).unwrap();
        assert!(close(c.predict([3.0, 2024.0, 1.0]), 25.0));
    }

    #[test]
    fn collinear_columns_split_weight_minimum_norm() {
        // month == category for every row: the fit must still reproduce targets.
        let xs: Vec<[f64; 3]> = (1..=6).map(|m| [m as f64, 2020.0, m as f64]).collect();
        let ys: Vec<f64> = (1..=6).map(|m| 4.0 * m as f64).collect();
        let c = fit(&xs, &ys).unwrap();
        assert!(close(c.month, 2.0), "{c:?}");
        assert!(close(c.category, 2.0), "{c:?}");
    }

    #[test]
    fn empty_input_has_no_fit() {
        assert!(fit(&[], &[]).is_none());
    }

    #[test]
    fn fit_is_deterministic() {
        let xs: Vec<[f64; 3]> = (0..50).map(|i| [(i % 12 + 1) as f64, (2020 + i % 3) as f64, (i % 5) as f64]).collect();
        let ys: Vec<f64> = (0..50).map(|i| ((i * 37) % 101) as f64).collect();
        assert_eq!(fit(&xs, &ys), fit(&xs, &ys));
    }
}
