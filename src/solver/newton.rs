//! Newton-Raphson solver for L2-regularized logistic regression
//!
//! Minimizes the penalized negative log-likelihood
//!
//! ```text
//! f(w, b) = Σ_i [ log(1 + exp(z_i)) - y_i z_i ] + ||w||² / (2C),   z_i = w·x_i + b
//! ```
//!
//! The bias is not penalized. With ten parameters the full Hessian is cheap,
//! so each iteration solves it exactly with a Cholesky factorization and
//! takes a backtracking step on the objective.

use crate::core::{FakeDetectError, OptimizationResult, Result, TrainerConfig, N_FEATURES};
use log::{debug, warn};

/// Weights followed by the bias
const DIM: usize = N_FEATURES + 1;

type Vector = [f64; DIM];
type Matrix = [[f64; DIM]; DIM];

/// Sufficient-decrease constant for the line search
const ARMIJO: f64 = 1e-4;
const MIN_STEP: f64 = 1e-10;

/// Newton solver for logistic regression
pub struct NewtonSolver {
    config: TrainerConfig,
}

impl NewtonSolver {
    /// Create a new solver with the given configuration
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Fit weights and bias to scaled inputs `x` with labels `y`
    pub fn solve(&self, x: &[[f64; N_FEATURES]], y: &[u8]) -> Result<OptimizationResult> {
        if x.is_empty() {
            return Err(FakeDetectError::EmptyDataset);
        }
        if x.len() != y.len() {
            return Err(FakeDetectError::DimensionMismatch {
                expected: x.len(),
                actual: y.len(),
            });
        }
        if let Some(&bad) = y.iter().find(|&&label| label > 1) {
            return Err(FakeDetectError::InvalidLabel(f64::from(bad)));
        }
        if !(self.config.c > 0.0) {
            return Err(FakeDetectError::InvalidParameter(format!(
                "C must be positive, got: {}",
                self.config.c
            )));
        }

        let inv_c = 1.0 / self.config.c;
        let mut theta: Vector = [0.0; DIM];
        let mut objective = self.objective(&theta, x, y, inv_c);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            let (gradient, hessian) = self.gradient_and_hessian(&theta, x, y, inv_c);
            if !objective.is_finite() || gradient.iter().any(|g| !g.is_finite()) {
                return Err(FakeDetectError::OptimizationError(format!(
                    "Non-finite objective or gradient at iteration {iterations}; check the input for NaN or infinite values"
                )));
            }

            let max_grad = gradient.iter().fold(0.0f64, |acc, g| acc.max(g.abs()));
            if max_grad < self.config.tolerance {
                converged = true;
                break;
            }

            let newton = cholesky_solve(&hessian, &gradient).ok_or_else(|| {
                FakeDetectError::OptimizationError(
                    "Hessian is not positive definite".to_string(),
                )
            })?;
            // Descent direction is -H⁻¹g
            let direction: Vector = std::array::from_fn(|k| -newton[k]);
            let slope: f64 = direction.iter().zip(gradient.iter()).map(|(d, g)| d * g).sum();

            let mut step = 1.0;
            let mut accepted = None;
            while step >= MIN_STEP {
                let candidate: Vector = std::array::from_fn(|k| theta[k] + step * direction[k]);
                let candidate_objective = self.objective(&candidate, x, y, inv_c);
                if candidate_objective <= objective + ARMIJO * step * slope {
                    accepted = Some((candidate, candidate_objective));
                    break;
                }
                step *= 0.5;
            }

            iterations += 1;

            match accepted {
                Some((candidate, candidate_objective)) => {
                    debug!(
                        "Newton iteration {iterations}: objective {candidate_objective:.6}, step {step}, max |grad| {max_grad:.3e}"
                    );
                    theta = candidate;
                    objective = candidate_objective;
                }
                None => {
                    // No representable decrease left along the Newton direction
                    debug!("Line search stalled at iteration {iterations}");
                    converged = true;
                    break;
                }
            }
        }

        if !converged {
            warn!(
                "Solver did not converge within {} iterations",
                self.config.max_iterations
            );
        }

        let mut weights = [0.0; N_FEATURES];
        weights.copy_from_slice(&theta[..N_FEATURES]);

        Ok(OptimizationResult {
            weights,
            bias: theta[N_FEATURES],
            iterations,
            objective_value: objective,
            converged,
        })
    }

    fn objective(&self, theta: &Vector, x: &[[f64; N_FEATURES]], y: &[u8], inv_c: f64) -> f64 {
        let loss: f64 = x
            .iter()
            .zip(y.iter())
            .map(|(row, &label)| {
                let z = linear(theta, row);
                softplus(z) - f64::from(label) * z
            })
            .sum();
        let penalty: f64 = theta[..N_FEATURES].iter().map(|w| w * w).sum::<f64>() * 0.5 * inv_c;
        loss + penalty
    }

    fn gradient_and_hessian(
        &self,
        theta: &Vector,
        x: &[[f64; N_FEATURES]],
        y: &[u8],
        inv_c: f64,
    ) -> (Vector, Matrix) {
        let mut gradient: Vector = [0.0; DIM];
        let mut hessian: Matrix = [[0.0; DIM]; DIM];

        for (row, &label) in x.iter().zip(y.iter()) {
            let p = crate::core::sigmoid(linear(theta, row));
            let residual = p - f64::from(label);
            let weight = p * (1.0 - p);
            let augmented = augment(row);

            for i in 0..DIM {
                gradient[i] += residual * augmented[i];
                for j in 0..=i {
                    hessian[i][j] += weight * augmented[i] * augmented[j];
                }
            }
        }

        for i in 0..N_FEATURES {
            gradient[i] += theta[i] * inv_c;
            hessian[i][i] += inv_c;
        }
        for i in 0..DIM {
            for j in (i + 1)..DIM {
                hessian[i][j] = hessian[j][i];
            }
        }

        (gradient, hessian)
    }
}

fn augment(row: &[f64; N_FEATURES]) -> Vector {
    let mut out = [1.0; DIM];
    out[..N_FEATURES].copy_from_slice(row);
    out
}

fn linear(theta: &Vector, row: &[f64; N_FEATURES]) -> f64 {
    theta[..N_FEATURES]
        .iter()
        .zip(row.iter())
        .map(|(w, x)| w * x)
        .sum::<f64>()
        + theta[N_FEATURES]
}

/// `log(1 + exp(z))` without overflow
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

/// Solve `A v = b` for symmetric positive definite `A`
fn cholesky_solve(a: &Matrix, b: &Vector) -> Option<Vector> {
    let mut l: Matrix = [[0.0; DIM]; DIM];
    for i in 0..DIM {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[i][k] * l[j][k]).sum();
            if i == j {
                let diag = a[i][i] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return None;
                }
                l[i][j] = diag.sqrt();
            } else {
                l[i][j] = (a[i][j] - sum) / l[j][j];
            }
        }
    }

    // Forward substitution: L z = b
    let mut z: Vector = [0.0; DIM];
    for i in 0..DIM {
        let sum: f64 = (0..i).map(|k| l[i][k] * z[k]).sum();
        z[i] = (b[i] - sum) / l[i][i];
    }

    // Back substitution: Lᵀ v = z
    let mut v: Vector = [0.0; DIM];
    for i in (0..DIM).rev() {
        let sum: f64 = ((i + 1)..DIM).map(|k| l[k][i] * v[k]).sum();
        v[i] = (z[i] - sum) / l[i][i];
    }

    Some(v)
}
