use super::{SolveReport, SolverOptions};
use crate::numerics::linalg::{lu_solve, DenseMatrix};
use crate::numerics::{dot_product, rms_norm};
use std::collections::VecDeque;

const RESTART_FACTOR: f64 = 10.0;

/// Modified direct inversion of the iterative subspace: extrapolate over the
/// recent solution/residual history with coefficients that minimize the
/// combined residual under the constraint that they sum to one, then apply a
/// damped step along the extrapolated residual. Restarts from the best
/// visited point when the residual grows away from it.
pub(super) fn solve<E>(
    mut residual: impl FnMut(&[f64], &mut [f64]) -> Result<(), E>,
    mut x: Vec<f64>,
    options: &SolverOptions,
) -> Result<SolveReport, E> {
    let size = x.len();
    let depth = options.mdiis_depth.max(1);
    let damping = options.mdiis_damping;

    let mut y = vec![0.0; size];
    let mut history: VecDeque<(Vec<f64>, Vec<f64>)> = VecDeque::with_capacity(depth);
    let mut best_norm = f64::INFINITY;
    let mut best: Option<(Vec<f64>, Vec<f64>)> = None;
    let mut norm = f64::INFINITY;

    for iteration in 1..=options.max_iterations {
        residual(&x, &mut y)?;
        norm = rms_norm(&y);
        tracing::trace!(iteration, residual = norm, depth = history.len(), "mdiis iteration");

        if norm <= options.tolerance {
            return Ok(SolveReport::converged(x, norm, iteration, "mdiis"));
        }
        if !norm.is_finite() {
            return Ok(SolveReport::failed(
                x,
                norm,
                iteration,
                "mdiis residual diverged to a non-finite value",
            ));
        }

        if norm < best_norm {
            best_norm = norm;
            best = Some((x.clone(), y.clone()));
        } else if norm > RESTART_FACTOR * best_norm {
            let (best_x, best_y) = best.as_ref().expect("a best point exists once norm is finite");
            tracing::debug!(
                iteration,
                residual = norm,
                best_residual = best_norm,
                "mdiis restarting from the best visited point"
            );
            history.clear();
            for index in 0..size {
                x[index] = best_x[index] + damping * best_y[index];
            }
            continue;
        }

        if history.len() == depth {
            history.pop_front();
        }
        history.push_back((x.clone(), y.clone()));

        match extrapolation_coefficients(&history) {
            Some(coefficients) => {
                x.fill(0.0);
                for ((previous_x, previous_y), &coefficient) in history.iter().zip(&coefficients) {
                    for index in 0..size {
                        x[index] +=
                            coefficient * (previous_x[index] + damping * previous_y[index]);
                    }
                }
            }
            None => {
                // degenerate residual overlap matrix; drop the subspace and
                // take a plain damped step
                history.clear();
                for index in 0..size {
                    x[index] += damping * y[index];
                }
            }
        }
    }

    Ok(SolveReport::failed(
        x,
        norm,
        options.max_iterations,
        format!(
            "mdiis reached the iteration limit ({}) at residual {norm:.3e}",
            options.max_iterations
        ),
    ))
}

/// Solve the bordered normal system
///
///   | S   -1 | | c      |   | 0  |
///   | -1'  0 | | lambda | = | -1 |
///
/// where `S[a][b] = <r_a, r_b>`, yielding coefficients that sum to one and
/// minimize the norm of the combined residual.
fn extrapolation_coefficients(history: &VecDeque<(Vec<f64>, Vec<f64>)>) -> Option<Vec<f64>> {
    let m = history.len();
    if m == 1 {
        return Some(vec![1.0]);
    }

    let mut matrix = DenseMatrix::zeros(m + 1, m + 1);
    for (a, (_, residual_a)) in history.iter().enumerate() {
        for (b, (_, residual_b)) in history.iter().enumerate() {
            matrix[(a, b)] = dot_product(residual_a, residual_b);
        }
        matrix[(a, m)] = -1.0;
        matrix[(m, a)] = -1.0;
    }

    let mut rhs = vec![0.0; m + 1];
    rhs[m] = -1.0;

    let mut solution = lu_solve(&matrix, &rhs).ok()?;
    solution.truncate(m);
    Some(solution)
}
