use super::{SolveReport, SolverOptions};
use crate::numerics::rms_norm;

/// Damped fixed-point mixing: `x <- x + damping * F(x)`.
pub(super) fn solve<E>(
    mut residual: impl FnMut(&[f64], &mut [f64]) -> Result<(), E>,
    mut x: Vec<f64>,
    options: &SolverOptions,
) -> Result<SolveReport, E> {
    let mut y = vec![0.0; x.len()];
    let mut norm = f64::INFINITY;

    for iteration in 1..=options.max_iterations {
        residual(&x, &mut y)?;
        norm = rms_norm(&y);
        tracing::trace!(iteration, residual = norm, "picard iteration");

        if norm <= options.tolerance {
            return Ok(SolveReport::converged(x, norm, iteration, "picard"));
        }
        if !norm.is_finite() {
            return Ok(SolveReport::failed(
                x,
                norm,
                iteration,
                "picard residual diverged to a non-finite value",
            ));
        }

        for (slot, &step) in x.iter_mut().zip(&y) {
            *slot += options.picard_damping * step;
        }
    }

    Ok(SolveReport::failed(
        x,
        norm,
        options.max_iterations,
        format!(
            "picard reached the iteration limit ({}) at residual {norm:.3e}",
            options.max_iterations
        ),
    ))
}
