use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClosureError {
    #[error("potential for this closure is not set")]
    PotentialUnset,
    #[error("closure potential has length {expected} but the trial curve has length {actual}")]
    DomainMismatch { expected: usize, actual: usize },
    #[error("hard-core closures need a contact distance; sigma is not set")]
    SigmaUnset,
    #[error("unknown closure kind '{0}'")]
    UnknownKind(String),
}

/// The closed set of site-local (atomic) closure relations. Each variant is
/// a single algebraic formula relating the trial correlation `gamma = h - c`
/// and the reduced potential `u = U/kT` to the direct correlation `c`,
/// written in the change of variables that stays finite for divergent
/// potentials.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ClosureKind {
    PercusYevick,
    HyperNettedChain,
    MeanSphericalApproximation,
    MartynovSarkisov,
}

impl ClosureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PercusYevick => "percus-yevick",
            Self::HyperNettedChain => "hypernetted-chain",
            Self::MeanSphericalApproximation => "mean-spherical-approximation",
            Self::MartynovSarkisov => "martynov-sarkisov",
        }
    }

    fn formula(self, u: f64, gamma: f64) -> f64 {
        match self {
            Self::PercusYevick => ((-u).exp() - 1.0) * (1.0 + gamma),
            Self::HyperNettedChain => (gamma - u).exp() - 1.0 - gamma,
            Self::MeanSphericalApproximation => -u,
            Self::MartynovSarkisov => ((gamma - u + 0.5).sqrt() - 1.0).exp() - 1.0 - gamma,
        }
    }
}

impl Display for ClosureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for ClosureKind {
    type Err = ClosureError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "percus-yevick" | "py" => Ok(Self::PercusYevick),
            "hypernetted-chain" | "hnc" => Ok(Self::HyperNettedChain),
            "mean-spherical-approximation" | "msa" => Ok(Self::MeanSphericalApproximation),
            "martynov-sarkisov" | "ms" => Ok(Self::MartynovSarkisov),
            other => Err(ClosureError::UnknownKind(other.to_string())),
        }
    }
}

/// One pair's closure. Constructed unconfigured; the solver constructor
/// supplies the reduced potential curve and the pair contact distance once,
/// after which `calculate` may be invoked any number of times with trial
/// curves of the matching length.
#[derive(Debug, Clone)]
pub struct AtomicClosure {
    kind: ClosureKind,
    apply_hard_core: bool,
    potential: Option<Vec<f64>>,
    sigma: Option<f64>,
}

impl AtomicClosure {
    pub fn new(kind: ClosureKind, apply_hard_core: bool) -> Self {
        if !apply_hard_core
            && matches!(
                kind,
                ClosureKind::MeanSphericalApproximation | ClosureKind::MartynovSarkisov
            )
        {
            tracing::warn!(
                closure = %kind,
                "this closure does not handle divergent potentials unless the \
                 hard-core condition is applied; expect failures for hard cores"
            );
        }
        Self {
            kind,
            apply_hard_core,
            potential: None,
            sigma: None,
        }
    }

    pub fn percus_yevick() -> Self {
        Self::new(ClosureKind::PercusYevick, false)
    }

    pub fn hypernetted_chain() -> Self {
        Self::new(ClosureKind::HyperNettedChain, false)
    }

    pub fn mean_spherical_approximation() -> Self {
        Self::new(ClosureKind::MeanSphericalApproximation, true)
    }

    pub fn martynov_sarkisov() -> Self {
        Self::new(ClosureKind::MartynovSarkisov, true)
    }

    pub fn with_hard_core(kind: ClosureKind) -> Self {
        Self::new(kind, true)
    }

    pub fn kind(&self) -> ClosureKind {
        self.kind
    }

    pub fn apply_hard_core(&self) -> bool {
        self.apply_hard_core
    }

    pub fn potential(&self) -> Option<&[f64]> {
        self.potential.as_deref()
    }

    pub fn sigma(&self) -> Option<f64> {
        self.sigma
    }

    /// Install the reduced potential `U(r)/kT`; called once by the solver
    /// constructor.
    pub fn set_potential(&mut self, potential: Vec<f64>) {
        self.potential = Some(potential);
    }

    pub fn set_sigma(&mut self, sigma: f64) {
        self.sigma = Some(sigma);
    }

    /// Map a trial curve to the direct correlation curve. Inside the hard
    /// core (`r <= sigma`, when enabled) the pair correlation is pinned to
    /// zero, which forces `c = -1 - gamma`.
    pub fn calculate(&self, r: &[f64], gamma: &[f64]) -> Result<Vec<f64>, ClosureError> {
        let potential = self
            .potential
            .as_deref()
            .ok_or(ClosureError::PotentialUnset)?;
        if gamma.len() != potential.len() {
            return Err(ClosureError::DomainMismatch {
                expected: potential.len(),
                actual: gamma.len(),
            });
        }

        if self.apply_hard_core {
            let sigma = self.sigma.ok_or(ClosureError::SigmaUnset)?;
            Ok(r.iter()
                .zip(potential)
                .zip(gamma)
                .map(|((&r, &u), &g)| {
                    if r > sigma {
                        self.kind.formula(u, g)
                    } else {
                        -1.0 - g
                    }
                })
                .collect())
        } else {
            Ok(potential
                .iter()
                .zip(gamma)
                .map(|(&u, &g)| self.kind.formula(u, g))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AtomicClosure, ClosureError, ClosureKind};

    fn configured(kind: ClosureKind, apply_hard_core: bool) -> (AtomicClosure, Vec<f64>) {
        let r: Vec<f64> = (0..8).map(|index| 0.25 * (index + 1) as f64).collect();
        let potential: Vec<f64> = r.iter().map(|&r| if r > 1.0 { 0.0 } else { 1.0e6 }).collect();
        let mut closure = AtomicClosure::new(kind, apply_hard_core);
        closure.set_potential(potential);
        closure.set_sigma(1.0);
        (closure, r)
    }

    #[test]
    fn percus_yevick_reduces_to_mayer_function_at_zero_gamma() {
        let (closure, r) = configured(ClosureKind::PercusYevick, false);
        let gamma = vec![0.0; r.len()];
        let c = closure.calculate(&r, &gamma).expect("configured closure");

        for (&r, &c) in r.iter().zip(&c) {
            let u: f64 = if r > 1.0 { 0.0 } else { 1.0e6 };
            let expected = (-u).exp() - 1.0;
            assert!((c - expected).abs() < 1.0e-12, "r = {r}: {c} vs {expected}");
        }
    }

    #[test]
    fn hypernetted_chain_reduces_to_mayer_function_at_zero_gamma() {
        let (closure, r) = configured(ClosureKind::HyperNettedChain, false);
        let gamma = vec![0.0; r.len()];
        let c = closure.calculate(&r, &gamma).expect("configured closure");

        for (&r, &c) in r.iter().zip(&c) {
            let u: f64 = if r > 1.0 { 0.0 } else { 1.0e6 };
            let expected = (-u).exp() - 1.0;
            assert!((c - expected).abs() < 1.0e-12, "r = {r}: {c} vs {expected}");
        }
    }

    #[test]
    fn hard_core_forces_contact_value_inside_sigma() {
        for kind in [
            ClosureKind::PercusYevick,
            ClosureKind::HyperNettedChain,
            ClosureKind::MeanSphericalApproximation,
            ClosureKind::MartynovSarkisov,
        ] {
            let (closure, r) = configured(kind, true);
            let gamma: Vec<f64> = r.iter().map(|&r| 0.1 * r).collect();
            let c = closure.calculate(&r, &gamma).expect("configured closure");

            for ((&r, &g), &c) in r.iter().zip(&gamma).zip(&c) {
                if r <= 1.0 {
                    assert!(
                        (c - (-1.0 - g)).abs() < 1.0e-12,
                        "{kind}: hard core not applied at r = {r}"
                    );
                }
            }
        }
    }

    #[test]
    fn mean_spherical_approximation_is_negated_potential() {
        let r: Vec<f64> = (0..4).map(|index| 1.5 + index as f64).collect();
        let potential = vec![0.5, -0.25, 0.125, 0.0];
        let mut closure = AtomicClosure::new(ClosureKind::MeanSphericalApproximation, false);
        closure.set_potential(potential.clone());

        let gamma = vec![3.0; 4];
        let c = closure.calculate(&r, &gamma).expect("configured closure");
        for (&u, &c) in potential.iter().zip(&c) {
            assert!((c + u).abs() < 1.0e-12);
        }
    }

    #[test]
    fn martynov_sarkisov_matches_hand_evaluation() {
        let r = vec![2.0];
        let mut closure = AtomicClosure::new(ClosureKind::MartynovSarkisov, false);
        closure.set_potential(vec![0.25]);

        let gamma = [0.75];
        let c = closure.calculate(&r, &gamma).expect("configured closure");
        let expected = ((0.75_f64 - 0.25 + 0.5).sqrt() - 1.0).exp() - 1.0 - 0.75;
        assert!((c[0] - expected).abs() < 1.0e-12);
    }

    #[test]
    fn unconfigured_closure_is_rejected() {
        let closure = AtomicClosure::percus_yevick();
        let error = closure
            .calculate(&[1.0], &[0.0])
            .expect_err("potential unset");
        assert_eq!(error, ClosureError::PotentialUnset);
    }

    #[test]
    fn trial_curve_length_must_match_potential() {
        let mut closure = AtomicClosure::percus_yevick();
        closure.set_potential(vec![0.0; 4]);

        let error = closure
            .calculate(&[1.0, 2.0], &[0.0, 0.0])
            .expect_err("length mismatch");
        assert_eq!(
            error,
            ClosureError::DomainMismatch {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn hard_core_without_sigma_is_rejected() {
        let mut closure = AtomicClosure::with_hard_core(ClosureKind::PercusYevick);
        closure.set_potential(vec![0.0; 2]);

        let error = closure
            .calculate(&[1.0, 2.0], &[0.0, 0.0])
            .expect_err("sigma unset");
        assert_eq!(error, ClosureError::SigmaUnset);
    }

    #[test]
    fn kind_parses_from_short_and_long_names() {
        assert_eq!(
            "py".parse::<ClosureKind>().expect("alias"),
            ClosureKind::PercusYevick
        );
        assert_eq!(
            "hypernetted-chain".parse::<ClosureKind>().expect("name"),
            ClosureKind::HyperNettedChain
        );
        assert!("parsons-lebowitz".parse::<ClosureKind>().is_err());
    }
}
