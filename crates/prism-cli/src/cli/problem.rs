use anyhow::{bail, Context};
use prism_core::calculate::pair_correlation;
use prism_core::closure::{AtomicClosure, ClosureKind};
use prism_core::core::{Domain, Prism, System};
use prism_core::omega::{FreelyJointedChain, FromArray, Gaussian, NoIntra, Omega, SingleSite};
use prism_core::potential::{
    Exponential, HardCoreLennardJones, HardSphere, LennardJones, PairPotential,
    WeeksChandlerAndersen,
};
use prism_core::solver::{SolveReport, SolverMethod, SolverOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk description of a PRISM problem.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProblemSpec {
    pub types: Vec<String>,
    #[serde(default = "default_kt")]
    pub kt: f64,
    pub domain: DomainSpec,
    pub density: BTreeMap<String, f64>,
    pub diameter: BTreeMap<String, f64>,
    pub potentials: Vec<PotentialEntry>,
    pub closures: Vec<ClosureEntry>,
    pub omegas: Vec<OmegaEntry>,
    #[serde(default)]
    pub solver: SolverSpec,
}

fn default_kt() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainSpec {
    pub length: usize,
    #[serde(default)]
    pub dr: Option<f64>,
    #[serde(default)]
    pub dk: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PotentialEntry {
    pub pair: (String, String),
    pub potential: PotentialSpec,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PotentialSpec {
    HardSphere {
        sigma: f64,
    },
    LennardJones {
        epsilon: f64,
        sigma: f64,
        #[serde(default)]
        rcut: Option<f64>,
        #[serde(default)]
        shift: bool,
    },
    WeeksChandlerAndersen {
        epsilon: f64,
        sigma: f64,
    },
    HardCoreLennardJones {
        epsilon: f64,
        sigma: f64,
    },
    Exponential {
        epsilon: f64,
        sigma: f64,
        alpha: f64,
    },
}

impl PotentialSpec {
    fn build(&self) -> Box<dyn PairPotential> {
        match *self {
            Self::HardSphere { sigma } => Box::new(HardSphere::new(sigma)),
            Self::LennardJones {
                epsilon,
                sigma,
                rcut,
                shift,
            } => match rcut {
                Some(rcut) => Box::new(LennardJones::with_cutoff(epsilon, sigma, rcut, shift)),
                None => Box::new(LennardJones::new(epsilon, sigma)),
            },
            Self::WeeksChandlerAndersen { epsilon, sigma } => {
                Box::new(WeeksChandlerAndersen::new(epsilon, sigma))
            }
            Self::HardCoreLennardJones { epsilon, sigma } => {
                Box::new(HardCoreLennardJones::new(epsilon, sigma))
            }
            Self::Exponential {
                epsilon,
                sigma,
                alpha,
            } => Box::new(Exponential::new(epsilon, sigma, alpha)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClosureEntry {
    pub pair: (String, String),
    pub kind: ClosureKind,
    #[serde(default)]
    pub apply_hard_core: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OmegaEntry {
    pub pair: (String, String),
    pub omega: OmegaSpec,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OmegaSpec {
    SingleSite,
    NoIntra,
    Gaussian { sigma: f64, length: f64 },
    FreelyJointedChain { length: f64, l: f64 },
    FromArray { values: Vec<f64> },
}

impl OmegaSpec {
    fn build(&self) -> Box<dyn Omega> {
        match self {
            Self::SingleSite => Box::new(SingleSite),
            Self::NoIntra => Box::new(NoIntra),
            Self::Gaussian { sigma, length } => Box::new(Gaussian::new(*sigma, *length)),
            Self::FreelyJointedChain { length, l } => {
                Box::new(FreelyJointedChain::new(*length, *l))
            }
            Self::FromArray { values } => Box::new(FromArray::new(values.clone())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverSpec {
    #[serde(default)]
    pub method: Option<SolverMethod>,
    #[serde(default)]
    pub options: Option<SolverOptions>,
}

impl ProblemSpec {
    pub fn from_json(source: &str) -> anyhow::Result<Self> {
        serde_json::from_str(source).context("failed to parse the problem description")
    }

    /// Build and validate the in-memory system this description denotes.
    pub fn assemble(&self) -> anyhow::Result<System> {
        if self.types.is_empty() {
            bail!("the problem needs at least one site type");
        }

        let type_refs: Vec<&str> = self.types.iter().map(String::as_str).collect();
        let mut system = System::new(&type_refs, self.kt);

        let domain = Domain::new(self.domain.length, self.domain.dr, self.domain.dk)
            .context("invalid domain")?;
        system.set_domain(domain);

        for (label, &density) in &self.density {
            system
                .density
                .set(label, density)
                .with_context(|| format!("density for unknown site type '{label}'"))?;
        }
        for (label, &diameter) in &self.diameter {
            system
                .diameter
                .set(label, diameter)
                .with_context(|| format!("diameter for unknown site type '{label}'"))?;
        }

        for entry in &self.potentials {
            let (type1, type2) = (&entry.pair.0, &entry.pair.1);
            system
                .potential
                .set(type1, type2, entry.potential.build())
                .with_context(|| format!("potential for unknown pair {type1}-{type2}"))?;
        }
        for entry in &self.closures {
            let (type1, type2) = (&entry.pair.0, &entry.pair.1);
            system
                .closure
                .set(
                    type1,
                    type2,
                    AtomicClosure::new(entry.kind, entry.apply_hard_core),
                )
                .with_context(|| format!("closure for unknown pair {type1}-{type2}"))?;
        }
        for entry in &self.omegas {
            let (type1, type2) = (&entry.pair.0, &entry.pair.1);
            system
                .omega
                .set(type1, type2, entry.omega.build())
                .with_context(|| format!("omega for unknown pair {type1}-{type2}"))?;
        }

        system.check().context("incomplete problem description")?;
        Ok(system)
    }

    pub fn method(&self) -> SolverMethod {
        self.solver.method.unwrap_or(SolverMethod::NewtonKrylov)
    }

    pub fn options(&self) -> SolverOptions {
        self.solver.options.clone().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct CurveOutput {
    pub pair: (String, String),
    pub values: Vec<f64>,
}

/// Everything a downstream consumer needs from a finished solve, with every
/// curve in real space except where noted.
#[derive(Debug, Serialize)]
pub struct SolveOutput {
    pub method: SolverMethod,
    pub success: bool,
    pub iterations: usize,
    pub residual_norm: f64,
    pub message: String,
    pub r: Vec<f64>,
    pub k: Vec<f64>,
    pub total_correlation: Vec<CurveOutput>,
    pub direct_correlation: Vec<CurveOutput>,
    pub pair_correlation: Vec<CurveOutput>,
}

impl SolveOutput {
    pub fn collect(
        prism: &mut Prism,
        report: &SolveReport,
        method: SolverMethod,
    ) -> anyhow::Result<Self> {
        prism
            .ensure_total_correlation_real()
            .context("total correlation transform")?;
        prism
            .ensure_direct_correlation_real()
            .context("direct correlation transform")?;
        let rdf = pair_correlation(prism).context("pair correlation")?;

        let types = prism.types().to_vec();
        let pairs: Vec<(usize, usize)> = (0..types.len())
            .flat_map(|site1| (site1..types.len()).map(move |site2| (site1, site2)))
            .collect();

        let curves = |values: &prism_core::core::MatrixArray| {
            pairs
                .iter()
                .map(|&(site1, site2)| CurveOutput {
                    pair: (types[site1].clone(), types[site2].clone()),
                    values: values.curve_by_index(site1, site2),
                })
                .collect::<Vec<_>>()
        };

        Ok(Self {
            method,
            success: report.success,
            iterations: report.iterations,
            residual_norm: report.residual_norm,
            message: report.message.clone(),
            r: prism.domain().r().to_vec(),
            k: prism.domain().k().to_vec(),
            total_correlation: curves(prism.total_correlation()),
            direct_correlation: curves(prism.direct_correlation()),
            pair_correlation: curves(&rdf),
        })
    }
}
