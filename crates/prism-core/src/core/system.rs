use crate::closure::AtomicClosure;
use crate::core::density::Density;
use crate::core::diameter::Diameter;
use crate::core::domain::Domain;
use crate::core::table::{PairTable, TableError};
use crate::omega::Omega;
use crate::potential::PairPotential;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SystemError {
    #[error("system has no domain; a grid must be assigned before solving")]
    MissingDomain,
    #[error("system needs at least one site type")]
    NoTypes,
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Everything a PRISM problem needs, assembled before a solve: the site
/// types, thermal energy, grid, per-type densities and diameters, and the
/// symmetric per-pair tables of potentials, closures and intra-molecular
/// correlation functions.
#[derive(Debug)]
pub struct System {
    types: Vec<String>,
    kt: f64,
    domain: Option<Domain>,
    pub density: Density,
    pub diameter: Diameter,
    pub potential: PairTable<Box<dyn PairPotential>>,
    pub closure: PairTable<AtomicClosure>,
    pub omega: PairTable<Box<dyn Omega>>,
}

impl System {
    pub fn new(types: &[&str], kt: f64) -> Self {
        let types: Vec<String> = types.iter().map(|label| label.to_string()).collect();
        Self {
            density: Density::new(&types),
            diameter: Diameter::new(&types),
            potential: PairTable::new(&types, "potential"),
            closure: PairTable::new(&types, "closure"),
            omega: PairTable::new(&types, "omega"),
            domain: None,
            kt,
            types,
        }
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn rank(&self) -> usize {
        self.types.len()
    }

    pub fn kt(&self) -> f64 {
        self.kt
    }

    pub fn domain(&self) -> Option<&Domain> {
        self.domain.as_ref()
    }

    pub fn set_domain(&mut self, domain: Domain) {
        self.domain = Some(domain);
    }

    /// Is everything specified? Checks every table for completeness and
    /// warns when a diameter or pair contact distance does not land on the
    /// real-space grid, since closures, potentials and omegas will then see
    /// a rounded core boundary.
    pub fn check(&self) -> Result<(), SystemError> {
        if self.types.is_empty() {
            return Err(SystemError::NoTypes);
        }

        self.density.check()?;
        self.diameter.check()?;
        self.potential.check()?;
        self.closure.check()?;
        self.omega.check()?;

        let Some(domain) = self.domain.as_ref() else {
            return Err(SystemError::MissingDomain);
        };

        let grid_tolerance = 1.0e-6;
        let on_grid = |value: f64| {
            domain
                .r()
                .iter()
                .any(|&r| (r - value).abs() < grid_tolerance)
        };

        for (_, label, diameter) in self.diameter.iter() {
            if let Some(&diameter) = diameter {
                if !on_grid(diameter) {
                    tracing::warn!(
                        site = label,
                        diameter,
                        dr = domain.dr(),
                        "site diameter is not a multiple of the grid spacing; \
                         the core boundary will be rounded"
                    );
                }
            }
        }

        for type1 in &self.types {
            for type2 in &self.types {
                if let Some(sigma) = self.diameter.sigma(type1, type2)? {
                    if !on_grid(sigma) {
                        tracing::warn!(
                            pair = %format!("{type1}-{type2}"),
                            sigma,
                            dr = domain.dr(),
                            "pair contact distance is not a multiple of the grid \
                             spacing; the core boundary will be rounded"
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{System, SystemError};
    use crate::closure::AtomicClosure;
    use crate::core::domain::Domain;
    use crate::omega::{NoIntra, Omega, SingleSite};
    use crate::potential::{HardSphere, PairPotential};

    fn populated_system() -> System {
        let mut system = System::new(&["A", "B"], 1.0);
        system.density.set("A", 0.2).expect("density");
        system.density.set("B", 0.6).expect("density");
        system.diameter.set_all(1.0);
        system
            .potential
            .set_all_with(|| Box::new(HardSphere::new(1.0)) as Box<dyn PairPotential>);
        system.closure.set_all_with(AtomicClosure::percus_yevick);
        system
            .omega
            .set("A", "A", Box::new(SingleSite) as Box<dyn Omega>)
            .expect("omega");
        system
            .omega
            .set("A", "B", Box::new(NoIntra) as Box<dyn Omega>)
            .expect("omega");
        system
            .omega
            .set("B", "B", Box::new(SingleSite) as Box<dyn Omega>)
            .expect("omega");
        system
    }

    #[test]
    fn fully_specified_system_passes_check() {
        let mut system = populated_system();
        system.set_domain(Domain::from_real_spacing(64, 0.1).expect("domain"));
        assert!(system.check().is_ok());
    }

    #[test]
    fn missing_domain_is_rejected() {
        let system = populated_system();
        assert_eq!(system.check(), Err(SystemError::MissingDomain));
    }

    #[test]
    fn partially_specified_tables_are_rejected() {
        let mut system = System::new(&["A"], 1.0);
        system.set_domain(Domain::from_real_spacing(64, 0.1).expect("domain"));
        system.density.set("A", 0.5).expect("density");
        system.diameter.set_all(1.0);

        assert!(matches!(system.check(), Err(SystemError::Table(_))));
    }
}
