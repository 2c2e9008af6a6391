mod exponential;
mod hard_core_lennard_jones;
mod hard_sphere;
mod lennard_jones;
mod weeks_chandler_andersen;

pub use exponential::Exponential;
pub use hard_core_lennard_jones::HardCoreLennardJones;
pub use hard_sphere::HardSphere;
pub use lennard_jones::LennardJones;
pub use weeks_chandler_andersen::WeeksChandlerAndersen;

/// A pairwise interaction potential evaluated on the real-space grid. The
/// solver consumes potentials only through this seam: a curve of energies
/// (later reduced by `kT`) and an optional contact distance that hard-core
/// aware closures consult.
pub trait PairPotential: std::fmt::Debug {
    fn calculate(&self, r: &[f64]) -> Vec<f64>;

    fn sigma(&self) -> Option<f64> {
        None
    }
}

/// Finite stand-in for an infinite overlap energy. Large enough that the
/// Boltzmann factor underflows to zero in f64.
pub const DEFAULT_HIGH_VALUE: f64 = 1.0e6;
