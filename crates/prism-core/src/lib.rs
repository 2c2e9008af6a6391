//! Polymer Reference Interaction Site Model (PRISM) solver.
//!
//! Given site types, number densities, pairwise interaction potentials and
//! intra-molecular correlation functions, this crate finds the
//! inter-molecular total and direct correlation functions that
//! self-consistently satisfy the matrix Ornstein-Zernike-like PRISM relation
//! together with a pluggable closure, discretized on a radial grid and
//! driven to a fixed point by an interchangeable nonlinear root-finder.
//!
//! The [`core::System`] type assembles a problem, [`core::Prism`] owns the
//! solve, and the [`calculate`] module derives structure factors, virial
//! coefficients and related quantities from a converged solution.

pub mod calculate;
pub mod closure;
pub mod core;
pub mod numerics;
pub mod omega;
pub mod potential;
pub mod solver;

pub use crate::core::{
    Density, Diameter, Domain, DomainError, MatrixArray, MatrixArrayError, PairTable, Prism,
    PrismError, Space, System, SystemError, TableError, ValueTable,
};
pub use closure::{AtomicClosure, ClosureError, ClosureKind};
pub use solver::{SolveReport, SolverMethod, SolverOptions};
