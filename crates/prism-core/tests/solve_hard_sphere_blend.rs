use prism_core::calculate::{pair_correlation, structure_factor};
use prism_core::closure::AtomicClosure;
use prism_core::core::{Domain, Prism, Space, System};
use prism_core::omega::{Gaussian, NoIntra, Omega, SingleSite};
use prism_core::potential::{HardSphere, PairPotential};
use prism_core::solver::{SolverMethod, SolverOptions};

const PAIR_CORRELATION_TOLERANCE: f64 = 1.0e-5;

/// Two-type hard-sphere blend: free monomer A in a melt of Gaussian
/// 10000-mers of B.
fn blend_system() -> System {
    let mut system = System::new(&["A", "B"], 1.0);
    system.set_domain(Domain::from_real_spacing(1024, 0.1).expect("domain"));

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
        .set("B", "B", Box::new(Gaussian::new(1.0, 10_000.0)) as Box<dyn Omega>)
        .expect("omega");

    system
}

fn assert_physical(prism: &Prism) {
    let total = prism.total_correlation();
    assert_eq!(total.space(), Space::Real);

    for type1 in ["A", "B"] {
        for type2 in ["A", "B"] {
            let curve = total.curve(type1, type2);
            for (index, &value) in curve.iter().enumerate() {
                assert!(
                    value >= -(1.0 + PAIR_CORRELATION_TOLERANCE),
                    "h[{type1}-{type2}]({index}) = {value} is unphysical"
                );
            }
        }
    }
}

#[test]
fn blend_converges_with_newton_krylov() {
    let mut prism = Prism::new(&blend_system()).expect("system assembles");

    let options = SolverOptions {
        tolerance: 1.0e-6,
        max_iterations: 2_000,
        ..SolverOptions::default()
    };
    let report = prism
        .solve(None, SolverMethod::NewtonKrylov, &options)
        .expect("no configuration errors");

    assert!(report.success, "{}", report.message);
    assert!(report.residual_norm <= 1.0e-6);
    assert_physical(&prism);
}

#[test]
fn blend_converges_with_mdiis() {
    let mut prism = Prism::new(&blend_system()).expect("system assembles");

    let options = SolverOptions {
        tolerance: 1.0e-6,
        max_iterations: 5_000,
        mdiis_depth: 10,
        mdiis_damping: 0.2,
        ..SolverOptions::default()
    };
    let report = prism
        .solve(None, SolverMethod::Mdiis, &options)
        .expect("no configuration errors");

    assert!(report.success, "{}", report.message);
    assert_physical(&prism);
}

#[test]
fn blend_solution_supports_downstream_calculations() {
    let mut prism = Prism::new(&blend_system()).expect("system assembles");

    let options = SolverOptions {
        tolerance: 1.0e-6,
        max_iterations: 2_000,
        ..SolverOptions::default()
    };
    let report = prism
        .solve(None, SolverMethod::NewtonKrylov, &options)
        .expect("no configuration errors");
    assert!(report.success, "{}", report.message);

    let g = pair_correlation(&mut prism).expect("pair correlation");
    // inside the hard core the pair correlation vanishes for every pair
    for pair in [("A", "A"), ("A", "B"), ("B", "B")] {
        let curve = g.curve(pair.0, pair.1);
        for &value in &curve[..8] {
            assert!(value.abs() < 1.0e-3, "g{pair:?} inside core = {value}");
        }
    }

    let sk = structure_factor(&mut prism, true).expect("structure factor");
    assert_eq!(sk.space(), Space::Fourier);
    let tail = *sk.curve("A", "A").last().expect("non-empty curve");
    assert!((tail - 1.0).abs() < 0.1, "s_AA(k -> inf) = {tail}");
}

#[test]
fn repeated_residual_evaluations_are_identical_on_the_blend() {
    let mut prism = Prism::new(&blend_system()).expect("system assembles");

    let size = 2 * 2 * 1024;
    let trial: Vec<f64> = (0..size)
        .map(|index| 0.05 * ((index as f64) * 0.013).sin())
        .collect();

    let mut first = vec![0.0; size];
    let mut second = vec![0.0; size];
    prism.cost(&trial, &mut first).expect("residual");
    prism.cost(&trial, &mut second).expect("residual");

    assert_eq!(first, second);
}
