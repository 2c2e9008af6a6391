use prism_core::closure::AtomicClosure;
use prism_core::core::{Domain, Prism, System};
use prism_core::omega::{Omega, SingleSite};
use prism_core::potential::{HardSphere, PairPotential};
use prism_core::solver::{SolverMethod, SolverOptions};

/// Dilute one-component hard-sphere fluid; every method should find the
/// same fixed point from a zero guess.
fn hard_sphere_fluid(density: f64) -> System {
    let mut system = System::new(&["A"], 1.0);
    system.set_domain(Domain::from_real_spacing(512, 0.05).expect("domain"));
    system.density.set("A", density).expect("density");
    system.diameter.set_all(1.0);
    system
        .potential
        .set_all_with(|| Box::new(HardSphere::new(1.0)) as Box<dyn PairPotential>);
    system.closure.set_all_with(AtomicClosure::percus_yevick);
    system
        .omega
        .set_all_with(|| Box::new(SingleSite) as Box<dyn Omega>);
    system
}

fn solve_with(method: SolverMethod, options: &SolverOptions) -> Vec<f64> {
    let mut prism = Prism::new(&hard_sphere_fluid(0.2)).expect("system assembles");
    let report = prism
        .solve(None, method, options)
        .expect("no configuration errors");
    assert!(report.success, "{method}: {}", report.message);

    prism.total_correlation().curve("A", "A")
}

#[test]
fn all_methods_agree_on_the_converged_correlations() {
    let options = SolverOptions {
        tolerance: 1.0e-8,
        max_iterations: 20_000,
        ..SolverOptions::default()
    };

    let newton = solve_with(SolverMethod::NewtonKrylov, &options);
    let mdiis = solve_with(SolverMethod::Mdiis, &options);
    let picard = solve_with(SolverMethod::Picard, &options);

    for index in 0..newton.len() {
        assert!(
            (newton[index] - mdiis[index]).abs() < 1.0e-4,
            "newton vs mdiis at {index}: {} vs {}",
            newton[index],
            mdiis[index]
        );
        assert!(
            (newton[index] - picard[index]).abs() < 1.0e-4,
            "newton vs picard at {index}: {} vs {}",
            newton[index],
            picard[index]
        );
    }
}

#[test]
fn contact_value_grows_with_density() {
    let options = SolverOptions {
        tolerance: 1.0e-7,
        ..SolverOptions::default()
    };

    let mut contact_values = Vec::new();
    for density in [0.1, 0.3, 0.5] {
        let mut prism = Prism::new(&hard_sphere_fluid(density)).expect("system assembles");
        let report = prism
            .solve(None, SolverMethod::NewtonKrylov, &options)
            .expect("no configuration errors");
        assert!(report.success, "{}", report.message);

        let h = prism.total_correlation().curve("A", "A");
        // first grid point beyond the core at r = 1.05
        let contact = h[20] + 1.0;
        contact_values.push(contact);
    }

    assert!(
        contact_values[0] < contact_values[1] && contact_values[1] < contact_values[2],
        "contact values {contact_values:?} should increase with packing"
    );
}
