//! End-to-end tests of the direct solver adapter with the built-in engines.

use hermes_solver::*;
use std::io::Write;

fn matrix_from_rows(n: usize, rows: &[f64]) -> SystemMatrix<f64> {
    let mut triplets = SparseTriplets::new(n, n);
    for r in 0..n {
        for c in 0..n {
            let v = rows[r * n + c];
            if v != 0.0 {
                triplets.push(r, c, v);
            }
        }
    }
    SystemMatrix::from_triplets(&triplets).expect("valid triplets")
}

/// 1D Laplacian-like stiffness: SPD tridiagonal [-1 2 -1] plus a unit
/// shift on the diagonal.
fn stiffness(n: usize) -> SystemMatrix<f64> {
    let mut triplets = SparseTriplets::new(n, n);
    for i in 0..n {
        triplets.push(i, i, 3.0);
        if i + 1 < n {
            triplets.push(i, i + 1, -1.0);
            triplets.push(i + 1, i, -1.0);
        }
    }
    SystemMatrix::from_triplets(&triplets).expect("valid triplets")
}

fn residual(a: &SystemMatrix<f64>, x: &[f64], b: &SystemVector<f64>) -> f64 {
    let mut r: Vec<f64> = b.as_slice().iter().map(|v| -v).collect();
    for (i, j, v) in a.csr().triplet_iter() {
        r[i] += v * x[j];
    }
    r.iter().map(|v| v * v).sum::<f64>().sqrt()
}

#[test]
fn lapack_solves_nonsymmetric_system() {
    let backend = EngineRegistry::with_builtin_engines();
    let a = matrix_from_rows(3, &[4.0, 1.0, 0.0, 2.0, 5.0, 1.0, 0.0, 3.0, 6.0]);
    let b = SystemVector::from_vec(vec![5.0, 8.0, 9.0]);

    let mut solver = DirectSolver::new(&backend, "Lapack", &a, &b).expect("engine exists");
    assert!(solver.solve());

    let x = solver.solution().expect("solution after success");
    assert_eq!(x.len(), 3);
    assert!(residual(&a, x, &b) < 1e-12);
    assert!(solver.time() >= 0.0);
}

#[test]
fn cholesky_solves_spd_system() {
    let backend = default_backend();
    let a = stiffness(10);
    let b = SystemVector::from_vec((0..10).map(|i| i as f64).collect());

    let mut solver = DirectSolver::new(backend.as_ref(), "Cholesky", &a, &b).expect("engine exists");
    assert!(solver.solve());

    let x = solver.solution().expect("solution after success");
    assert_eq!(x.len(), 10);
    assert!(residual(&a, x, &b) < 1e-10);
}

#[test]
fn engines_agree_on_spd_system() {
    let backend = EngineRegistry::with_builtin_engines();
    let a = stiffness(6);
    let b = SystemVector::from_vec(vec![1.0, 0.0, -1.0, 2.0, 0.5, 3.0]);

    let mut lapack = DirectSolver::new(&backend, "Lapack", &a, &b).unwrap();
    let mut cholesky = DirectSolver::new(&backend, "Cholesky", &a, &b).unwrap();
    assert!(lapack.solve());
    assert!(cholesky.solve());

    for (l, c) in lapack.solution().unwrap().iter().zip(cholesky.solution().unwrap()) {
        assert!((l - c).abs() < 1e-10, "{} vs {}", l, c);
    }
}

#[test]
fn cholesky_rejects_nonsymmetric_system() {
    let backend = EngineRegistry::with_builtin_engines();
    let a = matrix_from_rows(2, &[4.0, 3.0, 1.0, 4.0]);
    let b = SystemVector::from_vec(vec![1.0, 1.0]);

    let mut solver = DirectSolver::new(&backend, "Cholesky", &a, &b).unwrap();
    assert!(!solver.solve());
    assert!(solver.solution().is_none());
    assert!(matches!(
        solver.try_solve(),
        Err(SolverError::Factorization {
            phase: FactorizationPhase::Numeric,
            source: EngineError::NotSymmetric,
        })
    ));

    // The dense engine handles the same system
    let mut lapack = DirectSolver::new(&backend, "Lapack", &a, &b).unwrap();
    assert!(lapack.solve());
    assert!(residual(&a, lapack.solution().unwrap(), &b) < 1e-12);
}

#[test]
fn transposed_solve_uses_operator_transpose() {
    let backend = EngineRegistry::with_builtin_engines();
    // A = [2 1; 0 3]
    let a = matrix_from_rows(2, &[2.0, 1.0, 0.0, 3.0]);
    let b = SystemVector::from_vec(vec![2.0, 5.0]);

    let mut solver = DirectSolver::new(&backend, "Lapack", &a, &b).unwrap();
    solver.set_use_transpose(true);
    assert!(solver.use_transpose());
    assert!(solver.solve());

    // A^T x = b gives x = [1, 4/3]
    let x = solver.solution().unwrap();
    assert!((x[0] - 1.0).abs() < 1e-12);
    assert!((x[1] - 4.0 / 3.0).abs() < 1e-12);
}

#[test]
fn failed_solve_keeps_previous_solution() {
    let backend = EngineRegistry::with_builtin_engines();
    let regular = matrix_from_rows(2, &[4.0, 1.0, 1.0, 3.0]);
    let singular = matrix_from_rows(2, &[1.0, 2.0, 2.0, 4.0]);
    let b = SystemVector::from_vec(vec![1.0, 2.0]);

    let mut solver = DirectSolver::new(&backend, "Lapack", &regular, &b).unwrap();
    assert!(solver.solve());
    let b1 = solver.solution().unwrap().to_vec();
    let t1 = solver.time();

    // Same pattern, singular values
    solver.set_system(&singular, &b);
    assert!(!solver.solve());
    assert_eq!(solver.solution(), Some(b1.as_slice()));
    assert_eq!(solver.time(), t1);

    match solver.try_solve() {
        Err(SolverError::Factorization { phase, source }) => {
            assert_eq!(phase, FactorizationPhase::Numeric);
            assert_eq!(source, EngineError::Singular);
        }
        other => panic!("expected numeric factorization failure, got {:?}", other),
    }
}

#[test]
fn reuse_reordering_refactors_numerically_only() {
    let backend = EngineRegistry::with_builtin_engines();
    let first = stiffness(5);
    let mut triplets = SparseTriplets::new(5, 5);
    for i in 0..5 {
        triplets.push(i, i, 8.0);
        if i + 1 < 5 {
            triplets.push(i, i + 1, 2.0);
            triplets.push(i + 1, i, 2.0);
        }
    }
    let second = SystemMatrix::from_triplets(&triplets).unwrap();
    let b = SystemVector::from_vec(vec![1.0; 5]);

    let mut solver = DirectSolver::new(&backend, "Cholesky", &first, &b).unwrap();
    solver.set_factorization_scheme(FactorizationScheme::ReuseReordering);
    assert_eq!(solver.effective_scheme(), FactorizationScheme::FromScratch);

    assert!(solver.solve());
    assert_eq!(solver.num_symbolic_fact(), 1);
    assert_eq!(solver.num_numeric_fact(), 1);

    solver.set_system(&second, &b);
    assert!(solver.solve());
    assert_eq!(solver.num_symbolic_fact(), 1);
    assert_eq!(solver.num_numeric_fact(), 2);
    assert!(residual(&second, solver.solution().unwrap(), &b) < 1e-10);
}

#[test]
fn reuse_with_changed_pattern_fails_numeric_phase() {
    let backend = EngineRegistry::with_builtin_engines();
    let diagonal = matrix_from_rows(2, &[2.0, 0.0, 0.0, 2.0]);
    let full = matrix_from_rows(2, &[2.0, 1.0, 1.0, 2.0]);
    let b = SystemVector::from_vec(vec![1.0, 1.0]);

    let mut solver = DirectSolver::new(&backend, "Lapack", &diagonal, &b).unwrap();
    solver.set_factorization_scheme(FactorizationScheme::ReuseReorderingAndScaling);
    assert!(solver.solve());

    solver.set_system(&full, &b);
    assert!(matches!(
        solver.try_solve(),
        Err(SolverError::Factorization {
            phase: FactorizationPhase::Numeric,
            source: EngineError::PatternChanged,
        })
    ));

    // Starting over from scratch picks up the new pattern
    solver.set_factorization_scheme(FactorizationScheme::FromScratch);
    assert!(solver.solve());
    assert_eq!(solver.num_symbolic_fact(), 2);
}

#[test]
fn structurally_singular_operator_fails_symbolic_phase() {
    let backend = EngineRegistry::with_builtin_engines();
    let a = matrix_from_rows(3, &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    let b = SystemVector::from_vec(vec![1.0, 1.0, 1.0]);

    let mut solver = DirectSolver::new(&backend, "Lapack", &a, &b).unwrap();
    assert!(matches!(
        solver.try_solve(),
        Err(SolverError::Factorization {
            phase: FactorizationPhase::Symbolic,
            source: EngineError::StructurallySingular { index: 1 },
        })
    ));
    assert!(solver.solution().is_none());
    assert_eq!(solver.num_numeric_fact(), 0);
}

#[test]
#[should_panic(expected = "rhs length differ")]
fn dimension_mismatch_is_a_contract_violation() {
    let backend = EngineRegistry::with_builtin_engines();
    let a = stiffness(3);
    let b = SystemVector::from_vec(vec![1.0, 1.0]);

    let mut solver = DirectSolver::new(&backend, "Lapack", &a, &b).unwrap();
    solver.solve();
}

#[test]
fn disabled_backend_refuses_construction() {
    let a = stiffness(2);
    let b = SystemVector::from_vec(vec![1.0, 1.0]);

    assert!(!is_available(&DisabledBackend, "Lapack"));
    let err = DirectSolver::new(&DisabledBackend, "Lapack", &a, &b).unwrap_err();
    assert!(matches!(err, SolverError::BackendNotCompiled));
    assert!(err.to_string().contains("not compiled"));
}

#[test]
fn complex_systems_report_not_implemented() {
    let backend = EngineRegistry::with_builtin_engines();
    let mut triplets = SparseTriplets::new(2, 2);
    triplets.push(0, 0, Complex::new(2.0, 1.0));
    triplets.push(1, 1, Complex::new(2.0, -1.0));
    let a = SystemMatrix::from_triplets(&triplets).unwrap();
    let b = SystemVector::from_vec(vec![Complex::new(1.0, 0.0); 2]);

    let mut solver = DirectSolver::new(&backend, "Lapack", &a, &b).unwrap();
    assert!(!solver.solve());
    assert!(solver.solution().is_none());
    assert_eq!(solver.num_symbolic_fact(), 0);
    assert!(matches!(
        solver.try_solve(),
        Err(SolverError::NotImplemented(_))
    ));
}

#[test]
fn solver_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "engine": "Cholesky", "factorization_scheme": "reuse_reordering_and_scaling" }}"#
    )
    .unwrap();
    let config = DirectSolverConfig::from_path(file.path()).unwrap();

    let backend = EngineRegistry::with_builtin_engines();
    let a = stiffness(4);
    let b = SystemVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);

    let mut solver = DirectSolver::from_config(&backend, &config, &a, &b).unwrap();
    assert_eq!(solver.engine_name(), "Cholesky");
    assert_eq!(
        solver.factorization_scheme(),
        FactorizationScheme::ReuseReorderingAndScaling
    );
    assert!(solver.solve());
    assert!(residual(&a, solver.solution().unwrap(), &b) < 1e-10);
}
