use std::path::Path;
use std::process::ExitCode;

use hermes_solver::{
    default_backend, DirectSolver, DirectSolverConfig, LinearSolver, SparseTriplets, SystemMatrix,
    SystemVector,
};
use serde::Deserialize;

/// Linear system file: square operator as COO triplets plus right-hand side.
#[derive(Debug, Deserialize)]
struct SystemFile {
    size: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
    rhs: Vec<f64>,
}

impl SystemFile {
    fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path).map_err(|err| format!("{}: {err}", path.display()))?;
        serde_json::from_str(&text).map_err(|err| format!("{}: {err}", path.display()))
    }

    fn into_system(self) -> Result<(SystemMatrix<f64>, SystemVector<f64>), String> {
        let triplets = SparseTriplets {
            nrows: self.size,
            ncols: self.size,
            row_indices: self.rows,
            col_indices: self.cols,
            values: self.values,
        };
        let matrix = SystemMatrix::from_triplets(&triplets).map_err(|err| err.to_string())?;
        if self.rhs.len() != self.size {
            return Err(format!(
                "rhs has {} entries, system size is {}",
                self.rhs.len(),
                self.size
            ));
        }
        Ok((matrix, SystemVector::from_vec(self.rhs)))
    }
}

fn usage() {
    eprintln!("usage: hermes-cli solve <system.json> [config.json]");
    eprintln!("       hermes-cli engines");
}

fn list_engines() -> ExitCode {
    let backend = default_backend();
    if !backend.is_compiled() {
        eprintln!("direct solver backend not compiled");
        return ExitCode::from(1);
    }
    for name in backend.engine_names() {
        println!("{name}");
    }
    ExitCode::SUCCESS
}

fn solve(system_path: &str, config_path: Option<&str>) -> ExitCode {
    let config = match config_path {
        Some(path) => match DirectSolverConfig::from_path(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("config error: {err}");
                return ExitCode::from(1);
            }
        },
        None => DirectSolverConfig::default(),
    };

    let (matrix, rhs) = match SystemFile::load(Path::new(system_path)).and_then(SystemFile::into_system) {
        Ok(system) => system,
        Err(err) => {
            eprintln!("load error: {err}");
            return ExitCode::from(1);
        }
    };
    log::info!(
        "loaded system: {} unknowns, {} non-zeros",
        matrix.size(),
        matrix.nnz()
    );

    let backend = default_backend();
    let mut solver = match DirectSolver::from_config(backend.as_ref(), &config, &matrix, &rhs) {
        Ok(solver) => solver,
        Err(err) => {
            eprintln!("solver error: {err}");
            return ExitCode::from(1);
        }
    };

    if !solver.solve() {
        eprintln!("solve failed with engine '{}'", config.engine);
        return ExitCode::from(1);
    }

    if let Some(solution) = solver.solution() {
        for value in solution {
            println!("{value:.12e}");
        }
    }
    eprintln!("solved in {:.6e} s ({})", solver.time(), solver.engine_name());
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("solve") if args.len() == 3 || args.len() == 4 => {
            solve(&args[2], args.get(3).map(String::as_str))
        }
        Some("engines") if args.len() == 2 => list_engines(),
        _ => {
            usage();
            ExitCode::from(2)
        }
    }
}
