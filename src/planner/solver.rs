use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use good_lp::constraint::{eq, geq, leq};
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, microlp,
    variable,
};
use tracing::{debug, info, warn};

use crate::error::{MenuError, Result};
use crate::planner::model::{LinearExpr, MilpModel, Sense, VarKind};

/// How a returned assignment relates to the optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Best incumbent found before the time limit; may not be optimal.
    TimeLimitFeasible,
}

/// A solver's assignment for every model variable, indexed by `VarId`.
#[derive(Debug, Clone)]
pub struct SolverOutput {
    pub status: SolveStatus,
    pub objective: f64,
    pub values: Vec<f64>,
    pub elapsed: Duration,
}

/// A mixed-integer solver the engine can submit a model to.
///
/// Implementations return `Infeasible`, `Unbounded` or `Solver` errors for
/// non-solutions and never retry on their own.
pub trait MilpSolver {
    fn solve(&self, model: &MilpModel, time_limit: Duration) -> Result<SolverOutput>;
}

/// Pure-Rust branch-and-bound backend (`good_lp` + `microlp`).
///
/// The solve runs on a worker thread; the caller waits at most `time_limit`.
/// microlp cannot be interrupted, so a run that overruns the limit is
/// reported as a solver error and its thread is kept here until it finishes.
/// While it runs, further solves on this solver (or its clones) are refused,
/// so at most one overrunning thread exists per solver.
#[derive(Debug, Clone, Default)]
pub struct MicroLpSolver {
    overrun: Arc<Mutex<Option<JoinHandle<()>>>>,
}

type SolveJob = fn(&MilpModel) -> Result<Vec<f64>>;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a timed-out solve is still running.
    pub fn is_busy(&self) -> bool {
        self.overrun
            .lock()
            .map(|slot| slot.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    fn run(&self, model: &MilpModel, time_limit: Duration, job: SolveJob) -> Result<SolverOutput> {
        let mut overrun = self
            .overrun
            .lock()
            .map_err(|_| MenuError::Solver("solver state is poisoned".to_string()))?;
        if let Some(handle) = overrun.take() {
            if !handle.is_finished() {
                *overrun = Some(handle);
                return Err(MenuError::Solver(
                    "an earlier solve is still running past its time limit".to_string(),
                ));
            }
            let _ = handle.join();
            debug!("reaped finished overrunning solve");
        }

        let shared = Arc::new(model.clone());
        let (tx, rx) = mpsc::channel();
        let started = Instant::now();

        debug!(
            variables = model.variables().len(),
            constraints = model.constraints().len(),
            ?time_limit,
            "submitting model to microlp"
        );

        let handle = thread::Builder::new()
            .name("menu-milp".to_string())
            .spawn(move || {
                let _ = tx.send(job(&shared));
            })?;

        let values = match rx.recv_timeout(time_limit) {
            Ok(result) => {
                let _ = handle.join();
                result?
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(?time_limit, "solver hit the time limit without an incumbent");
                *overrun = Some(handle);
                return Err(MenuError::Solver(format!(
                    "time limit of {:?} reached without a feasible incumbent",
                    time_limit
                )));
            }
            Err(RecvTimeoutError::Disconnected) => {
                let _ = handle.join();
                return Err(MenuError::Solver(
                    "solver thread terminated without a result".to_string(),
                ));
            }
        };

        let elapsed = started.elapsed();
        let objective = model.objective().evaluate(&values);
        info!(objective, ?elapsed, "solver finished");

        Ok(SolverOutput {
            status: SolveStatus::Optimal,
            objective,
            values,
            elapsed,
        })
    }
}

impl MilpSolver for MicroLpSolver {
    fn solve(&self, model: &MilpModel, time_limit: Duration) -> Result<SolverOutput> {
        self.run(model, time_limit, solve_blocking)
    }
}

fn to_expression(expr: &LinearExpr, vars: &[Variable]) -> Expression {
    let mut out = Expression::with_capacity(expr.len());
    for (id, coef) in expr.terms() {
        out.add_mul(coef, vars[id.index()]);
    }
    out
}

/// Translate and solve `model`, returning one value per variable.
fn solve_blocking(model: &MilpModel) -> Result<Vec<f64>> {
    let mut problem_vars = ProblemVariables::new();
    let mut vars = Vec::with_capacity(model.variables().len());
    for def in model.variables() {
        let definition = match def.kind {
            VarKind::Binary => variable().binary(),
            VarKind::Continuous { lower, upper } => {
                let d = variable().min(lower);
                match upper {
                    Some(hi) => d.max(hi),
                    None => d,
                }
            }
        };
        vars.push(problem_vars.add(definition.name(def.name.clone())));
    }

    let objective = to_expression(model.objective(), &vars);
    let mut problem = problem_vars.minimise(objective).using(microlp);
    for c in model.constraints() {
        let lhs = to_expression(&c.expr, &vars);
        let constraint = match c.sense {
            Sense::Le => leq(lhs, c.rhs),
            Sense::Ge => geq(lhs, c.rhs),
            Sense::Eq => eq(lhs, c.rhs),
        };
        problem.add_constraint(constraint);
    }

    let solution = problem.solve().map_err(map_resolution_error)?;
    Ok(vars.iter().map(|&v| solution.value(v)).collect())
}

fn map_resolution_error(err: ResolutionError) -> MenuError {
    match err {
        ResolutionError::Infeasible => {
            MenuError::Infeasible("no assignment satisfies every hard constraint".to_string())
        }
        ResolutionError::Unbounded => MenuError::Unbounded,
        other => MenuError::Solver(other.to_string()),
    }
}
