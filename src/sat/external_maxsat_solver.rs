use super::{Assignment, MaxSatOutcome, MaxSatSolver};
use crate::{
    encoding::MaxSatInstance,
    error::{CoverError, Result},
    io::{InstanceWriter, WcnfWriter},
};
use log::{debug, info, warn};
use std::{
    io::{BufRead, BufReader, Read, Write},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

const POLLING_INTERVAL: Duration = Duration::from_millis(10);

/// A MaxSAT solver which execution is made by a system command.
///
/// The system command is composed by an executable program, and a potential list of CLI arguments.
///
/// The solver must read a WCNF instance from its standard input (if it does not by default, this may be possible with the right CLI arguments).
/// Its output must follow the format of the MaxSAT evaluations:
/// a status line (`s OPTIMUM FOUND` or `s UNSATISFIABLE`), cost lines (`o`) and value lines (`v`).
/// Value lines may either list literals or give a string of `0` and `1`, one character per variable.
///
/// If a timeout is set and the solver does not terminate in time, the process is killed.
pub struct ExternalMaxSatSolver {
    program: String,
    options: Vec<String>,
    timeout: Option<Duration>,
}

impl ExternalMaxSatSolver {
    /// Builds a new external MaxSAT solver.
    ///
    /// The `program` argument is the path from a directory in execution path to the software to execute.
    /// The `options` parameter is the CLI options to provide to the software under execution.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use distcover::encoding::DistanceCoverEncoder;
    /// # use distcover::metric::Grid;
    /// # use distcover::sat::{ExternalMaxSatSolver, MaxSatSolver};
    /// let mut solver = ExternalMaxSatSolver::new(
    ///     "/home/me/my_solver".to_string(),
    ///     vec!["/dev/stdin".to_string()],
    /// );
    /// let encoded = DistanceCoverEncoder::default().encode(&Grid::new(3, 3)).unwrap();
    /// let outcome = solver.solve(encoded.instance()).unwrap();
    /// assert_eq!(Some(5), outcome.cost());
    /// ```
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self {
            program,
            options,
            timeout: None,
        }
    }

    /// Sets the time limit of the solver calls.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    fn exec_solver(&self, instance: &MaxSatInstance) -> Result<String> {
        let mut wcnf = Vec::new();
        WcnfWriter::default()
            .write_instance(&mut wcnf, instance)
            .map_err(|e| CoverError::solver_failure(format!("{:#}", e)))?;
        debug!(
            r#"running the external MaxSAT solver "{}" with options {:?}"#,
            self.program, self.options
        );
        let mut child = Command::new(&self.program)
            .args(&self.options)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| {
                CoverError::solver_failure(format!(
                    r#"cannot run the external solver "{}": {}"#,
                    self.program, e
                ))
            })?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CoverError::solver_failure("cannot open the standard input of the solver"))?;
        thread::spawn(move || {
            // the solver may exit before reading its whole input
            let _ = stdin.write_all(&wcnf).and_then(|_| stdin.flush());
        });
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| CoverError::solver_failure("cannot open the standard output of the solver"))?;
        let output_reader = thread::spawn(move || {
            let mut output = String::new();
            stdout.read_to_string(&mut output).map(|_| output)
        });
        self.wait(&mut child)?;
        output_reader
            .join()
            .map_err(|_| CoverError::solver_failure("the thread reading the solver output panicked"))?
            .map_err(|e| CoverError::solver_failure(format!("cannot read the solver output: {}", e)))
    }

    fn wait(&self, child: &mut Child) -> Result<()> {
        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!("the external solver exited with {}", status);
                    return Ok(());
                }
                Ok(None) => {}
                Err(e) => {
                    return Err(CoverError::solver_failure(format!(
                        "error while waiting for the solver: {}",
                        e
                    )))
                }
            }
            if let Some(timeout) = self.timeout {
                if start.elapsed() >= timeout {
                    warn!("the external solver reached the time limit; killing it");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CoverError::SolverTimeout(timeout));
                }
            }
            thread::sleep(POLLING_INTERVAL);
        }
    }
}

impl MaxSatSolver for ExternalMaxSatSolver {
    fn solve(&mut self, instance: &MaxSatInstance) -> Result<MaxSatOutcome> {
        let output = self.exec_solver(instance)?;
        let outcome = read_maxsat_output(output.as_bytes(), instance.n_vars())?;
        match outcome {
            MaxSatOutcome::Optimum { assignment, cost } => {
                let actual_cost = instance.cost(&assignment);
                if actual_cost != cost {
                    warn!(
                        "the solver announced a cost of {} while its assignment has cost {}",
                        cost, actual_cost
                    );
                }
                info!("the external solver found an optimum of cost {}", actual_cost);
                Ok(MaxSatOutcome::Optimum {
                    assignment,
                    cost: actual_cost,
                })
            }
            MaxSatOutcome::Unsatisfiable => {
                info!("the external solver proved the hard clauses unsatisfiable");
                Ok(outcome)
            }
        }
    }
}

/// Reads the output of a MaxSAT solver following the format of the MaxSAT evaluations.
///
/// The cost of the returned outcome is the last one given by an `o` line, or 0 if there is no such line.
fn read_maxsat_output<R>(reader: R, n_vars: usize) -> Result<MaxSatOutcome>
where
    R: Read,
{
    let context = "error while reading the MaxSAT solver output";
    let fail = |msg: String| CoverError::solver_failure(format!("{}: {}", context, msg));
    let mut status = None;
    let mut cost = None;
    let mut assignment = vec![None; n_vars];
    let mut assignment_line_seen = false;
    for line in BufReader::new(reader).lines() {
        let line = line.map_err(|e| fail(e.to_string()))?;
        let line = line.trim_end();
        if let Some(s) = line.strip_prefix("s ") {
            if status.is_some() {
                return Err(fail("multiple status lines".to_string()));
            }
            status = Some(s.trim().to_string());
        } else if let Some(o) = line.strip_prefix("o ") {
            cost = Some(
                o.trim()
                    .parse::<u64>()
                    .map_err(|_| fail(format!(r#""{}" is not a cost"#, o.trim())))?,
            );
        } else if let Some(v) = line.strip_prefix("v ") {
            assignment_line_seen = true;
            read_value_line(v, &mut assignment).map_err(fail)?;
        } else if !line.starts_with("c ") && line != "c" && line != "v" && !line.is_empty() {
            return Err(fail(format!(r#"unexpected line "{}""#, line)));
        }
    }
    match status.as_deref() {
        Some("OPTIMUM FOUND") if assignment_line_seen => Ok(MaxSatOutcome::Optimum {
            assignment: Assignment::new(assignment),
            cost: cost.unwrap_or_default(),
        }),
        Some("OPTIMUM FOUND") => Err(fail("no value line".to_string())),
        Some("UNSATISFIABLE") => Ok(MaxSatOutcome::Unsatisfiable),
        Some(s) => Err(fail(format!(r#"the solver answered "{}""#, s))),
        None => Err(fail("no status line".to_string())),
    }
}

fn read_value_line(line: &str, assignment: &mut [Option<bool>]) -> std::result::Result<(), String> {
    let words = line.split_ascii_whitespace().collect::<Vec<&str>>();
    // a single 0/1 word is a bit string only if it gives a value to each variable, otherwise it is a literal
    if words.len() == 1
        && words[0].len() > 1
        && words[0].len() == assignment.len()
        && words[0].chars().all(|c| c == '0' || c == '1')
    {
        words[0]
            .chars()
            .enumerate()
            .for_each(|(i, c)| assignment[i] = Some(c == '1'));
        return Ok(());
    }
    for w in words {
        let n = w
            .parse::<isize>()
            .map_err(|_| format!(r#""{}" is not a literal"#, w))?;
        if n == 0 {
            continue;
        }
        let v = n.unsigned_abs() - 1;
        if v >= assignment.len() {
            return Err("a variable in value line is out of bounds".to_string());
        }
        assignment[v] = Some(n > 0);
    }
    Ok(())
}
