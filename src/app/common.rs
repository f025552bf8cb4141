use super::{
    app_helper::AppHelper, command::Command, AuthorsCommand, EncodeCommand, SolveCommand,
    SymmetriesCommand,
};
use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches};
use distcover::{
    encoding::EncodingOptions,
    metric::{LatticeSpace, MetricSpace},
    sat::{ExternalMaxSatSolver, LinearSearchMaxSatSolver, MaxSatSolver},
    symmetry::ChainBudget,
};
use log::info;
use std::{fmt::Display, str::FromStr, time::Duration};

pub(crate) fn create_app_helper() -> AppHelper<'static> {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let authors = option_env!("CARGO_PKG_AUTHORS").unwrap_or("unknown authors");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        authors,
        "Minimum distance covers of finite metric spaces.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(AuthorsCommand::new(app_name, app_version, authors)),
        Box::new(EncodeCommand::new()),
        Box::new(SolveCommand::new()),
        Box::new(SymmetriesCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app
}

pub(crate) const ARG_SPACE: &str = "SPACE";

pub(crate) fn space_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_SPACE)
        .short("s")
        .long("space")
        .empty_values(false)
        .multiple(false)
        .help("the metric space, as grid:RxC, taxicab:RxC or cube:DxS")
        .required(true)
}

pub(crate) fn read_space(arg_matches: &ArgMatches<'_>) -> Result<LatticeSpace> {
    let descriptor = arg_matches
        .value_of(ARG_SPACE)
        .ok_or_else(|| anyhow!("missing metric space"))?;
    let space = LatticeSpace::try_from(descriptor)
        .context("while reading the metric space given on the command line")?;
    info!(
        "the metric space {} has {} point(s)",
        descriptor.trim(),
        space.n_points()
    );
    Ok(space)
}

const ARG_NO_SYMMETRY_BREAKING: &str = "NO_SYMMETRY_BREAKING";
const ARG_BACKWARD: &str = "BACKWARD";
const ARG_BUDGET: &str = "BUDGET";
pub(crate) const ARG_BOUND: &str = "BOUND";

pub(crate) fn budget_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_BUDGET)
        .long("budget")
        .empty_values(false)
        .multiple(false)
        .help("the maximal number of operations spent computing the stabilizer chain")
        .required(false)
}

pub(crate) fn encoding_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_NO_SYMMETRY_BREAKING)
            .long("no-symmetry-breaking")
            .takes_value(false)
            .help("do not add symmetry breaking clauses")
            .required(false),
        Arg::with_name(ARG_BACKWARD)
            .long("backward")
            .takes_value(false)
            .help("add the clauses setting a pair variable when both its points are selected")
            .required(false),
        Arg::with_name(ARG_BOUND)
            .long("bound")
            .empty_values(false)
            .multiple(false)
            .help("select at most this number of points, leaving as few distances uncovered as possible")
            .required(false),
        budget_arg(),
    ]
}

pub(crate) fn read_budget(arg_matches: &ArgMatches<'_>) -> Result<ChainBudget> {
    Ok(parse_number::<u64>(arg_matches, ARG_BUDGET)?
        .map(ChainBudget::with_max_operations)
        .unwrap_or_default())
}

pub(crate) fn read_encoding_options(arg_matches: &ArgMatches<'_>) -> Result<EncodingOptions> {
    let options = EncodingOptions {
        symmetry_breaking: !arg_matches.is_present(ARG_NO_SYMMETRY_BREAKING),
        backward_implications: arg_matches.is_present(ARG_BACKWARD),
        budget: read_budget(arg_matches)?,
        max_points: parse_number::<usize>(arg_matches, ARG_BOUND)?,
    };
    if let Some(b) = options.max_points {
        info!("at most {} point(s) may be selected", b);
    }
    info!(
        "symmetry breaking is {}",
        if options.symmetry_breaking {
            "enabled"
        } else {
            "disabled"
        }
    );
    Ok(options)
}

const ARG_TIMEOUT: &str = "TIMEOUT";

pub(crate) fn timeout_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_TIMEOUT)
        .long("timeout")
        .empty_values(false)
        .multiple(false)
        .help("the time limit of the MaxSAT solver, in seconds")
        .required(false)
}

pub(crate) fn read_timeout(arg_matches: &ArgMatches<'_>) -> Result<Option<Duration>> {
    let timeout = parse_number::<u64>(arg_matches, ARG_TIMEOUT)?.map(Duration::from_secs);
    if let Some(t) = timeout {
        info!("the MaxSAT solver is given {:?}", t);
    }
    Ok(timeout)
}

const ARG_EXTERNAL_MAXSAT_SOLVER: &str = "EXTERNAL_MAXSAT_SOLVER";
const ARG_EXTERNAL_MAXSAT_SOLVER_OPTIONS: &str = "EXTERNAL_MAXSAT_SOLVER_OPTIONS";

pub(crate) fn external_maxsat_solver_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_EXTERNAL_MAXSAT_SOLVER)
            .long("external-maxsat-solver")
            .empty_values(false)
            .multiple(false)
            .help("a path to an external MaxSAT solver to replace the embedded one")
            .required(false),
        Arg::with_name(ARG_EXTERNAL_MAXSAT_SOLVER_OPTIONS)
            .long("external-maxsat-solver-opt")
            .requires(ARG_EXTERNAL_MAXSAT_SOLVER)
            .empty_values(false)
            .multiple(true)
            .number_of_values(1)
            .allow_hyphen_values(true)
            .help("an option to give to the external MaxSAT solver")
            .required(false),
    ]
}

pub(crate) fn has_external_maxsat_solver(arg_matches: &ArgMatches<'_>) -> bool {
    arg_matches.is_present(ARG_EXTERNAL_MAXSAT_SOLVER)
}

pub(crate) fn create_maxsat_solver(
    arg_matches: &ArgMatches<'_>,
    timeout: Option<Duration>,
) -> Box<dyn MaxSatSolver> {
    let external_solver = arg_matches
        .value_of(ARG_EXTERNAL_MAXSAT_SOLVER)
        .map(|s| s.to_string());
    let external_solver_options = arg_matches
        .values_of(ARG_EXTERNAL_MAXSAT_SOLVER_OPTIONS)
        .map(|v| v.map(|o| o.to_string()).collect::<Vec<String>>())
        .unwrap_or_default();
    if let Some(s) = external_solver {
        info!("using {} as MaxSAT solver", s);
        let mut solver = ExternalMaxSatSolver::new(s, external_solver_options);
        solver.set_timeout(timeout);
        Box::new(solver)
    } else {
        info!("using the embedded linear search MaxSAT solver");
        let mut solver = LinearSearchMaxSatSolver::default();
        solver.set_timeout(timeout);
        Box::new(solver)
    }
}

pub(crate) fn parse_number<T>(arg_matches: &ArgMatches<'_>, arg_name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    arg_matches
        .value_of(arg_name)
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| anyhow!("{}", e))
                .with_context(|| format!(r#"while parsing the number "{}""#, v))
        })
        .transpose()
}

pub(crate) fn space_comments<M>(space: &M, descriptor: &str) -> Vec<String>
where
    M: MetricSpace,
{
    std::iter::once(format!("space: {}", descriptor.trim()))
        .chain((0..space.n_points()).map(|p| format!("point {}: {}", p + 1, space.point_label(p))))
        .collect()
}

pub(crate) fn space_descriptor<'a>(arg_matches: &'a ArgMatches<'_>) -> &'a str {
    arg_matches.value_of(ARG_SPACE).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::App;

    fn matches(args: &[&str]) -> ArgMatches<'static> {
        App::new("test")
            .arg(space_arg())
            .args(&encoding_args())
            .arg(timeout_arg())
            .args(&external_maxsat_solver_args())
            .get_matches_from_safe(std::iter::once("test").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_read_space() {
        let m = matches(&["-s", "grid:3x4"]);
        assert_eq!(12, read_space(&m).unwrap().n_points());
    }

    #[test]
    fn test_read_wrong_space() {
        let m = matches(&["-s", "ring:3x4"]);
        assert!(read_space(&m).is_err());
    }

    #[test]
    fn test_default_encoding_options() {
        let m = matches(&["-s", "grid:3x4"]);
        assert_eq!(EncodingOptions::default(), read_encoding_options(&m).unwrap());
        assert_eq!(None, read_timeout(&m).unwrap());
    }

    #[test]
    fn test_encoding_options() {
        let m = matches(&[
            "-s",
            "grid:3x4",
            "--no-symmetry-breaking",
            "--backward",
            "--budget",
            "1000",
        ]);
        let options = read_encoding_options(&m).unwrap();
        assert!(!options.symmetry_breaking);
        assert!(options.backward_implications);
        assert_eq!(1000, options.budget.max_operations);
    }

    #[test]
    fn test_bound() {
        let m = matches(&["-s", "grid:3x4", "--bound", "4"]);
        assert_eq!(Some(4), read_encoding_options(&m).unwrap().max_points);
        let m = matches(&["-s", "grid:3x4", "--bound", "four"]);
        assert!(read_encoding_options(&m).is_err());
    }

    #[test]
    fn test_wrong_budget() {
        let m = matches(&["-s", "grid:3x4", "--budget", "lots"]);
        assert!(read_encoding_options(&m).is_err());
    }

    #[test]
    fn test_timeout() {
        let m = matches(&["-s", "grid:3x4", "--timeout", "3"]);
        assert_eq!(Some(Duration::from_secs(3)), read_timeout(&m).unwrap());
    }

    #[test]
    fn test_external_solver_options() {
        let m = matches(&[
            "-s",
            "grid:3x4",
            "--external-maxsat-solver",
            "/bin/solver",
            "--external-maxsat-solver-opt",
            "-v",
            "--external-maxsat-solver-opt",
            "/dev/stdin",
        ]);
        assert!(has_external_maxsat_solver(&m));
        assert_eq!(
            vec!["-v", "/dev/stdin"],
            m.values_of(ARG_EXTERNAL_MAXSAT_SOLVER_OPTIONS)
                .unwrap()
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_space_comments() {
        let space = LatticeSpace::try_from("grid:1x2").unwrap();
        assert_eq!(
            vec!["space: grid:1x2", "point 1: (0,0)", "point 2: (0,1)"],
            space_comments(&space, " grid:1x2")
        );
    }
}
