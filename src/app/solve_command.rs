use super::{cli_manager::logging_level_cli_arg, command::Command, common};
use anyhow::{Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use distcover::{
    io::{CoverWriter, ResponseWriter},
    metric::MetricSpace,
    solvers::DistanceCoverSolver,
};
use log::{info, warn};

const CMD_NAME: &str = "solve";

const ARG_ALL: &str = "ALL";
const ARG_LIMIT: &str = "LIMIT";

pub(crate) struct SolveCommand;

impl SolveCommand {
    pub(crate) fn new() -> Self {
        SolveCommand
    }
}

impl<'a> Command<'a> for SolveCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Computes a minimum distance cover of a metric space, or the best selection of a bounded number of points")
            .setting(AppSettings::DisableVersion)
            .arg(common::space_arg())
            .args(&common::encoding_args())
            .arg(
                Arg::with_name(ARG_ALL)
                    .long("all")
                    .takes_value(false)
                    .conflicts_with(common::ARG_BOUND)
                    .help("list the minimum covers instead of a single one")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_LIMIT)
                    .long("limit")
                    .requires(ARG_ALL)
                    .empty_values(false)
                    .multiple(false)
                    .help("the maximal number of covers to list")
                    .required(false),
            )
            .arg(common::timeout_arg())
            .args(&common::external_maxsat_solver_args())
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let space = common::read_space(arg_matches)?;
        let options = common::read_encoding_options(arg_matches)?;
        let timeout = common::read_timeout(arg_matches)?;
        let mut solver = DistanceCoverSolver::new_with_options(&space, options);
        solver.set_timeout(timeout);
        let writer = CoverWriter;
        let mut out = std::io::stdout();
        let labels =
            |cover: &[usize]| cover.iter().map(|p| space.point_label(*p)).collect::<Vec<_>>();
        if let Some(bound) = options.max_points {
            solver.set_maxsat_solver(common::create_maxsat_solver(arg_matches, timeout));
            return match solver
                .compute_bounded_cover(bound)
                .context("while computing a bounded cover")?
            {
                Some(selection) => {
                    writer.write_cover(&mut out, &labels(selection.points()))?;
                    let uncovered = selection
                        .uncovered_distances()
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<String>>();
                    writer.write_uncovered_distances(&mut out, &uncovered)
                }
                None => writer.write_no_cover(&mut out),
            };
        }
        if arg_matches.is_present(ARG_ALL) {
            if common::has_external_maxsat_solver(arg_matches) {
                warn!("covers are listed with the embedded solver; the external MaxSAT solver is ignored");
            }
            let limit = common::parse_number::<usize>(arg_matches, ARG_LIMIT)?;
            let covers = solver
                .enumerate_optimal_covers(limit)
                .context("while listing the minimum covers")?;
            info!("listed {} minimum cover(s)", covers.len());
            if covers.is_empty() {
                return writer.write_no_cover(&mut out);
            }
            covers
                .iter()
                .try_for_each(|c| writer.write_cover(&mut out, &labels(c.as_slice())))
        } else {
            solver.set_maxsat_solver(common::create_maxsat_solver(arg_matches, timeout));
            match solver
                .compute_minimum_cover()
                .context("while computing a minimum cover")?
            {
                Some(cover) => writer.write_cover(&mut out, &labels(cover.as_slice())),
                None => writer.write_no_cover(&mut out),
            }
        }
    }
}
