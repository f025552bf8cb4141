use super::{cli_manager::logging_level_cli_arg, command::Command, common};
use anyhow::{Context, Result};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use distcover::{
    encoding::{DistanceCoverEncoder, EncodingOptions},
    symmetry::StabilizerChain,
};
use std::io::Write;

const CMD_NAME: &str = "symmetries";

pub(crate) struct SymmetriesCommand;

impl SymmetriesCommand {
    pub(crate) fn new() -> Self {
        SymmetriesCommand
    }
}

impl<'a> Command<'a> for SymmetriesCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Displays the stabilizer chain of the isometries acting on the pairs of points")
            .setting(AppSettings::DisableVersion)
            .arg(common::space_arg())
            .arg(common::budget_arg())
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let space = common::read_space(arg_matches)?;
        let options = EncodingOptions {
            budget: common::read_budget(arg_matches)?,
            ..Default::default()
        };
        let encoded = DistanceCoverEncoder::new(options)
            .encode(&space)
            .context("while computing the stabilizer chain")?;
        let mut out = std::io::stdout();
        match encoded.chain() {
            Some(chain) => write_chain(&mut out, chain, |p| {
                let pair = encoded.pair_index().pair(p);
                format!("{}-{}", pair.first() + 1, pair.second() + 1)
            }),
            None => writeln!(out, "group order: 1").context("while writing the stabilizer chain"),
        }
    }
}

fn write_chain<F>(writer: &mut dyn Write, chain: &StabilizerChain, pair_label: F) -> Result<()>
where
    F: Fn(usize) -> String,
{
    let context = "while writing the stabilizer chain";
    for (i, level) in chain.levels().iter().enumerate() {
        if let (Some(base), Some(orbit)) = (level.base_point(), level.chosen_orbit()) {
            writeln!(
                writer,
                "level {}: base pair {}, orbit size {}, {}",
                i,
                pair_label(base),
                orbit.len(),
                if level.breaks_symmetry() {
                    "breaking"
                } else {
                    "not breaking"
                }
            )
            .context(context)?;
        }
    }
    writeln!(writer, "group order: {}", chain.group_order()).context(context)?;
    writer.flush().context(context)
}
