use super::{cli_manager::logging_level_cli_arg, command::Command, common};
use anyhow::{Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use distcover::{
    encoding::DistanceCoverEncoder,
    io::{ClauseGraphWriter, InstanceWriter, WcnfWriter},
};
use log::info;

const CMD_NAME: &str = "encode";

const ARG_FORMAT: &str = "FORMAT";

pub(crate) struct EncodeCommand;

impl EncodeCommand {
    pub(crate) fn new() -> Self {
        EncodeCommand
    }
}

impl<'a> Command<'a> for EncodeCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Writes the MaxSAT instance encoding the distance cover problem of a metric space")
            .setting(AppSettings::DisableVersion)
            .arg(common::space_arg())
            .args(&common::encoding_args())
            .arg(
                Arg::with_name(ARG_FORMAT)
                    .short("f")
                    .long("format")
                    .empty_values(false)
                    .multiple(false)
                    .possible_values(&["wcnf", "graph"])
                    .default_value("wcnf")
                    .help("the output format: the instance or the graph of its hard clauses")
                    .required(false),
            )
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let space = common::read_space(arg_matches)?;
        let options = common::read_encoding_options(arg_matches)?;
        let encoded = DistanceCoverEncoder::new(options)
            .encode(&space)
            .context("while encoding the metric space")?;
        let comments = common::space_comments(&space, common::space_descriptor(arg_matches));
        let writer: Box<dyn InstanceWriter> = match arg_matches.value_of(ARG_FORMAT) {
            Some("graph") => Box::new(ClauseGraphWriter::default().with_comments(comments)),
            _ => Box::new(WcnfWriter::default().with_comments(comments)),
        };
        info!(
            "writing an instance with {} variables and {} hard clauses",
            encoded.instance().n_vars(),
            encoded.instance().hard_clauses().len()
        );
        let mut out = std::io::stdout();
        writer.write_instance(&mut out, encoded.instance())
    }
}
