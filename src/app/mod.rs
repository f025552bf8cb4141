mod app_helper;

mod authors_command;
pub(crate) use authors_command::AuthorsCommand;

mod cli_manager;

mod command;

pub(crate) mod common;

mod encode_command;
pub(crate) use encode_command::EncodeCommand;

mod solve_command;
pub(crate) use solve_command::SolveCommand;

mod symmetries_command;
pub(crate) use symmetries_command::SymmetriesCommand;

mod writable_string;
