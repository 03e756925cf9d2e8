mod search;
mod serve;
mod session;

use anyhow::Result;

use crate::cli::Command;

pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Serve(args) => serve::run(&args),
        Command::Search(args) => search::run(&args),
        Command::Session(args) => session::run(&args),
    }
}
