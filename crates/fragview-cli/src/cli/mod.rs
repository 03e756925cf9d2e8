mod args;


pub use args::{SearchArgs, ServeArgs, SessionArgs};

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "fragview", about = "Corpus search with expandable fragments", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the search API over a plain-text corpus file.
    Serve(ServeArgs),
    /// Run a one-shot query against a running server.
    Search(SearchArgs),
    /// Interactive session with load-more and debounced option toggles.
    Session(SessionArgs),
}
