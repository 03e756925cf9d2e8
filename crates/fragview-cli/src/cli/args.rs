use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Plain-text corpus file to search.
    pub corpus: PathBuf,
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 3001)]
    pub port: u16,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(allow_hyphen_values = true)]
    pub query: String,
    /// Base URL of a running fragview server.
    #[arg(long, default_value = "http://127.0.0.1:3001")]
    pub server: String,
    /// Match the query case-sensitively.
    #[arg(long, default_value_t = false)]
    pub match_case: bool,
    /// Require matches to sit on word boundaries.
    #[arg(long, default_value_t = false)]
    pub whole_word: bool,
    /// Treat the query as a regular expression.
    #[arg(long, default_value_t = false)]
    pub regex: bool,
}

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Base URL of a running fragview server.
    #[arg(long, default_value = "http://127.0.0.1:3001")]
    pub server: String,
}
