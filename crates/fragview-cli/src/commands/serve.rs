use anyhow::{Context, Result};

use fragview_core::{CoreConfig, Searcher};

use crate::cli::ServeArgs;

pub(super) fn run(args: &ServeArgs) -> Result<()> {
    let config = CoreConfig::from_env();
    let searcher = Searcher::open(&args.corpus, config)
        .with_context(|| format!("failed to load corpus at {}", args.corpus.display()))?;
    tracing::info!(bytes = searcher.len(), "corpus loaded");
    fragview_web::serve_web(searcher, &args.host, args.port)
}
