use anyhow::{Context, Result};

use fragview_core::{CoreConfig, HttpFetcher, SearchOptions, SessionController};

use crate::cli::SearchArgs;
use crate::render;

pub(super) fn run(args: &SearchArgs) -> Result<()> {
    let config = CoreConfig::from_env();
    let mut controller =
        SessionController::new(HttpFetcher::new(args.server.clone()), config.line_limit);
    controller.set_options(SearchOptions {
        match_case: args.match_case,
        match_whole_word: args.whole_word,
        use_regular_expression: args.regex,
    });

    controller
        .search(&args.query)
        .with_context(|| format!("search against {} failed", args.server))?;
    render::print_fragments(controller.fragments())
}
