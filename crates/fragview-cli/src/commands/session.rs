use std::io::{BufRead, Write};
use std::time::Instant;

use anyhow::Result;

use fragview_core::{
    CoreConfig, Debouncer, Direction, HttpFetcher, SearchToggle, SessionController,
};

use crate::cli::SessionArgs;
use crate::render;

pub(super) fn run(args: &SessionArgs) -> Result<()> {
    let config = CoreConfig::from_env();
    let mut controller =
        SessionController::new(HttpFetcher::new(args.server.clone()), config.line_limit);
    let mut debouncer = Debouncer::new(config.debounce_window);
    let mut last_query = String::new();

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    print_help(&mut stdout.lock())?;

    let mut input = String::new();
    loop {
        {
            let mut out = stdout.lock();
            write!(out, "fragview> ")?;
            out.flush()?;
        }
        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        // A toggle burst settles into a single search once the quiet window
        // has elapsed by the time the next command arrives.
        if debouncer.fire_due(Instant::now()) && !last_query.is_empty() {
            run_search(&mut controller, &last_query)?;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "q" if !rest.is_empty() => {
                // Explicit submission executes immediately, never debounced.
                debouncer.cancel();
                last_query = rest.to_string();
                run_search(&mut controller, &last_query)?;
            }
            "t" => match SearchToggle::parse(rest) {
                Ok(toggle) => {
                    let options = controller.toggle_option(toggle);
                    debouncer.trigger(Instant::now());
                    let mut out = stdout.lock();
                    writeln!(out, "options: {options:?}")?;
                }
                Err(err) => writeln!(stdout.lock(), "{err}")?,
            },
            "p" | "n" => {
                let direction = if command == "p" {
                    Direction::Previous
                } else {
                    Direction::Next
                };
                run_load(&mut controller, rest, direction)?;
            }
            "show" => render::print_fragments(controller.fragments())?,
            "help" => print_help(&mut stdout.lock())?,
            "quit" | "exit" => break,
            other => writeln!(stdout.lock(), "unknown command: {other} (try help)")?,
        }
    }
    Ok(())
}

fn run_search(controller: &mut SessionController<HttpFetcher>, query: &str) -> Result<()> {
    let stdout = std::io::stdout();
    match controller.search(query) {
        Ok(generation) => {
            writeln!(
                stdout.lock(),
                "search #{generation}: {} fragments",
                controller.fragments().len()
            )?;
            render::print_fragments(controller.fragments())?;
        }
        Err(err) => writeln!(stdout.lock(), "search failed: {err}")?,
    }
    Ok(())
}

fn run_load(
    controller: &mut SessionController<HttpFetcher>,
    raw_index: &str,
    direction: Direction,
) -> Result<()> {
    let stdout = std::io::stdout();
    let Ok(index) = raw_index.trim().parse::<usize>() else {
        writeln!(stdout.lock(), "usage: {direction} <fragment-number>")?;
        return Ok(());
    };
    // Fragments are presented one-based.
    let Some(index) = index.checked_sub(1) else {
        writeln!(stdout.lock(), "fragment numbers start at 1")?;
        return Ok(());
    };
    match controller.load_more(index, direction) {
        Ok(outcome) => {
            let mut out = stdout.lock();
            writeln!(out, "{outcome:?}")?;
            if let Some(fragment) = controller.fragments().get(index) {
                render::write_fragment(&mut out, &render::terminal_highlighter(), index, fragment)?;
            }
        }
        Err(err) => writeln!(stdout.lock(), "load failed: {err}")?,
    }
    Ok(())
}

fn print_help(out: &mut impl Write) -> Result<()> {
    writeln!(out, "commands:")?;
    writeln!(out, "  q <text>             run a search")?;
    writeln!(out, "  t case|word|regex    toggle an option (debounced re-search)")?;
    writeln!(out, "  p <fragment>         load previous context lines")?;
    writeln!(out, "  n <fragment>         load next context lines")?;
    writeln!(out, "  show                 print the current fragments")?;
    writeln!(out, "  quit                 leave the session")?;
    Ok(())
}
