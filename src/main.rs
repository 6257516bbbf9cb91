//! gridkit - an extensible grid widget in the terminal

mod config;
mod error;
mod tui;

use anyhow::{Context, bail};
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_COLS: usize = 26;
const DEFAULT_ROWS: usize = 200;
const LOG_ENV: &str = "GRIDKIT_LOG";

fn print_usage() {
    eprintln!("Usage: gridkit [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --cols <N>                Number of columns (default: {})", DEFAULT_COLS);
    eprintln!("  --rows <N>                Number of rows (default: {})", DEFAULT_ROWS);
    eprintln!("  --keymap <name>           Select keybindings: standard, vim or a custom name");
    eprintln!("  --keymap-file <path>      Load keymaps and widget options from TOML file");
    eprintln!("  --log-file <path>         Write logs to a file ({} sets the filter)", LOG_ENV);
    eprintln!("  --print-keymap            Print the resolved key bindings and exit");
    eprintln!("  -h, --help                Print help");
}

struct Args {
    cols: usize,
    rows: usize,
    keymap: Option<String>,
    keymap_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    print_keymap: bool,
}

/// `Ok(None)` means help was printed.
fn parse_args(args: &[String]) -> anyhow::Result<Option<Args>> {
    let mut parsed = Args {
        cols: DEFAULT_COLS,
        rows: DEFAULT_ROWS,
        keymap: None,
        keymap_file: None,
        log_file: None,
        print_keymap: false,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{} requires a value", flag))
        };
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "--cols" => {
                let raw = value("--cols")?;
                parsed.cols = raw.parse().with_context(|| format!("invalid --cols '{}'", raw))?;
            }
            "--rows" => {
                let raw = value("--rows")?;
                parsed.rows = raw.parse().with_context(|| format!("invalid --rows '{}'", raw))?;
            }
            "--keymap" => parsed.keymap = Some(value("--keymap")?),
            "--keymap-file" => parsed.keymap_file = Some(PathBuf::from(value("--keymap-file")?)),
            "--log-file" => parsed.log_file = Some(PathBuf::from(value("--log-file")?)),
            "--print-keymap" => parsed.print_keymap = true,
            other => {
                print_usage();
                bail!("unknown option: {}", other);
            }
        }
    }
    Ok(Some(parsed))
}

/// Logs go to a file or nowhere: the terminal belongs to the UI.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let Some(args) = parse_args(&args)? else {
        return Ok(());
    };
    init_logging(args.log_file.as_deref())?;

    let config = config::load_config(args.keymap.as_deref(), args.keymap_file.as_deref());
    for warning in &config.warnings {
        eprintln!("Warning: {}", warning);
        tracing::warn!("{}", warning);
    }

    if args.print_keymap {
        println!("keymap: {}", config.keymap.name());
        if let Some(description) = &config.keymap.description {
            println!("# {}", description);
        }
        for binding in &config.keymap.bindings {
            println!("{:<12} {}", binding.combo.display(), binding.action.name());
        }
        return Ok(());
    }

    let mut app = tui::App::new(args.cols, args.rows, config.keymap, config.options)
        .context("failed to start gridkit")?;
    tui::run(&mut app).context("terminal error")?;
    tracing::info!(
        selected = app.selection.selection().len(),
        diagnostics = app.kernel.diagnostics().len(),
        "exit"
    );
    Ok(())
}
