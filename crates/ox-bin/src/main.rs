//! Oxidized entrypoint: a thin demo binary exercising the core end to end.
//!
//! Loads a file into a buffer (or a small built-in welcome buffer when no
//! path is given), tokenises it with the Mode its extension resolves to,
//! prints the resulting token stream, and optionally runs a search over
//! the loaded contents. Stands in for the teacher's terminal UI without
//! reimplementing the render loop or key dispatch that drive it, both out
//! of scope here.

use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use core_model::Editor;
use core_search::search_forward;

const WELCOME_TEXT: &[u8] = b"-- oxidized --\nopen a file to see its token stream.\n";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "oxidized", version, about = "Oxidized editor core demo")]
struct Args {
    /// Optional path to open at startup. A built-in welcome buffer is used
    /// if omitted.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Run a forward search for this text after loading and print the
    /// first match's position.
    #[arg(long = "search")]
    pub search: Option<String>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("oxidized.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "oxidized.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn load_bytes(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(p) => Ok(std::fs::read(p)?),
        None => Ok(WELCOME_TEXT.to_vec()),
    }
}

fn print_token_stream(handle: &core_model::BufferHandle, tokenizer: &dyn core_syntax::Tokenizer) {
    let mut cache = handle.token_cache();
    let mut position = 0u64;
    let len = handle.buffer().contents.len();
    let mut count = 0usize;
    while position < len {
        let Some(token) = cache.get_token_after_position(&handle.buffer(), tokenizer, position) else {
            break;
        };
        let text = handle.buffer().contents.slice(token.start, token.end);
        println!("{:>6}..{:<6} {:?} {:?}", token.start, token.end, token.kind, text.as_str());
        count += 1;
        if token.end <= position {
            break;
        }
        position = token.end;
    }
    info!(target: "demo.tokenize", tokens = count, "tokenize_complete");
}

fn run_search(handle: &core_model::BufferHandle, query: &str) {
    let buffer = handle.buffer();
    let mut it = buffer.contents.start();
    if search_forward(&mut it, query.as_bytes()) {
        println!("found {:?} at byte {}", query, it.position);
        info!(target: "demo.search", query, position = it.position, "search_hit");
    } else {
        println!("{:?} not found", query);
        info!(target: "demo.search", query, "search_miss");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();

    let config = core_config::load_from(args.config.clone())?;
    let bytes = load_bytes(args.path.as_ref())?;
    let name = args
        .path
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "*welcome*".to_string());
    let mode = match &args.path {
        Some(p) => config.mode_for_path(p),
        None => core_state::Mode::plaintext(),
    };

    info!(
        target: "runtime.startup",
        buffer = name.as_str(),
        bytes = bytes.len(),
        tokenizer = ?mode.tokenizer,
        "bootstrap_complete"
    );

    let mut editor = Editor::new();
    let window_id = editor.open(name, &bytes, mode.clone());
    let handle = editor.window(window_id).expect("just opened").buffer().expect("buffer is live");

    let tokenizer = core_syntax::tokenizer_for(mode.tokenizer);
    print_token_stream(&handle, tokenizer);

    if let Some(query) = &args.search {
        run_search(&handle, query);
    }

    Ok(())
}
