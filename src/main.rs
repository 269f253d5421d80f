use std::fs;
use std::io::{stdin, stdout};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::OnceLock;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use autumn::object::Object;

/// Autumn is a small, dynamically-typed expression language with first-class
/// functions. Run a script file, or start the interactive REPL with no
/// arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script file to execute instead of starting the REPL.
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match args.script {
        Some(path) => run_script(&path),
        None => match autumn::repl::start(stdin(), stdout()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_script(path: &Path) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("failed to read {}: {}", path.display(), err);
            return ExitCode::FAILURE;
        }
    };

    match autumn::interpret(&source) {
        Ok(Object::Null) => ExitCode::SUCCESS,
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

/// Installs the global subscriber once. The filter comes from `RUST_LOG` and
/// defaults to `warn`; diagnostics go to stderr so they never mix with
/// program output.
fn init_tracing() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
