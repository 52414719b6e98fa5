//! File and Log Statistics CLI (filestat) - Main binary entry point

use filestat::cli::args::{Command, FsArgs, LogArgs, parse_args};
use filestat::cli::output::renderer_for;
use filestat::models::ProgressSnapshot;
use filestat::services::format::format_size;
use filestat::{DirectoryOptions, LogFilterOptions, LogFormat, StrategyKind};
use std::process;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const EXIT_INVALID_INPUT: i32 = 2;
const EXIT_PARTIAL_FAILURE: i32 = 3;
const EXIT_FAILURE: i32 = 4;
const EXIT_CANCELLED: i32 = 130;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=debug filestat fs /path
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help();
            return;
        }
        "--version" | "-v" => {
            print_version();
            return;
        }
        _ => {}
    }

    let cli_args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(EXIT_INVALID_INPUT);
        }
    };

    let cancel_flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel_flag);
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        log::warn!("Could not install Ctrl-C handler: {e}");
    }

    let exit_code = match &cli_args.command {
        Command::Fs(fs_args) => handle_fs(fs_args, cancel_flag),
        Command::Log(log_args) => handle_log(log_args, cancel_flag),
    };

    process::exit(exit_code);
}

fn exit_code_for(err: &filestat::Error) -> i32 {
    match err {
        filestat::Error::InvalidInput(_) | filestat::Error::InvalidPattern { .. } => {
            EXIT_INVALID_INPUT
        }
        filestat::Error::Cancelled => EXIT_CANCELLED,
        filestat::Error::Io(_) => EXIT_FAILURE,
    }
}

fn handle_fs(args: &FsArgs, cancel_flag: Arc<AtomicBool>) -> i32 {
    let mut opts = DirectoryOptions {
        max_depth: args.max_depth,
        include_patterns: args.include.clone(),
        exclude_patterns: args.exclude.clone(),
        min_size_threshold: args.min_size,
        skip_hidden: !args.include_hidden,
        follow_symlinks: args.follow_symlinks,
        cancel_flag: Some(cancel_flag),
        ..DirectoryOptions::default()
    };

    if let Some(label) = args.strategy_override.as_deref() {
        match StrategyKind::from_str(label) {
            Ok(kind) => opts.strategy_override = Some(kind),
            Err(err) => {
                eprintln!("Error: {err}");
                return EXIT_INVALID_INPUT;
            }
        }
    }

    if !args.quiet {
        opts.progress_notifier = Some(Arc::new(|snapshot: &ProgressSnapshot| {
            #[allow(clippy::cast_precision_loss)]
            let elapsed_secs = snapshot.elapsed_ms as f64 / 1000.0;
            eprintln!(
                "[{elapsed_secs:6.1}s] {} files, {} directories, {} processed",
                snapshot.files_processed,
                snapshot.directories_processed,
                format_size(snapshot.bytes_processed),
            );
        }));

        eprintln!("Analyzing: {}", args.path);
    }

    let summary = match filestat::analyze_directory(&args.path, &opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    println!("{}", renderer_for(args.json).render_directory(&summary));

    if summary.errors.is_empty() {
        0
    } else {
        if !args.quiet {
            eprintln!(
                "Completed with {} warnings (unreadable entries were skipped)",
                summary.errors.len()
            );
        }
        EXIT_PARTIAL_FAILURE
    }
}

fn handle_log(args: &LogArgs, cancel_flag: Arc<AtomicBool>) -> i32 {
    let format = match LogFormat::from_str(&args.format) {
        Ok(f) => f,
        Err(err) => {
            eprintln!("Error: {err}. Use auto, common, combined or json");
            return EXIT_INVALID_INPUT;
        }
    };

    let opts = LogFilterOptions {
        status_codes: args.status_codes.clone(),
        pattern_regex: args.regex.clone(),
        error_only: args.errors_only,
        cancel_flag: Some(cancel_flag),
        ..LogFilterOptions::default()
    };

    let summary = match filestat::analyze_log_file(&args.path, format, &opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    println!("{}", renderer_for(args.json).render_log(&summary));
    0
}

fn print_help() {
    println!("File Statistics CLI (filestat) - Summarize directory trees and access logs");
    println!();
    println!("USAGE:");
    println!("    filestat fs <DIR> [OPTIONS]");
    println!("    filestat log <FILE> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    fs        Walk a directory tree and report size, type and age statistics");
    println!("    log       Parse a web server access log and report request statistics");
    println!();
    println!("GLOBAL OPTIONS:");
    println!("    -h, --help                 Show this help message");
    println!("    -v, --version              Show version information");
    println!();
    println!("FS OPTIONS:");
    println!("    --json                    Emit machine-readable output");
    println!("    --depth <N>               Limit traversal depth, -1 for unlimited (default)");
    println!("    --min-size <BYTES>        Ignore files smaller than BYTES");
    println!("    --include <GLOB>          Only count files matching GLOB (repeatable)");
    println!("    --exclude <GLOB>          Skip entries matching GLOB (repeatable)");
    println!("    --hidden                  Include hidden entries");
    println!("    --follow-symlinks         Follow symbolic links");
    println!("    --strategy <NAME>         Override strategy: posix|legacy (aliases: unix, std)");
    println!("    --quiet                   Suppress progress output");
    println!();
    println!("LOG OPTIONS:");
    println!("    --json                    Emit machine-readable output");
    println!("    --format <FMT>            auto (default), common, combined or json");
    println!("    --regex <PATTERN>         Count and keep lines matching PATTERN (case-insensitive)");
    println!("    --status <CODES>          Keep only these status codes, comma separated");
    println!("    --errors-only             Keep only responses with status >= 400");
    println!();
    println!("EXIT CODES:");
    println!("    0  success, 2  invalid input, 3  completed with warnings,");
    println!("    4  I/O failure, 130  cancelled");
    println!();
    println!("EXAMPLES:");
    println!("    filestat fs /home --depth 3 --exclude node_modules");
    println!("    filestat fs /data --include '*.log' --min-size 1024 --json");
    println!("    filestat log /var/log/nginx/access.log --errors-only");
    println!("    filestat log app.jsonl --format json --regex timeout --json");
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_DATE: &str = env!("GIT_DATE");
    const BUILD_TARGET: &str = env!("BUILD_TARGET");

    println!("filestat {VERSION}");
    println!("Commit: {GIT_HASH} ({GIT_DATE})");
    println!("Target: {BUILD_TARGET}");

    #[cfg(debug_assertions)]
    println!("Build: debug");
    #[cfg(not(debug_assertions))]
    println!("Build: release");
}
