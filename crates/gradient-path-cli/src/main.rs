//! gradient-path - draw SVG paths as segmented gradients
//!
//! Usage:
//!   gradient-path render <svg> [options]   Replace a path with gradient segments
//!   gradient-path data <svg> [options]     Print sampled segments as JSON
//!   gradient-path example                  Print an example gradient file

mod cli;

use std::env;
use std::error::Error;

use env_logger::Env;

use cli::{cmd_data, cmd_example, cmd_render};

fn main() {
    // Logs go to stderr so piped SVG/JSON output stays clean
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("gradient-path");

    let result: Result<(), Box<dyn Error>> = match args.get(1).map(String::as_str) {
        Some("render") => cmd_render(&args[2..]),
        Some("data") => cmd_data(&args[2..]),
        Some("example") => {
            cmd_example();
            Ok(())
        }
        Some("help" | "--help" | "-h") => {
            print_usage(prog);
            Ok(())
        }
        Some(other) => Err(format!("Unknown command: {}", other).into()),
        None => {
            print_usage(prog);
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage(prog: &str) {
    eprintln!("gradient-path - draw SVG paths as segmented gradients");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} render <svg> [options]     Replace a path with gradient segments", prog);
    eprintln!("  {} data <svg> [options]       Print sampled segments as JSON", prog);
    eprintln!("  {} data -d <path-data>        Sample a bare path string", prog);
    eprintln!("  {} example                    Print an example gradient file", prog);
    eprintln!();
    eprintln!("Sampling options (render and data):");
    eprintln!("  -c, --config <file>    Gradient YAML file");
    eprintln!("  -s, --segments <n>     Number of segments (default: 10)");
    eprintln!("  -n, --samples <n>      Samples per segment (default: 5)");
    eprintln!("  -p, --precision <n>    Fractional digits kept (default: 2)");
    eprintln!("  --no-round             Keep full coordinate precision");
    eprintln!("  --id <id>              Source path id (default: first path)");
    eprintln!();
    eprintln!("Run `{} <command> --help` for command options.", prog);
    eprintln!();
    eprintln!("Stdin support:");
    eprintln!("  Use '-' as input file to read SVG from stdin:");
    eprintln!("  cat swoop.svg | {} render - -w 6 --fill '#f00,#00f' > out.svg", prog);
    eprintln!();
    eprintln!("Logging:");
    eprintln!("  RUST_LOG=debug {} data swoop.svg", prog);
}
