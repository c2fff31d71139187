//! ADL command-line tool for parsing and checking ADL documents.
//!
//! Usage: adl [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   --check       Exit nonzero on any diagnostic, not just a short parse
//!   --events      Print the grammar event trace instead of resolving
//!   -q, --quiet   Suppress the per-file summary line
//!   -h, --help    Print help
//!   -V, --version Print version

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;

use log::debug;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    let mut check_only = false;
    let mut show_events = false;
    let mut quiet = false;
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("adl {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--check" => {
                check_only = true;
            }
            "--events" => {
                show_events = true;
            }
            "-q" | "--quiet" => {
                quiet = true;
            }
            "-" => {
                // Explicit stdin
                // input_path stays None, which means stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(2);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(2);
                }
                input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    // Directory mode: process every .adl file in it
    if let Some(path) = input_path {
        if Path::new(path).is_dir() {
            process_directory(path, check_only, show_events, quiet);
            return;
        }
    }

    let input = match read_input(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path.unwrap_or("stdin"), e);
            process::exit(2);
        }
    };

    let exit_code = process_input(&input, input_path, check_only, show_events, quiet);
    process::exit(exit_code);
}

fn read_input(input_path: Option<&str>) -> io::Result<String> {
    match input_path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn process_directory(dir_path: &str, check_only: bool, show_events: bool, quiet: bool) {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path, e);
            process::exit(2);
        }
    };

    let mut had_errors = false;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().map(|e| e == "adl").unwrap_or(false) {
            let path_str = path.to_string_lossy();
            let input = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading {}: {}", path_str, e);
                    had_errors = true;
                    continue;
                }
            };
            if process_input(&input, Some(&path_str), check_only, show_events, quiet) != 0 {
                had_errors = true;
            }
        }
    }
    process::exit(if had_errors { 1 } else { 0 });
}

fn process_input(
    input: &str,
    input_path: Option<&str>,
    check_only: bool,
    show_events: bool,
    quiet: bool,
) -> i32 {
    let label = input_path.unwrap_or("stdin");
    debug!("parsing {} ({} bytes)", label, input.len());

    if show_events {
        let (events, diagnostics) = libadl::trace_events(input);
        for event in &events {
            println!("{}", event);
        }
        for d in &diagnostics {
            eprintln!("{}: {}", label, d);
        }
        return if diagnostics.is_empty() { 0 } else { 1 };
    }

    let parse = libadl::parse(input);
    for d in &parse.diagnostics {
        eprintln!("{}: {}", label, d);
    }
    if !quiet {
        println!(
            "{}: {}, parsed {} of {} bytes",
            label,
            if parse.is_complete() { "Success" } else { "Failed" },
            parse.bytes_consumed,
            parse.input_len
        );
    }

    let ok = if check_only {
        parse.is_clean()
    } else {
        parse.is_complete()
    };
    if ok {
        0
    } else {
        1
    }
}

fn print_help() {
    println!(
        "adl - ADL command-line tool

USAGE:
    adl [OPTIONS] [FILE|DIR]

ARGS:
    [FILE|DIR]    Input file or directory (reads from stdin if not provided)
                  When a directory is given, processes all .adl files in it

OPTIONS:
    --check       Exit nonzero on any diagnostic, not just a short parse

    --events      Print the grammar event trace instead of resolving;
                  no object graph is built

    -q, --quiet   Suppress the per-file summary line

    -h, --help    Print help

    -V, --version Print version

EXAMPLES:
    # Parse a file, printing diagnostics and a summary
    adl model.adl

    # Strictly check every .adl file in a directory
    adl --check ./models/

    # Watch what the parser reports for an input
    echo 'TOP;' | adl --events

Set RUST_LOG=debug (or trace) to see the resolver's decisions."
    );
}
