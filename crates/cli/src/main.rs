//! Memory-mapped bus model CLI.
//!
//! This binary builds a bus system from a JSON configuration. It provides:
//! 1. **Map:** Print the composed memory map (absolute address, peripheral, register).
//! 2. **Run:** Execute the configuration's `script` of reads and writes through the controller.

use std::{fs, process};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mmbus_core::config::{Config, ConfigError};
use mmbus_core::soc::System;

/// Exit code when every script step succeeded.
const EXIT_OK: i32 = 0;
/// Exit code when a script step failed or mismatched.
const EXIT_FAILED: i32 = 1;
/// Exit code when the session could not be loaded or built.
const EXIT_SETUP: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "mmbus",
    author,
    version,
    about = "Memory-mapped peripheral bus model",
    long_about = "Compose register files into an address space and drive bus transactions.\n\nExamples:\n  mmbus map system.json\n  mmbus run system.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the composed memory map.
    Map {
        /// JSON system configuration.
        config: String,
    },

    /// Run the configuration's transaction script.
    Run {
        /// JSON system configuration with a `script` array.
        config: String,
    },
}

/// Configuration file: the system plus an optional transaction script.
#[derive(Deserialize, Debug)]
struct Session {
    #[serde(flatten)]
    config: Config,
    #[serde(default)]
    script: Vec<Step>,
}

/// One scripted bus transaction.
#[derive(Deserialize, Debug)]
#[serde(tag = "op", rename_all = "lowercase")]
enum Step {
    Write { address: u64, data: u64 },
    Read {
        address: u64,
        #[serde(default)]
        expect: Option<u64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Map { config } => with_session(&config, cmd_map),
        Commands::Run { config } => with_session(&config, cmd_run),
    };
    process::exit(code);
}

/// Loads a session file and hands the built system to `cmd`.
///
/// # Returns
///
/// The exit code of `cmd`, or `EXIT_SETUP` if the file cannot be read,
/// parsed or built.
fn with_session(path: &str, cmd: fn(System, &[Step]) -> i32) -> i32 {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            return EXIT_SETUP;
        }
    };
    match load_session(&text) {
        Ok((system, script)) => {
            info!(path, steps = script.len(), "session loaded");
            cmd(system, &script)
        }
        Err(e) => {
            eprintln!("Error in {path}: {e}");
            EXIT_SETUP
        }
    }
}

/// Parses and validates a session, then builds its system.
fn load_session(text: &str) -> Result<(System, Vec<Step>), ConfigError> {
    let session: Session = serde_json::from_str(text)?;
    session.config.validate()?;
    let system = System::new(&session.config)?;
    debug!(
        peripherals = system.handles().len(),
        "system built from session"
    );
    Ok((system, session.script))
}

/// Prints one line per mapped register, sorted by address.
fn cmd_map(system: System, _script: &[Step]) -> i32 {
    let space = system.address_space();
    let digits = space.address_width().div_ceil(4) as usize;

    println!(
        "{} peripherals, data {} bits, address {} bits, timeout {} ticks",
        space.len(),
        space.data_width(),
        space.address_width(),
        space.timeout()
    );
    for entry in space.memory_map() {
        println!(
            "  {:#0w$x}  {:<12} {:<16} {:>2} bits  {}",
            entry.address,
            entry.regfile,
            entry.register,
            entry.width,
            entry.mode,
            w = digits + 2
        );
    }
    EXIT_OK
}

/// Runs the script and reports the outcome as an exit code.
fn cmd_run(mut system: System, script: &[Step]) -> i32 {
    let failures = run_script(&mut system, script);
    let ticks = system.controller().ticks();
    println!(
        "\n[*] {} steps, {failures} failed, {ticks} ticks",
        script.len()
    );
    if failures > 0 { EXIT_FAILED } else { EXIT_OK }
}

/// Executes every step in order, printing one result line per step.
///
/// # Returns
///
/// The number of steps that failed or read an unexpected value.
fn run_script(system: &mut System, script: &[Step]) -> usize {
    let mut failures = 0;

    for (i, step) in script.iter().enumerate() {
        debug!(step = i, ?step, "running script step");
        match *step {
            Step::Write { address, data } => match system.write(address, data) {
                Ok(()) => println!("[{i:>3}] write {address:#06x} <- {data:#04x}  ok"),
                Err(e) => {
                    println!("[{i:>3}] write {address:#06x} <- {data:#04x}  FAILED: {e}");
                    failures += 1;
                }
            },
            Step::Read { address, expect } => match system.read(address) {
                Ok(value) if expect.is_some_and(|x| x != value) => {
                    println!(
                        "[{i:>3}] read  {address:#06x} -> {value:#04x}  MISMATCH (expected {:#04x})",
                        expect.unwrap_or_default()
                    );
                    failures += 1;
                }
                Ok(value) => println!("[{i:>3}] read  {address:#06x} -> {value:#04x}  ok"),
                Err(e) => {
                    println!("[{i:>3}] read  {address:#06x}  FAILED: {e}");
                    failures += 1;
                }
            },
        }
    }
    failures
}
