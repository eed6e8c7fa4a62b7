use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::{error::ErrorKind, Parser};

use driver::{run_source, Output};

// sysexits.h
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;

/// Scans and parses Lox expressions and prints their syntax tree.
#[derive(clap::Parser)]
#[command(name = "lox")]
struct Args {
    /// Script to read. Starts an interactive prompt when omitted.
    file: Option<PathBuf>,

    /// How to print each parsed unit: ast, rpn or tokens.
    #[arg(short, long, default_value_t = Output::Ast)]
    output: Output,
}

fn run_file(path: PathBuf, output: Output) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    match run_source(&source, output) {
        Ok(text) => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            eprintln!("{errors}");
            Ok(ExitCode::from(EX_DATAERR))
        }
    }
}

fn run_prompt(output: Output) -> anyhow::Result<ExitCode> {
    loop {
        print!("> ");
        stdout().flush()?;

        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            log::debug!("End of input, leaving prompt");
            return Ok(ExitCode::SUCCESS);
        }

        // Errors on one line never carry over to the next.
        match run_source(line.trim_end_matches(['\n', '\r']), output) {
            Ok(text) => println!("{text}"),
            Err(errors) => eprintln!("{errors}"),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            log::debug!("Invalid arguments: {e}");
            println!("Usage: lox [--output <ast|rpn|tokens>] [script]");
            return Ok(ExitCode::from(EX_USAGE));
        }
    };

    match args.file {
        Some(file) => run_file(file, args.output),
        None => run_prompt(args.output),
    }
}
