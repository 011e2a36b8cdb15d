pub mod args;
pub mod fixture;

use crate::encode::JsonFormatter;
use crate::error::{FormatError, Result};
use crate::options::FormatOptions;
use crate::reflect::ReflectMessage;
use args::Args;
use clap::Parser;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Runs the CLI entrypoint.
///
/// # Errors
///
/// Returns an error if reading, fixture loading, formatting, or writing fails.
pub fn run() -> Result<()> {
    let args = Args::parse();
    run_with(&args)
}

/// Runs the CLI with already parsed arguments.
///
/// # Errors
///
/// Returns an error if reading, fixture loading, formatting, or writing fails.
pub fn run_with(args: &Args) -> Result<()> {
    let input = read_input(args)?;
    let message = fixture::load_message(&input)?;

    let options = FormatOptions::default().emit_default_values(args.emit_defaults);
    let formatter = JsonFormatter::new(Some(options));
    let json = formatter.format_optional(message.as_ref().map(|m| m as &dyn ReflectMessage))?;

    write_output(args, json.as_bytes())?;

    // Success message to stderr if writing to file
    if let Some(ref output_path) = args.output {
        let input_label = format_input_label(args);
        let output_label = output_path.display();
        eprintln!("Formatted `{input_label}` → `{output_label}`");
    }

    Ok(())
}

fn read_input(args: &Args) -> Result<String> {
    if args.is_stdin() {
        read_stdin()
    } else {
        let path = args
            .input
            .as_ref()
            .ok_or_else(|| FormatError::fixture("No input file specified"))?;
        read_file(path)
    }
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(FormatError::stdin_read)?;
    Ok(buffer)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| FormatError::file_read(path.to_path_buf(), e))
}

fn write_output(args: &Args, data: &[u8]) -> Result<()> {
    if let Some(ref path) = args.output {
        let mut file =
            File::create(path).map_err(|e| FormatError::file_create(path.clone(), e))?;
        file.write_all(data)
            .map_err(|e| FormatError::file_write(path.clone(), e))?;
        // Add trailing newline for file output
        file.write_all(b"\n")
            .map_err(|e| FormatError::file_write(path.clone(), e))?;
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(data).map_err(FormatError::stdout_write)?;
        handle.write_all(b"\n").map_err(FormatError::stdout_write)?;
    }
    Ok(())
}

fn format_input_label(args: &Args) -> String {
    if args.is_stdin() {
        "stdin".to_string()
    } else if let Some(ref path) = args.input {
        path.display().to_string()
    } else {
        "stdin".to_string()
    }
}
