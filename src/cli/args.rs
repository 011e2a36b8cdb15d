use clap::Parser;
use std::path::PathBuf;

/// pbjson: print a message instance as canonical protobuf JSON
#[derive(Parser, Debug)]
#[command(name = "pbjson", version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    pbjson message.json                  # Format a fixture document (stdout)
    pbjson message.json -o out.json      # Format to file
    cat message.json | pbjson            # Read the fixture from stdin
    pbjson message.json --emit-defaults  # Include fields holding default values

Set PBJSON_LOG=debug to trace formatting decisions on stderr.")]
pub struct Args {
    /// Fixture document path (omit or use "-" to read from stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output file path (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write fields that hold their default value
    #[arg(long, env = "PBJSON_EMIT_DEFAULTS")]
    pub emit_defaults: bool,
}

impl Args {
    /// Returns true if reading from stdin.
    #[must_use]
    pub fn is_stdin(&self) -> bool {
        self.input.is_none() || self.input.as_ref().is_some_and(|p| p.as_os_str() == "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_reads_stdin() {
        let args = Args::parse_from(["pbjson", "-"]);
        assert!(args.is_stdin());
        assert!(!args.emit_defaults);
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from(["pbjson", "in.json", "-o", "out.json", "--emit-defaults"]);
        assert!(!args.is_stdin());
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert!(args.emit_defaults);
    }
}
