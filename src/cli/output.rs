use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};

/// Argument value that selects stdout
pub const STDOUT_ARG: &str = "-";

/// Where the generated version line goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    /// Appended to, created if missing
    File(PathBuf),
}

impl OutputTarget {
    /// Interpret the positional output argument
    ///
    /// `None` and `-` mean stdout. `$NAME` reads the file path from the
    /// environment variable `NAME` (e.g. `$GITHUB_OUTPUT`). Anything else
    /// is a file path.
    pub fn resolve(arg: Option<&str>) -> Result<Self> {
        let Some(arg) = arg else {
            return Ok(OutputTarget::Stdout);
        };

        if arg == STDOUT_ARG {
            return Ok(OutputTarget::Stdout);
        }

        if let Some(var) = arg.strip_prefix('$') {
            return match std::env::var(var) {
                Ok(path) if !path.is_empty() => Ok(OutputTarget::File(PathBuf::from(path))),
                _ => bail!("environment variable '{}' does not name an output file", var),
            };
        }

        Ok(OutputTarget::File(PathBuf::from(arg)))
    }

    /// Write `line` followed by a newline
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        match self {
            OutputTarget::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", line)?;
                stdout.flush()
            }
            OutputTarget::File(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{}", line)
            }
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Stdout => write!(f, "stdout"),
            OutputTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}
