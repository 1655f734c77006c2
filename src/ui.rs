use console::style;

/// Format an error for the terminal, with the full cause chain
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {:#}", style("ERROR:").red().bold(), error)
}

/// Print an error message in red to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{}", format_error(error));
}
