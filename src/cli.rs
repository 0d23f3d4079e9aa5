use clap::Parser;

/// spoon - start a child process via the native spawn facility
///
/// Launches the given command with posix_spawn on Unix-like systems or
/// CreateProcess on Windows, printing the child's process id. Lifecycle
/// control stays with the caller unless --wait is given.
#[derive(Parser, Debug)]
#[command(
    name = "spoon",
    version = "0.1.0",
    about = "Start a child process via the native spawn facility",
    long_about = "Launches a command through the native process-creation facility \
                  (posix_spawn on Unix-like systems, CreateProcess on Windows) and \
                  prints the child's process id. With --wait, blocks until the child \
                  exits and propagates its exit code."
)]
pub struct Cli {
    /// Resolve the command via the executable search path
    #[arg(short = 'P', long = "path-search")]
    pub path_search: bool,

    /// Wait for the child to exit and propagate its exit code
    #[arg(short = 'w', long = "wait")]
    pub wait: bool,

    /// Be verbose about what you're doing
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Command and its arguments to execute
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Validate the parsed arguments
    pub fn validate(&self) -> Result<(), crate::error::SpawnError> {
        if self.command.is_empty() {
            return Err(crate::error::SpawnError::InvalidArguments(
                "No command specified".to_string(),
            ));
        }
        Ok(())
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_before_the_command() {
        let cli = Cli::try_parse_from(["spoon", "-w", "-P", "ssh", "example.com"]).unwrap();
        assert!(cli.wait);
        assert!(cli.path_search);
        assert_eq!(cli.command, vec!["ssh", "example.com"]);
    }

    #[test]
    fn hyphen_values_after_the_command_belong_to_the_child() {
        let cli = Cli::try_parse_from(["spoon", "ls", "-l", "/tmp"]).unwrap();
        assert!(!cli.wait);
        assert_eq!(cli.command, vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn a_command_is_required() {
        assert!(Cli::try_parse_from(["spoon", "-w"]).is_err());
    }
}
