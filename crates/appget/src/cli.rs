//! Command-line option parsing

use clap::{Parser, Subcommand};

/// Version embedded at build time
pub const VERSION: &str = env!("APPGET_VERSION");

#[derive(Parser, Debug)]
#[command(name = "appget")]
#[command(about = "appget - install and manage applications from the command line", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Install a package
    Install {
        /// Package id
        package: String,

        /// Install a specific version instead of the latest
        #[arg(long)]
        version: Option<String>,
    },

    /// Uninstall a package
    Uninstall {
        /// Package id
        package: String,
    },

    /// Show a package manifest
    View {
        /// Package id
        package: String,
    },

    /// Search the package repository
    Search {
        /// Search terms
        query: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Install { .. } => "install",
            Command::Uninstall { .. } => "uninstall",
            Command::View { .. } => "view",
            Command::Search { .. } => "search",
        }
    }
}

/// Parsed invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOptions {
    pub verbose: bool,
    pub command: Command,
}

/// Turns raw arguments into [`ParsedOptions`]
///
/// `None` means the parser declined to produce a result (help, version,
/// invalid syntax); it has already told the user why.
pub trait OptionParser: Send + Sync {
    fn parse(&self, args: &[String]) -> Option<ParsedOptions>;
}

#[derive(Debug, Default)]
pub struct ClapOptionParser;

impl ClapOptionParser {
    /// Parse without printing anything on failure
    pub fn try_parse(args: &[String]) -> Result<ParsedOptions, clap::Error> {
        let argv = std::iter::once("appget".to_string()).chain(args.iter().cloned());
        let cli = Cli::try_parse_from(argv)?;
        Ok(ParsedOptions {
            verbose: cli.verbose,
            command: cli.command,
        })
    }
}

impl OptionParser for ClapOptionParser {
    fn parse(&self, args: &[String]) -> Option<ParsedOptions> {
        match Self::try_parse(args) {
            Ok(options) => Some(options),
            Err(e) => {
                // Help and version go to stdout, usage errors to stderr
                let _ = e.print();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split(' ').map(String::from).collect()
    }

    #[test]
    fn test_parse_install() {
        let options = ClapOptionParser::try_parse(&args("install firefox --version 120.0")).unwrap();
        assert!(!options.verbose);
        assert_eq!(
            options.command,
            Command::Install {
                package: "firefox".to_string(),
                version: Some("120.0".to_string()),
            }
        );
        assert_eq!(options.command.name(), "install");
    }

    #[test]
    fn test_verbose_is_global() {
        let options = ClapOptionParser::try_parse(&args("view vlc -v")).unwrap();
        assert!(options.verbose);

        let options = ClapOptionParser::try_parse(&args("--verbose search player")).unwrap();
        assert!(options.verbose);

        // Two positional words are a usage error for search
        assert!(ClapOptionParser::try_parse(&args("search media player")).is_err());
    }

    #[test]
    fn test_no_result_cases() {
        assert!(ClapOptionParser::try_parse(&[]).is_err());
        assert!(ClapOptionParser::try_parse(&args("--help")).is_err());
        assert!(ClapOptionParser::try_parse(&args("--version")).is_err());
        assert!(ClapOptionParser::try_parse(&args("frobnicate")).is_err());
    }
}
