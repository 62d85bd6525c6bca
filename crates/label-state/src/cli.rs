use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "label-state",
    version,
    about = "Key-value state stored in issue and pull request labels"
)]
pub struct Cli {
    /// Operation to perform: set, get, get-all, remove
    #[arg(long, env = "INPUT_OPERATION")]
    pub operation: Option<String>,

    /// Issue or pull request number
    #[arg(long, env = "INPUT_ISSUE_NUMBER")]
    pub issue_number: Option<String>,

    /// Repository in owner/repo format (defaults to GITHUB_REPOSITORY)
    #[arg(long, env = "INPUT_REPOSITORY")]
    pub repository: Option<String>,

    /// State key (required for set, get and remove)
    #[arg(long, short = 'k', env = "INPUT_KEY")]
    pub key: Option<String>,

    /// State value (required for set)
    #[arg(long, env = "INPUT_VALUE")]
    pub value: Option<String>,

    /// Label prefix (overrides config file, default "state")
    #[arg(long, env = "INPUT_PREFIX")]
    pub prefix: Option<String>,

    /// Separator between prefix, key and value (overrides config file, default "::")
    #[arg(long, env = "INPUT_SEPARATOR")]
    pub separator: Option<String>,

    /// GitHub token (overrides config file and GITHUB_TOKEN)
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API base URL (overrides config file and GITHUB_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long, env = "LABEL_STATE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Enable debug logging
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_minimal_invocation() {
        let cli = Cli::try_parse_from([
            "label-state",
            "--operation",
            "get",
            "--issue-number",
            "12",
            "--repository",
            "owner/repo",
            "-k",
            "step",
        ])
        .unwrap();

        assert_eq!(cli.operation.as_deref(), Some("get"));
        assert_eq!(cli.issue_number.as_deref(), Some("12"));
        assert_eq!(cli.key.as_deref(), Some("step"));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.prefix.is_none());
    }

    #[test]
    fn test_missing_inputs_are_left_to_validation() {
        let cli = Cli::try_parse_from(["label-state", "--operation", "get-all"]).unwrap();
        assert!(cli.issue_number.is_none());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from([
            "label-state",
            "--operation",
            "get-all",
            "--issue-number",
            "1",
            "-v",
            "-q",
        ]);
        assert!(result.is_err());
    }
}
