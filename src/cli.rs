//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// kudoctl - run framework commands inside KUDO-managed pods.
#[derive(Parser, Debug, Clone)]
#[command(name = "kudoctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log output format.
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Use operator commands.
    ///
    /// The operator command runs the command declared in the framework
    /// version of the named workload inside one of its running pods.
    Operator(OperatorArgs),
}

#[derive(Args, Debug, Clone)]
pub struct OperatorArgs {
    /// The framework for which we want to execute the command.
    pub name: String,

    /// The file path to kubernetes configuration file; defaults to $HOME/.kube/config.
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// The namespace where the operator watches for changes.
    ///
    /// Falls back to KUDOCTL_NAMESPACE, then to "default".
    #[arg(short, long, value_name = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Kubeconfig context to use instead of the current one.
    #[arg(long)]
    pub context: Option<String>,

    /// Request separate stdout/stderr streams instead of a terminal.
    #[arg(long)]
    pub no_tty: bool,

    /// Give up on the exec stream after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Label key used to select pods; defaults to the framework name.
    #[arg(long, value_name = "KEY")]
    pub selector_label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_operator() {
        let cli = Cli::parse_from(["kudoctl", "operator", "zk"]);
        let Commands::Operator(args) = cli.command;
        assert_eq!(args.name, "zk");
        assert!(args.kubeconfig.is_none());
        assert!(args.namespace.is_none());
        assert!(!args.no_tty);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn cli_parses_operator_flags() {
        let cli = Cli::parse_from([
            "kudoctl",
            "operator",
            "--kubeconfig",
            "/tmp/config",
            "-n",
            "kudo",
            "--no-tty",
            "--timeout",
            "30",
            "kafka",
            "--log-format",
            "json",
        ]);
        let Commands::Operator(args) = cli.command;
        assert_eq!(args.name, "kafka");
        assert_eq!(args.kubeconfig, Some(PathBuf::from("/tmp/config")));
        assert_eq!(args.namespace.as_deref(), Some("kudo"));
        assert!(args.no_tty);
        assert_eq!(args.timeout, Some(30));
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn cli_namespace_help_names_fallbacks() {
        use clap::CommandFactory;

        let mut cmd = Cli::command();
        let operator = cmd.find_subcommand_mut("operator").unwrap();
        let help = operator.render_long_help().to_string();
        assert!(help.contains("KUDOCTL_NAMESPACE"));
        assert!(help.contains("\"default\""));
    }

    #[test]
    fn cli_requires_name() {
        assert!(Cli::try_parse_from(["kudoctl", "operator"]).is_err());
    }
}
