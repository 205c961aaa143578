use clap::{Parser, Subcommand};

/// Command line interface for the application
#[derive(Parser)]
#[command(name = "alfapilot", version, about = "AI business assistant")]
pub struct Cli {
    /// Optional YAML configuration file; environment variables override it
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Sets the logging verbosity level for the application
    /// Possible values: "error", "warn", "info", "debug", "trace"
    /// Default: "info"
    #[arg(long, global = true, default_value_t = String::from("info"))]
    pub logging_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the HTTP API
    Serve {
        /// Port to listen on; overrides API_PORT and the config file
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Chat with the assistant in the terminal
    Chat {
        /// Conversation owner; history is stored under this id
        #[arg(short, long, default_value_t = 1)]
        user_id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_command() {
        let cli = Cli::try_parse_from(["alfapilot", "chat", "--user-id", "42"]).unwrap();
        assert!(matches!(cli.command, Command::Chat { user_id: 42 }));
        assert_eq!(cli.logging_level, "info");
    }

    #[test]
    fn test_parse_serve_with_global_flags() {
        let cli = Cli::try_parse_from([
            "alfapilot",
            "serve",
            "--port",
            "9000",
            "--logging-level",
            "debug",
            "--config",
            "alfapilot.yaml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Serve { port: Some(9000) }));
        assert_eq!(cli.logging_level, "debug");
        assert_eq!(cli.config.as_deref(), Some("alfapilot.yaml"));
    }
}
