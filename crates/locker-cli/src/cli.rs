use clap::{Parser, Subcommand};

/// CLI surface for the encrypted store.
#[derive(Parser, Debug)]
#[command(
    name = "locker",
    about = "Authenticated encryption for locally stored values",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Encrypt a value and store it under a key. Non-JSON input is stored as a string.
    Put { key: String, value: String },
    /// Decrypt and print the value stored under a key.
    Get { key: String },
    /// Delete the entry for a key (no-op when absent).
    Remove { key: String },
    /// Round-trip a test value through the encrypted store.
    Health,
    /// Print a fresh base64-encoded 256-bit key.
    Keygen,
    /// Print version and exit.
    Version,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a config file with a freshly generated key if one does not exist.
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_put_subcommand() {
        let cli = Cli::try_parse_from(["locker", "put", "u", r#"{"id":1}"#])
            .expect("parse should succeed");
        assert_eq!(
            cli.command,
            Command::Put {
                key: "u".into(),
                value: r#"{"id":1}"#.into(),
            }
        );
    }

    #[test]
    fn parses_get_and_remove_subcommands() {
        let cli = Cli::try_parse_from(["locker", "get", "u"]).expect("parse should succeed");
        assert_eq!(cli.command, Command::Get { key: "u".into() });

        let cli = Cli::try_parse_from(["locker", "remove", "u"]).expect("parse should succeed");
        assert_eq!(cli.command, Command::Remove { key: "u".into() });
    }

    #[test]
    fn requires_a_subcommand() {
        assert!(Cli::try_parse_from(["locker"]).is_err());
    }

    #[test]
    fn parses_config_init_subcommand() {
        let cli =
            Cli::try_parse_from(["locker", "config", "init"]).expect("parse should succeed");
        assert_eq!(cli.command, Command::Config(ConfigCommand::Init));
    }
}
