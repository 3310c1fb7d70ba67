use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "duoslot",
    version,
    about = "Crash-safe chunked key-value cache over small-value storage"
)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the current value of a key
    Get(GetArgs),
    /// Write a value and wait for it to commit
    Set(SetArgs),
    /// Show the slot state of a key
    Inspect(InspectArgs),
    /// Print the duoslot version
    Version,
}

#[derive(clap::Args, Clone, Debug)]
pub struct StoreArgs {
    /// Storage directory (one file per storage key)
    #[arg(long, global = true, env = "DUOSLOT_DIR", default_value = ".duoslot")]
    pub dir: PathBuf,

    /// Chunk size in Unicode code points
    #[arg(long, global = true, env = "DUOSLOT_CHUNK_SIZE", default_value_t = duoslot_core::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Per-entry ceiling of the storage, in code points
    #[arg(long, global = true, env = "DUOSLOT_MAX_VALUE_LEN")]
    pub max_value_len: Option<usize>,
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GetArgs {
    pub key: String,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Clone, Debug)]
pub struct SetArgs {
    pub key: String,

    /// Value to store
    #[arg(conflicts_with = "file", required_unless_present = "file")]
    pub value: Option<String>,

    /// Read the value from a file instead
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(clap::Args, Clone, Debug)]
pub struct InspectArgs {
    pub key: String,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_with_global_flags() {
        let cli = Cli::try_parse_from([
            "duoslot",
            "set",
            "session",
            "value",
            "--dir",
            "/tmp/x",
            "--chunk-size",
            "16",
        ])
        .unwrap();
        assert_eq!(cli.store.dir, PathBuf::from("/tmp/x"));
        assert_eq!(cli.store.chunk_size, 16);
        match cli.cmd {
            Command::Set(args) => {
                assert_eq!(args.key, "session");
                assert_eq!(args.value.as_deref(), Some("value"));
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn test_set_requires_value_or_file() {
        assert!(Cli::try_parse_from(["duoslot", "set", "session"]).is_err());
        assert!(Cli::try_parse_from(["duoslot", "set", "session", "--file", "v.json"]).is_ok());
        assert!(
            Cli::try_parse_from(["duoslot", "set", "session", "v", "--file", "v.json"]).is_err()
        );
    }

    #[test]
    fn test_every_subcommand_has_help() {
        use clap::CommandFactory;

        let cmd = Cli::command();
        for sub in cmd.get_subcommands() {
            assert!(
                sub.get_about().is_some(),
                "subcommand {} has no description",
                sub.get_name()
            );
        }
    }

    #[test]
    fn test_get_json_format() {
        let cli = Cli::try_parse_from(["duoslot", "get", "k", "--format", "json"]).unwrap();
        match cli.cmd {
            Command::Get(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("expected get"),
        }
    }
}
