use clap::{Parser, Subcommand};

/// Package version; untagged or dirty builds append `+<short hash> (<commit date>)`.
fn version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION: OnceLock<String> = OnceLock::new();

    VERSION.get_or_init(|| {
        let hash = env!("GIT_HASH");
        if env!("IS_RELEASE") == "true" || hash.is_empty() {
            env!("CARGO_PKG_VERSION").to_string()
        } else {
            format!(
                "{}+{} ({})",
                env!("CARGO_PKG_VERSION"),
                hash,
                env!("GIT_COMMIT_DATE")
            )
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "logbook", bin_name = "logbook", version = version())]
#[command(about = "Journal store with versioned documents and full-text search", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Registered backend to use (entries, documents)
    #[arg(short, long, global = true)]
    pub backend: Option<String>,

    /// Database file, or :memory:
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every record, newest first
    #[command(alias = "ls")]
    List,

    /// Create an entry
    #[command(alias = "n")]
    Create {
        text: String,

        #[arg(short, long, default_value_t = 0)]
        color: i64,
    },

    /// Replace the text and color of an entry
    Update {
        id: i64,

        text: String,

        #[arg(short, long, default_value_t = 0)]
        color: i64,
    },

    /// Delete an entry
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// Search by word prefix
    #[command(alias = "s")]
    Search { query: String },

    /// Work with documents directly
    #[command(subcommand)]
    Doc(DocCommands),

    /// Show or set configuration
    Config {
        /// Key to show or set (backend, database)
        key: Option<String>,

        /// New value
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocCommands {
    /// Create a document, or revise it if the identifier exists
    Save {
        text: String,

        /// Identifier to save under; a random one is minted when omitted
        #[arg(long)]
        id: Option<String>,

        /// Content type, e.g. post or note
        #[arg(short = 't', long = "type")]
        content_type: Option<String>,

        /// Tag, may be repeated
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(short, long, default_value_t = 0)]
        color: i64,
    },

    /// Print one document with its history
    Get { identifier: String },

    /// Delete a document and its history
    #[command(alias = "rm")]
    Delete { identifier: String },

    /// List documents, optionally filtered
    #[command(alias = "ls")]
    List {
        #[arg(short = 't', long = "type", conflicts_with = "tag")]
        content_type: Option<String>,

        #[arg(long)]
        tag: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn version_starts_with_package_version() {
        assert!(version().starts_with(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn parses_update_with_globals() {
        let cli = Cli::parse_from(["logbook", "update", "3", "hello", "--color", "2", "--db", ":memory:"]);
        assert_eq!(cli.db.as_deref(), Some(":memory:"));
        match cli.command {
            Some(Commands::Update { id, text, color }) => {
                assert_eq!(id, 3);
                assert_eq!(text, "hello");
                assert_eq!(color, 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_doc_save_tags() {
        let cli = Cli::parse_from([
            "logbook", "doc", "save", "body", "--id", "a", "--type", "post", "--tag", "x", "--tag",
            "y",
        ]);
        match cli.command {
            Some(Commands::Doc(DocCommands::Save {
                id,
                content_type,
                tags,
                ..
            })) => {
                assert_eq!(id.as_deref(), Some("a"));
                assert_eq!(content_type.as_deref(), Some("post"));
                assert_eq!(tags, vec!["x", "y"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn doc_list_filters_are_exclusive() {
        let result = Cli::try_parse_from(["logbook", "doc", "list", "--type", "post", "--tag", "x"]);
        assert!(result.is_err());
    }
}
