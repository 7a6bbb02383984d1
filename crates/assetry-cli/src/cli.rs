//! Command-line surface of the `assetry` binary.

use assetry_console::Filter;
use assetry_core::{EntityKind, Facet, Transition};
use clap::{Parser, Subcommand, ValueEnum};

/// Assetry: IT asset management console
#[derive(Parser, Debug)]
#[command(name = "assetry")]
#[command(author, version, about = "IT asset management console", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ASSETRY_CONFIG", global = true)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List the console sections
    Sections,

    /// List records of one kind
    List {
        /// Entity kind (assets, licenses, people, alerts, ...)
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print the matching records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one record as JSON
    Show {
        /// Entity kind
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
        /// Record id
        id: String,
    },

    /// Create a record from UI-shaped JSON fields
    Create {
        /// Entity kind
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
        /// Fields, e.g. '{"name": "Laptop-01", "tag": "A-1001"}'
        #[arg(long)]
        json: String,
    },

    /// Change fields of a record
    Update {
        /// Entity kind
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
        /// Record id
        id: String,
        /// Field assignment, e.g. `purchaseCost=1200` (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Delete a record
    Delete {
        /// Entity kind
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
        /// Record id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Acknowledge, resolve or dismiss alerts
    Alert {
        /// What to do
        action: TriageAction,
        /// Alert ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Acknowledge, resolve or dismiss policy violations
    Violation {
        /// What to do
        action: TriageAction,
        /// Violation ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Headline numbers
    Dashboard,

    /// Estate value breakdown
    Financial,

    /// Distribution and utilisation figures
    Analytics,

    /// Compliance posture
    Compliance,

    /// Resolve a predefined kit's contents
    Kit {
        /// Kit id
        id: String,
    },

    /// Mark an integration as synced now
    Sync {
        /// Integration id
        id: String,
    },

    /// Saved report operations
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// Import run bookkeeping
    Import {
        #[command(subcommand)]
        action: ImportAction,
    },

    /// Operator profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Keep compliance and integration data fresh and print a status line
    /// periodically until interrupted
    Watch {
        /// Seconds between status lines
        #[arg(long, default_value_t = 30)]
        every: u64,
        /// Stop after this many status lines
        #[arg(long)]
        count: Option<u64>,
    },

    /// Configuration file operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl Command {
    /// Returns `true` when the command needs a loaded console.
    pub fn needs_console(&self) -> bool {
        !matches!(self, Command::Sections | Command::Config { .. })
    }
}

/// Facet and search options shared by list views.
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    /// Case-insensitive free-text search
    #[arg(short, long)]
    pub search: Option<String>,
    /// Exact status
    #[arg(long)]
    pub status: Option<String>,
    /// Exact category
    #[arg(long)]
    pub category: Option<String>,
    /// Exact type
    #[arg(long = "type")]
    pub kind_type: Option<String>,
    /// Exact priority
    #[arg(long)]
    pub priority: Option<String>,
    /// Exact severity
    #[arg(long)]
    pub severity: Option<String>,
    /// Exact department
    #[arg(long)]
    pub department: Option<String>,
}

impl FilterArgs {
    /// The list filter these options describe.
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(term) = &self.search {
            filter.set_search(term.as_str());
        }
        let facets = [
            (Facet::Status, &self.status),
            (Facet::Category, &self.category),
            (Facet::Type, &self.kind_type),
            (Facet::Priority, &self.priority),
            (Facet::Severity, &self.severity),
            (Facet::Department, &self.department),
        ];
        for (facet, value) in facets {
            if let Some(value) = value {
                filter.set_facet(facet, value.as_str());
            }
        }
        filter
    }
}

/// Triage verbs.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageAction {
    /// Take ownership
    Acknowledge,
    /// Mark fixed
    Resolve,
    /// Close without a fix
    Dismiss,
}

impl From<TriageAction> for Transition {
    fn from(action: TriageAction) -> Self {
        match action {
            TriageAction::Acknowledge => Transition::Acknowledge,
            TriageAction::Resolve => Transition::Resolve,
            TriageAction::Dismiss => Transition::Dismiss,
        }
    }
}

/// `report` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ReportAction {
    /// Stamp a report as run now
    Run {
        /// Report id
        id: String,
    },
}

/// `import` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ImportAction {
    /// Record the start of an import
    Begin {
        /// Source file name
        file: String,
        /// What is being imported (Assets, Licenses, ...)
        #[arg(long = "type", default_value = "Assets")]
        import_type: String,
    },
    /// Record the outcome of an import
    Finish {
        /// Import record id
        id: String,
        /// Rows written
        #[arg(long)]
        processed: i64,
        /// Rows seen
        #[arg(long)]
        total: i64,
        /// Per-row error message (repeatable)
        #[arg(long = "error")]
        errors: Vec<String>,
    },
}

/// `profile` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ProfileAction {
    /// Print the profile as JSON
    Show,
    /// Change profile fields, e.g. `preferences.theme=dark`
    Set {
        /// Field assignments
        #[arg(value_name = "FIELD=VALUE", required = true)]
        assignments: Vec<String>,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,
    /// Print one value by dotted key
    Get {
        /// Dotted key, e.g. `remote.url`
        key: String,
    },
    /// Set one value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Write a default config file
    Init {
        /// Where to write it (defaults to the resolved path)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_kind(s: &str) -> Result<EntityKind, String> {
    s.parse::<EntityKind>().map_err(|e| e.to_string())
}
