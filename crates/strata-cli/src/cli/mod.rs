//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "strata",
    bin_name = "strata",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Layered project generation from composable features",
    long_about = "Strata turns a tree of layers, each naming a template and a set of \
                  features, into a generated project on disk.",
    after_help = "EXAMPLES:\n\
        \x20 strata presets rust-workspace --format toml > strata.toml\n\
        \x20 strata generate strata.toml -o ./shop\n\
        \x20 strata generate strata.toml --dry-run\n\
        \x20 strata completions bash > /usr/share/bash-completion/completions/strata",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a project from a layer manifest.
    #[command(
        visible_alias = "gen",
        about = "Generate a project from a layer manifest",
        after_help = "EXAMPLES:\n\
            \x20 strata generate                      # uses strata.toml or the configured manifest\n\
            \x20 strata generate shop.json -o ./shop\n\
            \x20 strata generate --dry-run"
    )]
    Generate(GenerateArgs),

    /// Show the presets of the registered templates.
    #[command(
        about = "Show template presets",
        after_help = "EXAMPLES:\n\
            \x20 strata presets\n\
            \x20 strata presets rust-workspace --format json\n\
            \x20 strata presets rust-workspace --name full --format toml"
    )]
    Presets(PresetsArgs),

    /// List registered templates and their features.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 strata list\n\
            \x20 strata list --format json"
    )]
    List(ListArgs),

    /// Initialise a Strata configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 strata init           # default location\n\
            \x20 strata init --local   # .strata.toml in the current directory"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 strata completions bash > ~/.local/share/bash-completion/completions/strata\n\
            \x20 strata completions zsh  > ~/.zfunc/_strata\n\
            \x20 strata completions fish > ~/.config/fish/completions/strata.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Strata configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 strata config get defaults.template\n\
            \x20 strata config list\n\
            \x20 strata config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `strata generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Layer manifest (`.toml` or `.json`).
    #[arg(value_name = "MANIFEST", help = "Layer manifest (.toml or .json)")]
    pub manifest: Option<PathBuf>,

    /// Directory the root layer is generated into.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: configured output_dir or '.')"
    )]
    pub output: Option<PathBuf>,

    /// Template for a root layer that names none.
    #[arg(
        short = 't',
        long = "template",
        value_name = "ID",
        help = "Template for a root layer without one"
    )]
    pub template: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation and generate immediately")]
    pub yes: bool,

    /// Generate into a non-empty directory.
    #[arg(long = "force", help = "Generate into a non-empty directory")]
    pub force: bool,

    /// Print the resolved features per layer without writing any files.
    #[arg(long = "dry-run", help = "Show what would be generated without writing")]
    pub dry_run: bool,
}

// ── presets ───────────────────────────────────────────────────────────────────

/// Arguments for `strata presets`.
#[derive(Debug, Args)]
pub struct PresetsArgs {
    /// Template id; all templates when omitted.
    #[arg(value_name = "TEMPLATE", help = "Template id (default: all)")]
    pub template: Option<String>,

    /// Only the preset with this name.
    #[arg(short = 'n', long = "name", value_name = "NAME", help = "Preset name")]
    pub name: Option<String>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: PresetFormat,
}

/// Output format for the `presets` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetFormat {
    /// Human-readable table.
    Table,
    /// JSON array of layers.
    Json,
    /// Layer manifests, ready to save and edit.
    Toml,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.strata.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `strata completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `strata config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.template`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from(["strata", "generate", "shop.toml", "-o", "out", "--dry-run"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.manifest, Some(PathBuf::from("shop.toml")));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert!(args.dry_run);
    }

    #[test]
    fn generate_alias() {
        let cli = Cli::parse_from(["strata", "gen"]);
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn presets_defaults_to_table() {
        let cli = Cli::parse_from(["strata", "presets", "app"]);
        let Commands::Presets(args) = cli.command else {
            panic!("expected Presets command");
        };
        assert_eq!(args.template.as_deref(), Some("app"));
        assert_eq!(args.format, PresetFormat::Table);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["strata", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
