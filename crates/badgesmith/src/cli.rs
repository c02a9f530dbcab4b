use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "badgesmith",
    about = "Keep README badge rows and project portfolio grids in sync",
    version
)]
pub struct Cli {
    /// JSON configuration file overriding the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rewrite the badge region of each file from its badge request
    Badges {
        /// Markdown or notebook files, or directories to search
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Badge catalog (JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Use the keys listed in this file, one per line, for every target
        #[arg(long)]
        keys_file: Option<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        check: bool,
    },

    /// Rewrite badges, then print the project records of a repository as JSON
    Scan {
        /// Repository as "owner/name"
        #[arg(long)]
        repo_name: String,

        /// Private repositories are not listed in the portfolio
        #[arg(long, value_parser = parse_flag, action = ArgAction::Set, default_value = "false")]
        is_private: bool,

        /// Files changed in the repository
        #[arg(long, num_args = 1.., required = true)]
        files: Vec<PathBuf>,

        /// Badge catalog (JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Branch used in generated links
        #[arg(long)]
        branch: Option<String>,
    },

    /// Compose the portfolio grid and inject it into a README
    Grid {
        /// README receiving the grid
        #[arg(default_value = "README.md")]
        readme: PathBuf,

        /// Project records, as printed by `scan`
        #[arg(long, default_value = "projects.json")]
        projects: PathBuf,

        #[arg(long, value_enum, default_value_t = GridFormat::Html)]
        format: GridFormat,

        /// Where card images are written, relative to the README
        #[arg(long)]
        image_dir: Option<PathBuf>,

        /// Headless browser used for PNG cards
        #[arg(long)]
        browser: Option<String>,

        /// Report what would change without writing
        #[arg(long)]
        check: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GridFormat {
    /// Inline HTML cards
    Html,
    /// One PNG per card, rendered with a headless browser
    Png,
}

/// Any casing of "true" is true, everything else false.
fn parse_flag(value: &str) -> Result<bool, String> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}
