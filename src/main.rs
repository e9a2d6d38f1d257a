use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use sporlcat::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// List categories, or create and delete them
    Categories(CategoriesOptions),

    /// File artists under a category
    Assign(AssignOptions),

    /// Take artists out of their category
    Unassign(UnassignOptions),

    /// List followed artists with their category
    Artists(ArtistsOptions),

    /// Convert legacy category playlists into the current format
    Migrate(ConfirmOptions),

    /// Delete every playlist sporlcat created, categories included
    Reset(ConfirmOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "List categories, or create and delete them")]
pub struct CategoriesOptions {
    /// Subcommands under `categories` (e.g., `create`)
    #[command(subcommand)]
    pub command: Option<CategoriesSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CategoriesSubcommand {
    /// Create a category and its playlist
    Create { name: String },

    /// Delete a category and its playlist
    Delete { name: String },
}

#[derive(Parser, Debug, Clone)]
pub struct AssignOptions {
    /// Category to file the artists under
    pub category: String,

    /// Spotify artist ids
    #[clap(required = true)]
    pub artist_ids: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct UnassignOptions {
    /// Spotify artist ids
    #[clap(required = true)]
    pub artist_ids: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistsOptions {
    /// Search for artists by name
    #[clap(long)]
    pub search: Option<String>,

    /// Only show artists without a category
    #[clap(long)]
    pub uncategorized: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfirmOptions {
    /// Skip the preview and do it
    #[clap(long)]
    pub yes: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Categories(opt) => match opt.command {
            Some(CategoriesSubcommand::Create { name }) => cli::create_category(name).await,
            Some(CategoriesSubcommand::Delete { name }) => cli::delete_category(name).await,
            None => cli::list_categories().await,
        },
        Command::Assign(opt) => cli::assign(opt.category, opt.artist_ids).await,
        Command::Unassign(opt) => cli::unassign(opt.artist_ids).await,
        Command::Artists(opt) => cli::list_artists(opt.search, opt.uncategorized).await,
        Command::Migrate(opt) => cli::migrate(opt.yes).await,
        Command::Reset(opt) => cli::reset(opt.yes).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
