//! Spotify Artist Categories CLI Library
//!
//! sporlcat files the artists you follow on Spotify into categories of your
//! choosing. Spotify offers no place to keep such a mapping, so it is stored
//! in the descriptions of a few private playlists in your own library.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error type shared by every layer
//! - `management` - OAuth token persistence and refresh
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client: transport, pagination, playlists, artists
//! - `store` - The playlist-backed category store, legacy migration and reset
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```
//! use sporlcat::{config::Settings, spotify::SpotifyClient, store::{CategoryStore, ChunkedStore}};
//!
//! #[tokio::main]
//! async fn main() -> sporlcat::Result<()> {
//!     let settings = Settings::from_env()?;
//!     let client = SpotifyClient::connect(&settings, "access-token")?;
//!     let owner = client.current_user().await?.id;
//!     let categories = ChunkedStore::new(client).load(&owner).await?;
//!     println!("{:?}", categories);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod store;
pub mod types;

pub use error::{Error, Result};

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Loading categories...");
/// info!("Found {} legacy playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// success!("Saved {} categories", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors: the process terminates with exit code 1 right after
/// printing.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Category playlist is missing, recreating it");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
