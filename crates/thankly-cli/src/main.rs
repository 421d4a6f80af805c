use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

use commands::Env;

#[derive(Parser, Debug)]
#[command(name = "thankly")]
#[command(version, about = "Thankly - a daily appreciation journal", long_about = None)]
struct Cli {
    /// Keep config, data and logs under this directory
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Journal to open, as in a share link (`#alice-...`)
    #[arg(long, global = true)]
    fragment: Option<String>,

    /// Also print logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a new journal
    Signup {
        #[arg(long)]
        name: String,
        /// Create a registered account instead of a guest one
        #[arg(long)]
        registered: bool,
    },
    /// Continue a journal you already have
    Login { identifier: String },
    /// Forget the current session (journals stay on disk)
    Logout,
    /// Show whose journal is open and in which mode
    Open,
    /// List appreciations, newest first
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Only entries whose title or text contains this
        #[arg(long)]
        grep: Option<String>,
    },
    /// Write an appreciation
    Add {
        #[arg(long)]
        text: String,
        #[arg(long)]
        title: Option<String>,
        /// Day to file it under (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Change the title or text of an appreciation
    Edit {
        id: i64,
        #[arg(long)]
        text: Option<String>,
        /// An empty title removes it
        #[arg(long)]
        title: Option<String>,
    },
    /// Delete an appreciation
    Rm { id: i64 },
    /// Today's count, days written and tier limits
    Stats,
    /// Show or edit your profile
    Profile {
        #[arg(long)]
        nickname: Option<String>,
        /// Image file to use as profile picture
        #[arg(long, conflicts_with = "clear_avatar")]
        avatar: Option<PathBuf>,
        #[arg(long)]
        clear_avatar: bool,
    },
    /// Find other users by nickname
    Search { term: String },
    /// Print the link to your journal
    Share,
    /// Export every appreciation as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Journals stored on this machine
    Journals,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (paths, config) = commands::load_settings(cli.home.as_deref())
        .context("Failed to prepare thankly directories")?;
    let _guard = logging::init(paths.logs_dir(), &config.logging.level, cli.verbose)?;
    let env = Env::new(paths, config);
    let fragment = cli.fragment.as_deref();

    match cli.command {
        Commands::Signup { name, registered } => {
            commands::entry::signup(&env, fragment, &name, registered).await
        }
        Commands::Login { identifier } => commands::entry::login(&env, fragment, &identifier).await,
        Commands::Logout => commands::entry::logout(&env),
        Commands::Open => commands::journal::open(&env, fragment).await,
        Commands::List { date, grep } => {
            commands::journal::list(&env, fragment, date, grep.as_deref()).await
        }
        Commands::Add { text, title, date } => {
            commands::journal::add(&env, fragment, date, title.as_deref(), &text).await
        }
        Commands::Edit { id, text, title } => {
            commands::journal::edit(&env, fragment, id, title.as_deref(), text.as_deref()).await
        }
        Commands::Rm { id } => commands::journal::remove(&env, fragment, id).await,
        Commands::Stats => commands::journal::stats(&env, fragment).await,
        Commands::Export { out } => commands::journal::export(&env, fragment, out).await,
        Commands::Profile {
            nickname,
            avatar,
            clear_avatar,
        } => {
            commands::profile::profile(&env, fragment, nickname.as_deref(), avatar, clear_avatar)
                .await
        }
        Commands::Search { term } => commands::profile::search(&env, fragment, &term).await,
        Commands::Share => commands::profile::share(&env),
        Commands::Journals => commands::entry::journals(&env),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "thankly",
            "add",
            "--text",
            "tea",
            "--date",
            "2024-05-01",
            "--fragment",
            "#bob-1",
        ])
        .unwrap();
        assert_eq!(cli.fragment.as_deref(), Some("#bob-1"));
        match cli.command {
            Commands::Add { date, .. } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 1));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["thankly", "list", "--date", "yesterday"]).is_err());
    }

    #[test]
    fn test_avatar_and_clear_conflict() {
        assert!(
            Cli::try_parse_from(["thankly", "profile", "--avatar", "a.png", "--clear-avatar"])
                .is_err()
        );
    }
}
