use anyhow::{Context, Result};
use bookfinder_app::AppState;
use bookfinder_config::{Config, ConfigManager};
use bookfinder_content_sources::OpenLibrarySource;
use bookfinder_storage::PersistentStore;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;

mod commands;

use commands::Session;

fn filter_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("title").long("title").value_name("TITLE").help("Filter by title"))
        .arg(Arg::new("author").long("author").value_name("AUTHOR").help("Filter by author"))
        .arg(Arg::new("subject").long("subject").value_name("SUBJECT").help("Filter by subject"))
        .arg(Arg::new("year").long("year").value_name("YEAR").help("Filter by first publish year"))
        .arg(Arg::new("isbn").long("isbn").value_name("ISBN").help("Filter by ISBN"))
}

fn index_arg() -> Arg {
    Arg::new("index")
        .required(true)
        .value_name("N")
        .help("Position in the list, starting at 1")
        .value_parser(clap::value_parser!(usize))
}

fn build_cli() -> Command {
    Command::new("bookfinder")
        .version(env!("CARGO_PKG_VERSION"))
        .author("DrTomLLC")
        .about("Search the Open Library catalog and keep track of favorite books")
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .global(true),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .help("Directory for favorites, history and preferences")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print books as JSON")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(filter_args(
            Command::new("search")
                .about("Search the catalog")
                .arg(Arg::new("query").value_name("QUERY").help("Free-text query"))
                .arg(
                    Arg::new("favorite")
                        .long("favorite")
                        .value_name("N")
                        .help("Toggle the Nth result as favorite")
                        .value_parser(clap::value_parser!(usize)),
                ),
        ))
        .subcommand(Command::new("trending").about("Show trending fiction"))
        .subcommand(
            Command::new("favorites")
                .about("Manage favorite books")
                .subcommand(Command::new("list").about("List favorites"))
                .subcommand(filter_args(
                    Command::new("add")
                        .about("Search and add one result to favorites")
                        .arg(Arg::new("query").value_name("QUERY").help("Free-text query"))
                        .arg(
                            Arg::new("pick")
                                .long("pick")
                                .value_name("N")
                                .help("Which result to add")
                                .default_value("1")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("remove")
                        .about("Remove a favorite")
                        .arg(Arg::new("key").required(true).value_name("KEY").help("Catalog key, e.g. /works/OL45804W")),
                ),
        )
        .subcommand(
            Command::new("history")
                .about("Show and manage recent searches")
                .subcommand(Command::new("list").about("List recent searches"))
                .subcommand(Command::new("remove").about("Forget one search").arg(index_arg()))
                .subcommand(Command::new("clear").about("Forget all searches"))
                .subcommand(Command::new("rerun").about("Run a recent search again").arg(index_arg())),
        )
        .subcommand(Command::new("quote").about("Show the quote of the day"))
        .subcommand(
            Command::new("theme").about("Show or change the theme").arg(
                Arg::new("mode")
                    .value_name("MODE")
                    .value_parser(["light", "dark", "toggle"]),
            ),
        )
        .subcommand(
            Command::new("profile")
                .about("Show or change the signed-in user")
                .subcommand(Command::new("show").about("Show the signed-in user"))
                .subcommand(
                    Command::new("sign-in")
                        .about("Sign in with an email address")
                        .arg(Arg::new("email").required(true).value_name("EMAIL"))
                        .arg(Arg::new("name").long("name").value_name("NAME").help("Display name")),
                )
                .subcommand(
                    Command::new("update")
                        .about("Change name and email")
                        .arg(Arg::new("name").long("name").required(true).value_name("NAME"))
                        .arg(Arg::new("email").long("email").required(true).value_name("EMAIL")),
                )
                .subcommand(Command::new("sign-out").about("Forget the signed-in user")),
        )
        .subcommand(
            Command::new("categories")
                .about("List categories, or browse one")
                .arg(Arg::new("key").value_name("CATEGORY").help("Category to browse")),
        )
        .subcommand(
            Command::new("config")
                .about("Show, check or create the configuration file")
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("init").about("Write a default config.toml"))
                .subcommand(Command::new("validate").about("List invalid settings in config.toml"))
                .subcommand(Command::new("reset").about("Overwrite config.toml with defaults")),
        )
}

fn config_manager(matches: &ArgMatches) -> Result<ConfigManager> {
    match matches.get_one::<String>("config-dir") {
        Some(dir) => Ok(ConfigManager::with_directory(dir)),
        None => ConfigManager::new().context("Failed to locate configuration directory"),
    }
}

fn open_session(matches: &ArgMatches, manager: &ConfigManager, config: Config) -> Result<Session> {
    let data_dir = match matches.get_one::<String>("data-dir") {
        Some(dir) => PathBuf::from(dir),
        None => manager
            .data_dir(&config)
            .context("Failed to locate data directory")?,
    };

    log::debug!("Using data directory {}", data_dir.display());
    let store = PersistentStore::open(&data_dir)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    let source = Arc::new(OpenLibrarySource::with_base_url(
        config.catalog.base_url.clone(),
        config.catalog.timeout_secs,
    ));

    let (app, notifications) = AppState::new(store, source, &config);
    Ok(Session {
        app,
        notifications,
        config,
        json: matches.get_flag("json"),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let manager = config_manager(&matches)?;
    let config = manager.load_with_env_overrides();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.to_string()),
    )
    .init();
    log::debug!("Loaded settings from {}", manager.config_path().display());

    if let Some(("config", sub_matches)) = matches.subcommand() {
        return commands::config(&manager, &config, sub_matches);
    }

    let mut session = open_session(&matches, &manager, config)?;

    match matches.subcommand() {
        Some(("search", sub_matches)) => commands::search(&mut session, sub_matches).await,
        Some(("trending", _)) => commands::trending(&mut session).await,
        Some(("favorites", sub_matches)) => commands::favorites(&mut session, sub_matches).await,
        Some(("history", sub_matches)) => commands::history(&mut session, sub_matches).await,
        Some(("quote", _)) => commands::quote(&session),
        Some(("theme", sub_matches)) => commands::theme(&mut session, sub_matches),
        Some(("profile", sub_matches)) => commands::profile(&mut session, sub_matches),
        Some(("categories", sub_matches)) => commands::categories(&mut session, sub_matches).await,
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_search_accepts_filters_without_query() {
        let matches = build_cli()
            .try_get_matches_from(["bookfinder", "search", "--subject", "fantasy"])
            .unwrap();
        let (_, search) = matches.subcommand().unwrap();
        assert!(search.get_one::<String>("query").is_none());
        assert_eq!(search.get_one::<String>("subject").unwrap(), "fantasy");
    }

    #[test]
    fn test_history_index_must_be_numeric() {
        assert!(build_cli()
            .try_get_matches_from(["bookfinder", "history", "remove", "first"])
            .is_err());
    }

    #[test]
    fn test_theme_mode_is_restricted() {
        assert!(build_cli()
            .try_get_matches_from(["bookfinder", "theme", "sepia"])
            .is_err());
    }
}
