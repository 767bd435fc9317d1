use anyhow::{anyhow, bail, Context, Result};
use bookfinder_app::{AppState, CarouselState, NotificationKind, NotificationReceiver, CATEGORIES};
use bookfinder_config::{Config, ConfigManager};
use bookfinder_core::{format_age, AppError, Book, CoverSize, SearchFilters, Timestamp};
use bookfinder_library::{Theme, ToggleOutcome};
use clap::ArgMatches;
use console::style;
use tokio::task::JoinHandle;

/// Everything a command needs: app state plus output settings
pub struct Session {
    pub app: AppState,
    pub notifications: NotificationReceiver,
    pub config: Config,
    pub json: bool,
}

impl Session {
    /// Prints notifications queued so far
    fn flush_notifications(&mut self) {
        while let Ok(notification) = self.notifications.try_recv() {
            let marker = match notification.kind {
                NotificationKind::Info => style("ℹ").cyan().bold(),
                NotificationKind::Destructive => style("✗").red().bold(),
            };
            println!(
                "{} {}: {}",
                marker,
                style(&notification.title).bold(),
                notification.description
            );
        }
    }

    /// Waits for a dispatched search, or explains why none was sent
    async fn finish(&mut self, handle: Option<JoinHandle<()>>) -> Result<bool> {
        let Some(handle) = handle else {
            let reason = AppError::InvalidQuery {
                reason: "empty query and filters".to_string(),
            };
            println!("{}", reason.user_message());
            return Ok(false);
        };

        handle.await.context("Search task failed")?;
        self.flush_notifications();
        Ok(true)
    }
}

/// Search the catalog
pub async fn search(session: &mut Session, matches: &ArgMatches) -> Result<()> {
    let query = query_arg(matches);
    let filters = filters_from(matches);

    let handle = session.app.search(&query, filters);
    if !session.finish(handle).await? {
        return Ok(());
    }

    let results = session.app.results();
    print_books(session, "Search Results", &results)?;

    if let Some(position) = matches.get_one::<usize>("favorite") {
        let book = pick(&results, *position)?;
        session.app.toggle_favorite(book.clone());
        session.flush_notifications();
    }

    Ok(())
}

/// Show trending fiction
pub async fn trending(session: &mut Session) -> Result<()> {
    let handle = session.app.bootstrap();
    session.finish(handle).await?;

    let books = session.app.trending();
    if books.is_empty() {
        println!("Trending books are unavailable right now.");
        return Ok(());
    }
    print_books(session, "Trending Books", &books)
}

pub async fn favorites(session: &mut Session, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("add", sub_matches)) => {
            let handle = session.app.search(&query_arg(sub_matches), filters_from(sub_matches));
            if !session.finish(handle).await? {
                return Ok(());
            }

            let position = sub_matches.get_one::<usize>("pick").copied().unwrap_or(1);
            let results = session.app.results();
            let book = pick(&results, position)?;

            if session.app.is_favorite(&book.key) {
                println!("'{}' is already a favorite", book.title);
                return Ok(());
            }
            session.app.toggle_favorite(book.clone());
            session.flush_notifications();
            Ok(())
        }
        Some(("remove", sub_matches)) => {
            let key = sub_matches
                .get_one::<String>("key")
                .ok_or_else(|| anyhow!("Catalog key is required"))?;

            if !session.app.is_favorite(key) {
                bail!("No favorite with key {}", key);
            }
            match session.app.toggle_favorite_by_key(key) {
                Some(ToggleOutcome::Removed) => {
                    session.flush_notifications();
                    Ok(())
                }
                _ => bail!("Failed to remove {}", key),
            }
        }
        _ => {
            let favorites = session.app.favorites().to_vec();
            if favorites.is_empty() {
                println!("No favorites yet. Use 'search --favorite N' to add one.");
                return Ok(());
            }
            print_books(session, "Favorites", &favorites)
        }
    }
}

pub async fn history(session: &mut Session, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("remove", sub_matches)) => {
            let index = index_from(sub_matches)?;
            match session.app.remove_history(index) {
                Some(item) => println!("{} Removed '{}'", style("✓").green().bold(), item.query),
                None => println!("No recent search at position {}", index + 1),
            }
            Ok(())
        }
        Some(("clear", _)) => {
            session.app.clear_history();
            println!("{} Search history cleared", style("✓").green().bold());
            Ok(())
        }
        Some(("rerun", sub_matches)) => {
            let index = index_from(sub_matches)?;
            let handle = session
                .app
                .rerun_history(index)
                .ok_or_else(|| anyhow!("No recent search at position {}", index + 1))?;
            session.finish(Some(handle)).await?;
            let results = session.app.results();
            print_books(session, "Search Results", &results)
        }
        _ => {
            let items = session.app.history();
            if items.is_empty() {
                println!("No recent searches.");
                return Ok(());
            }

            let now = Timestamp::now();
            println!("\n{}", style("Recent Searches").bold().cyan());
            println!("{}", "=".repeat(80));
            for (position, item) in items.iter().enumerate() {
                println!(
                    "{:>2}. {}  {}",
                    position + 1,
                    style(&item.query).bold(),
                    style(format_age(now, item.timestamp)).dim()
                );
                let filters = describe_filters(&item.filters);
                if !filters.is_empty() {
                    println!("    {}", filters);
                }
            }
            Ok(())
        }
    }
}

pub fn quote(session: &Session) -> Result<()> {
    let record = session
        .app
        .quote_of_the_day()
        .ok_or_else(|| anyhow!("No quote available"))?;

    println!("\n{}", style("Quote of the Day").bold().cyan());
    println!("\"{}\"", style(&record.text).italic());
    println!("  - {}", record.author);
    Ok(())
}

pub fn theme(session: &mut Session, matches: &ArgMatches) -> Result<()> {
    let theme = match matches.get_one::<String>("mode").map(String::as_str) {
        Some("dark") => {
            session.app.set_theme(Theme::Dark);
            Theme::Dark
        }
        Some("light") => {
            session.app.set_theme(Theme::Light);
            Theme::Light
        }
        Some("toggle") => session.app.toggle_theme(),
        _ => session.app.theme(),
    };

    println!("Theme: {}", style(theme).bold());
    Ok(())
}

pub fn profile(session: &mut Session, matches: &ArgMatches) -> Result<()> {
    let outcome = match matches.subcommand() {
        Some(("sign-in", sub)) => {
            let email = sub.get_one::<String>("email").map(String::as_str).unwrap_or_default();
            let name = sub.get_one::<String>("name").map(String::as_str);
            session.app.sign_in(email, name).map(Some)
        }
        Some(("update", sub)) => {
            let name = sub.get_one::<String>("name").map(String::as_str).unwrap_or_default();
            let email = sub.get_one::<String>("email").map(String::as_str).unwrap_or_default();
            session.app.update_profile(name, email).map(Some)
        }
        Some(("sign-out", _)) => {
            session.app.sign_out();
            Ok(None)
        }
        _ => Ok(session.app.current_user()),
    };
    session.flush_notifications();

    match outcome {
        Ok(Some(user)) => println!("{} <{}>", style(&user.name).bold(), user.email),
        Ok(None) => println!("Not signed in"),
        Err(e) => bail!(e.user_message()),
    }
    Ok(())
}

pub async fn categories(session: &mut Session, matches: &ArgMatches) -> Result<()> {
    if let Some(key) = matches.get_one::<String>("key") {
        let handle = session
            .app
            .select_category(key)
            .ok_or_else(|| anyhow!("Unknown category '{}'", key))?;
        session.finish(Some(handle)).await?;

        let results = session.app.results();
        return print_books(session, "Category Results", &results);
    }

    println!("\n{}", style("Browse Categories").bold().cyan());
    println!("{}", "=".repeat(80));

    // One line per carousel page
    let per_view = session.config.carousel.items_per_view.max(1);
    let mut carousel = CarouselState::new(CATEGORIES.len(), per_view);
    loop {
        let page: Vec<String> = carousel
            .visible()
            .map(|i| format!("{} ({})", style(CATEGORIES[i].name).bold(), CATEGORIES[i].key))
            .collect();
        println!("{}", page.join("  "));

        if carousel.current_index() >= carousel.max_index() {
            break;
        }
        carousel.jump(carousel.current_index() + carousel.visible().len());
    }

    for category in CATEGORIES.iter() {
        println!("  {:<12} {}", category.key, style(category.description).dim());
    }
    Ok(())
}

pub fn config(manager: &ConfigManager, config: &Config, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("init", _)) => {
            if manager.initialize().context("Failed to write config file")? {
                println!(
                    "{} Wrote {}",
                    style("✓").green().bold(),
                    manager.config_path().display()
                );
            } else {
                println!("Config already exists at {}", manager.config_path().display());
            }
        }
        Some(("validate", _)) => {
            let problems = manager
                .validate()
                .with_context(|| format!("Failed to read {}", manager.config_path().display()))?;
            if problems.is_empty() {
                println!("{} {} is valid", style("✓").green().bold(), manager.config_path().display());
            } else {
                for problem in &problems {
                    println!("{} {}", style("✗").red().bold(), problem);
                }
                println!("Sections with problems are replaced by their defaults when loaded.");
            }
        }
        Some(("reset", _)) => {
            manager.reset().context("Failed to reset config file")?;
            println!(
                "{} Reset {} (previous file kept at {})",
                style("✓").green().bold(),
                manager.config_path().display(),
                manager.backup_path().display()
            );
        }
        _ => {
            println!("# {}", manager.config_path().display());
            let rendered = serde_json::to_string_pretty(&config_summary(config))
                .context("Failed to render configuration")?;
            println!("{}", rendered);
        }
    }
    Ok(())
}

fn config_summary(config: &Config) -> serde_json::Value {
    serde_json::json!({
        "app": {
            "log_level": config.app.log_level.to_string(),
            "data_dir": config.app.data_dir.as_ref().map(|p| p.display().to_string()),
        },
        "catalog": {
            "base_url": config.catalog.base_url,
            "covers_base_url": config.catalog.covers_base_url,
            "timeout_secs": config.catalog.timeout_secs,
            "search_limit": config.catalog.search_limit,
            "trending_limit": config.catalog.trending_limit,
            "trending_subject": config.catalog.trending_subject,
            "trending_sort": config.catalog.trending_sort,
        },
        "carousel": {
            "interval_ms": config.carousel.interval_ms,
            "items_per_view": config.carousel.items_per_view,
        },
    })
}

fn query_arg(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("query")
        .cloned()
        .unwrap_or_default()
}

fn filters_from(matches: &ArgMatches) -> SearchFilters {
    let get = |name: &str| matches.get_one::<String>(name).cloned();
    SearchFilters {
        title: get("title"),
        author: get("author"),
        subject: get("subject"),
        year: get("year"),
        isbn: get("isbn"),
    }
}

/// Converts a 1-based position argument to an index
fn index_from(matches: &ArgMatches) -> Result<usize> {
    let position = matches
        .get_one::<usize>("index")
        .copied()
        .ok_or_else(|| anyhow!("Position is required"))?;
    to_index(position)
}

fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow!("Positions start at 1"))
}

fn pick(books: &[Book], position: usize) -> Result<&Book> {
    let index = to_index(position)?;
    books
        .get(index)
        .ok_or_else(|| anyhow!("Only {} results, no result {}", books.len(), position))
}

fn describe_filters(filters: &SearchFilters) -> String {
    filters
        .active()
        .iter()
        .map(|(field, value)| format!("{}: {}", field, value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_books(session: &Session, heading: &str, books: &[Book]) -> Result<()> {
    if session.json {
        let rendered = serde_json::to_string_pretty(books).context("Failed to encode books")?;
        println!("{}", rendered);
        return Ok(());
    }

    if books.is_empty() {
        return Ok(());
    }

    println!("\n{} {}", style(books.len()).bold().cyan(), heading);
    println!("{}", "=".repeat(80));

    for (position, book) in books.iter().enumerate() {
        print_book_summary(
            position + 1,
            book,
            session.app.is_favorite(&book.key),
            &session.config.catalog.covers_base_url,
        );
    }
    Ok(())
}

fn print_book_summary(position: usize, book: &Book, is_favorite: bool, covers_base_url: &str) {
    print!("\n{:>2}. {}", position, style(&book.title).bold());
    if is_favorite {
        print!("  {}", style("★ Favorite").yellow());
    }
    println!();

    let authors = book
        .primary_authors()
        .unwrap_or_else(|| "Unknown author".to_string());
    match book.first_publish_year {
        Some(year) => println!("    by {} ({})", authors, year),
        None => println!("    by {}", authors),
    }

    if let Some(line) = book.opening_line() {
        println!("    {}", style(truncate(line, 72)).dim());
    }

    println!("    Key: {}", book.key);
    if let Some(url) = book.cover_url_with_base(covers_base_url, CoverSize::Medium) {
        println!("    Cover: {}", url);
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests;
