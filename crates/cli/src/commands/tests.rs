use super::*;
use bookfinder_core::FilterField;

#[test]
fn test_truncate() {
    assert_eq!(truncate("12345678", 8), "12345678");
    assert_eq!(truncate("123456789", 8), "12345678...");
    assert_eq!(truncate("ééééé", 3), "ééé...");
}

#[test]
fn test_to_index_is_one_based() {
    assert_eq!(to_index(1).unwrap(), 0);
    assert!(to_index(0).is_err());
}

#[test]
fn test_pick() {
    let books = vec![Book::new("/works/A", "A"), Book::new("/works/B", "B")];
    assert_eq!(pick(&books, 2).unwrap().key, "/works/B");
    assert!(pick(&books, 3).is_err());
    assert!(pick(&[], 1).is_err());
}

#[test]
fn test_describe_filters() {
    let filters = SearchFilters::new()
        .with_author("Tolkien")
        .with_year("1954")
        .with_title(" ");
    assert_eq!(describe_filters(&filters), "author: Tolkien, year: 1954");
    assert_eq!(describe_filters(&SearchFilters::default()), "");
}

#[test]
fn test_config_summary_lists_every_section() {
    let summary = config_summary(&Config::default());
    assert_eq!(summary["catalog"]["search_limit"], 24);
    assert_eq!(summary["carousel"]["interval_ms"], 4000);
    assert_eq!(summary["app"]["log_level"], "info");
}

#[test]
fn test_filter_field_labels() {
    assert_eq!(FilterField::Year.to_string(), "year");
}

fn run_config(manager: &ConfigManager, args: &[&str]) -> Result<()> {
    let mut argv = vec!["bookfinder", "config"];
    argv.extend_from_slice(args);
    let matches = crate::build_cli().try_get_matches_from(argv)?;
    let (_, config_matches) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing subcommand"))?;
    config(manager, &manager.load_or_default(), config_matches)
}

#[test]
fn test_config_reset_replaces_invalid_file() -> Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path());
    std::fs::write(manager.config_path(), "[carousel]\ninterval_ms = 0\n")?;

    run_config(&manager, &["validate"])?;
    assert_eq!(manager.validate()?.len(), 1);

    run_config(&manager, &["reset"])?;
    assert!(manager.validate()?.is_empty());
    assert!(manager.backup_path().exists());
    Ok(())
}

#[test]
fn test_config_validate_needs_parseable_file() -> Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path());
    std::fs::write(manager.config_path(), "[carousel\n")?;

    assert!(run_config(&manager, &["validate"]).is_err());
    Ok(())
}

fn session() -> Session {
    let source = std::sync::Arc::new(bookfinder_content_sources::OpenLibrarySource::new());
    let config = Config::default();
    let (app, notifications) =
        AppState::new(bookfinder_storage::PersistentStore::in_memory(), source, &config);
    Session {
        app,
        notifications,
        config,
        json: false,
    }
}

fn run_profile(session: &mut Session, args: &[&str]) -> Result<()> {
    let mut argv = vec!["bookfinder", "profile"];
    argv.extend_from_slice(args);
    let matches = crate::build_cli().try_get_matches_from(argv)?;
    let (_, profile_matches) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing subcommand"))?;
    profile(session, profile_matches)
}

#[tokio::test]
async fn test_profile_sign_in_update_sign_out() -> Result<()> {
    let mut session = session();

    assert!(run_profile(&mut session, &["sign-in", "ada"]).is_err());
    assert!(session.app.current_user().is_none());

    run_profile(&mut session, &["sign-in", "ada@example.org"])?;
    assert_eq!(session.app.current_user().map(|u| u.name), Some("ada".to_string()));

    run_profile(&mut session, &["update", "--name", "Ada L.", "--email", "ada@example.org"])?;
    assert_eq!(session.app.current_user().map(|u| u.name), Some("Ada L.".to_string()));

    run_profile(&mut session, &["sign-out"])?;
    assert!(session.app.current_user().is_none());
    assert!(run_profile(&mut session, &["update", "--name", "A", "--email", "a@b.c"]).is_err());
    Ok(())
}
