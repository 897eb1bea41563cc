use super::*;

fn octocat() -> Follower {
    Follower::new("octocat", "https://avatars.githubusercontent.com/u/583231")
}

#[tokio::test]
async fn memory_database_keeps_its_only_connection() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let options = storage.pool.options();
    assert_eq!(options.get_max_connections(), 1);
    assert_eq!(options.get_min_connections(), 1);
    assert_eq!(options.get_idle_timeout(), None);
    assert_eq!(options.get_max_lifetime(), None);

    storage.add(&octocat()).await.expect("add");
    assert_eq!(storage.list().await.expect("list"), vec![octocat()]);
}

#[test]
fn file_databases_use_a_connection_pool() {
    let options = pool_options("sqlite://./data/favs.db");
    assert_eq!(options.get_max_connections(), 5);
    assert!(options.get_idle_timeout().is_some());
}

#[tokio::test]
async fn adds_and_lists_favorites_in_insertion_order() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let hubot = Follower::new("hubot", "https://avatars.githubusercontent.com/u/480938");

    storage.add(&octocat()).await.expect("add octocat");
    storage.add(&hubot).await.expect("add hubot");

    let favorites = storage.list().await.expect("list");
    assert_eq!(favorites, vec![octocat(), hubot]);
}

#[tokio::test]
async fn second_add_of_same_follower_reports_duplicate() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    storage.add(&octocat()).await.expect("first add");
    let err = storage.add(&octocat()).await.expect_err("second add");
    assert_eq!(err, FavoritesError::Duplicate);
    assert_eq!(storage.list().await.expect("list").len(), 1);
}

#[tokio::test]
async fn same_login_with_different_avatar_is_not_a_duplicate() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let moved_avatar = Follower::new("octocat", "https://avatars.example/new");

    storage.add(&octocat()).await.expect("add");
    storage.add(&moved_avatar).await.expect("add with new avatar");
    assert_eq!(storage.list().await.expect("list").len(), 2);
}

#[tokio::test]
async fn removes_favorite_and_reports_missing_entries() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    storage.add(&octocat()).await.expect("add");
    storage.remove(&octocat()).await.expect("remove");
    assert!(storage.list().await.expect("list").is_empty());

    let err = storage.remove(&octocat()).await.expect_err("remove again");
    assert_eq!(err, FavoritesError::NotFound);
}

#[tokio::test]
async fn records_added_timestamp() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.add(&octocat()).await.expect("add");

    let stored = storage.list_with_timestamps().await.expect("list");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].follower, octocat());
    assert!(stored[0].added_at <= Utc::now());
}

#[tokio::test]
async fn favorites_survive_reopening_file_database() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("favorites.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    storage.add(&octocat()).await.expect("add");
    storage.pool.close().await;
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = Storage::new(&database_url).await.expect("reopen");
    assert_eq!(reopened.list().await.expect("list"), vec![octocat()]);
}

#[test]
fn memory_urls_have_no_database_file() {
    assert_eq!(database_file("sqlite::memory:"), None);
    assert_eq!(database_file("sqlite://favs.db?mode=memory"), None);
    assert_eq!(database_file("postgres://localhost/favs"), None);
    assert_eq!(
        database_file("sqlite://./data/favs.db?mode=rwc"),
        Some(PathBuf::from("./data/favs.db"))
    );
    assert_eq!(database_file("sqlite:favs.db"), Some(PathBuf::from("favs.db")));
}

#[test]
fn creates_directory_for_file_database() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("data").join("favorites.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    create_database_dir(&database_url).expect("create dir");
    assert!(temp_root.path().join("data").is_dir());
    create_database_dir("sqlite::memory:").expect("memory url needs no directory");
}
