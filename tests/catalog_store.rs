use std::path::Path;

use couchtv::catalog::store::{
    CatalogError, CatalogHandle, CatalogStore, Documents, JsonCatalogStore,
};
use couchtv::catalog::{next_id, Catalog};

#[test]
fn missing_documents_load_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCatalogStore::new(dir.path().join("nested").join("data")).unwrap();
    assert_eq!(store.load().unwrap(), Catalog::default());
}

#[test]
fn save_then_load_preserves_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCatalogStore::new(dir.path()).unwrap();

    let mut catalog = Catalog::default();
    for n in 1..=11 {
        catalog.add_channel(format!("ch{n}"), format!("/media/ch{n}"));
    }
    let season = catalog.add_season("Season 1".into());
    catalog
        .season_mut(&season.id)
        .unwrap()
        .append_episodes(Path::new("/media/s1"), vec!["a.mp4".into(), "b.mkv".into()]);
    catalog.add_show("Poirot".into(), String::new());

    store.save(&catalog, Documents::ALL).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded, catalog);
    // "10" and "11" sort after "9", not after "1".
    assert_eq!(loaded.channels.last().unwrap().id, "11");
}

#[test]
fn channels_document_is_keyed_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCatalogStore::new(dir.path()).unwrap();
    let mut catalog = Catalog::default();
    catalog.add_channel("News".into(), "/media/news".into());
    store.save(&catalog, Documents::ALL).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("channels.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        doc,
        serde_json::json!({ "1": { "id": "1", "name": "News", "folder_path": "/media/news" } })
    );
    assert!(raw.contains("\n  \"1\""), "expected two-space pretty printing:\n{raw}");
}

#[test]
fn reads_documents_written_by_older_installs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("seasons.json"),
        r#"[{"id": "1", "name": "Season 4", "episodes": [{"id": "1", "filename": "e.mkv", "path": "/s4/e.mkv"}]}]"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("shows.json"), r#"[{"id": "1", "name": "Show"}]"#).unwrap();

    let catalog = JsonCatalogStore::new(dir.path()).unwrap().load().unwrap();
    assert_eq!(catalog.seasons[0].episodes[0].filename, "e.mkv");
    assert_eq!(catalog.shows[0].poster, "");
    assert!(catalog.shows[0].seasons.is_empty());
}

#[test]
fn corrupt_document_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("seasons.json"), "{ not json").unwrap();
    let err = JsonCatalogStore::new(dir.path()).unwrap().load().unwrap_err();
    assert!(matches!(err, CatalogError::Json { .. }), "unexpected error: {err}");
}

#[test]
fn next_id_skips_past_highest() {
    assert_eq!(next_id(std::iter::empty()), "1");
    assert_eq!(next_id(["1", "2", "3"].into_iter()), "4");
    assert_eq!(next_id(["2", "3"].into_iter()), "4");
    assert_eq!(next_id(["legacy", "7"].into_iter()), "8");
}

#[test]
fn season_episode_ids_continue_from_existing() {
    let mut catalog = Catalog::default();
    let season = catalog.add_season("S".into());
    let season = catalog.season_mut(&season.id).unwrap();
    season.append_episodes(Path::new("/a"), vec!["1.mp4".into(), "2.mp4".into()]);
    season.append_episodes(Path::new("/b"), vec!["x.mkv".into()]);
    let ids: Vec<&str> = season.episodes.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
    assert_eq!(season.episodes[2].path, "/b/x.mkv");
}

#[tokio::test]
async fn failed_update_is_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let handle = CatalogHandle::new(JsonCatalogStore::new(dir.path()).unwrap());

    let result = handle
        .update(|c| {
            c.add_season("discarded".into());
            Err::<(), _>("nope")
        })
        .await
        .unwrap();
    assert_eq!(result, Err("nope"));
    assert!(handle.read().await.unwrap().seasons.is_empty());
    assert!(!dir.path().join("seasons.json").exists());
}

#[tokio::test]
async fn update_rewrites_only_changed_documents() {
    let dir = tempfile::tempdir().unwrap();
    // Hand-formatted, so any rewrite would change the bytes.
    let shows = b"[{\"id\":\"1\",\"name\":\"Kept\",\"poster\":\"\",\"seasons\":[]}]";
    std::fs::write(dir.path().join("shows.json"), shows).unwrap();
    let handle = CatalogHandle::new(JsonCatalogStore::new(dir.path()).unwrap());

    handle
        .update(|c| Ok::<_, ()>(c.add_channel("News".into(), "/media/news".into())))
        .await
        .unwrap()
        .unwrap();

    assert!(dir.path().join("channels.json").exists());
    assert!(!dir.path().join("seasons.json").exists());
    assert_eq!(std::fs::read(dir.path().join("shows.json")).unwrap(), shows);
}

#[tokio::test]
async fn unchanged_update_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let handle = CatalogHandle::new(JsonCatalogStore::new(dir.path()).unwrap());

    handle
        .update(|c| Ok::<_, ()>(c.remove_season("1")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn changed_documents_follow_the_mutation() {
    let before = Catalog::default();
    let mut after = before.clone();
    after.add_season("S".into());
    assert_eq!(
        Documents::changed(&before, &after),
        Documents { channels: false, seasons: true, shows: false }
    );
    assert!(Documents::changed(&before, &before).is_empty());
}
