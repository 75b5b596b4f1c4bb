//! End-to-end navigation scenarios over the in-memory catalog: the
//! flows a user drives through the UI — pick a tree, answer until a
//! final step, jump back through the history, take the other branch.

use quiztree_core::authoring::{build_tree, parse_tree_json};
use quiztree_core::{
    CatalogError, CatalogStore, MemoryCatalog, Session, SessionError, SessionState,
};
use std::sync::Once;

const SIMPLE_TREE: &str = include_str!("fixtures/simple_tree.json");

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

async fn catalog_with(entries: &[(&str, &str)]) -> MemoryCatalog {
    init_tracing();
    let catalog = MemoryCatalog::new();
    for (name, source) in entries {
        catalog.put(name, source).await.unwrap();
    }
    catalog
}

#[tokio::test]
async fn go_through_tree_to_a_final_step() {
    let catalog = catalog_with(&[("test1", SIMPLE_TREE)]).await;

    let mut session = Session::start(catalog.get("test1").await.unwrap());
    assert_eq!(session.state(), SessionState::Navigating);

    session.select("1st Right").unwrap();
    session.select("2nd Right").unwrap();

    assert!(session.is_final());
    assert_eq!(session.current_label(), "Right Right Node");
}

#[tokio::test]
async fn navigate_backwards_and_take_the_other_branch() {
    let catalog = catalog_with(&[("test1", SIMPLE_TREE)]).await;

    let mut session = Session::start(catalog.get("test1").await.unwrap());
    session.select("1st Right").unwrap();
    session.select("2nd Right").unwrap();
    assert!(session.is_final());

    session.rewind_to("Right Node").unwrap();
    assert!(!session.is_final());
    session.select("2nd Left").unwrap();

    assert!(session.is_final());
    assert_eq!(session.current_label(), "Right Left Node");
    // only the second branch remains in the history
    assert_eq!(
        session.history_labels(),
        vec!["Root node", "Right Node", "Right Left Node"]
    );
}

#[tokio::test]
async fn unknown_choice_is_rejected_and_state_kept() {
    let catalog = catalog_with(&[("test1", SIMPLE_TREE)]).await;

    let mut session = Session::start(catalog.get("test1").await.unwrap());
    session.select("1st Right").unwrap();

    let err = session.select("Sideways").unwrap_err();
    assert!(matches!(err, SessionError::InvalidChoice { .. }));
    assert_eq!(session.current_label(), "Right Node");
    assert_eq!(session.history_labels(), vec!["Root node", "Right Node"]);
}

#[tokio::test]
async fn list_contains_all_added_trees() {
    let catalog = catalog_with(&[
        ("t1", &SIMPLE_TREE.replace("Root node", "t1")),
        ("t2", &SIMPLE_TREE.replace("Root node", "t2")),
        ("t3", &SIMPLE_TREE.replace("Root node", "t3")),
    ])
    .await;

    let names: Vec<String> = catalog
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert!(["t1", "t2", "t3"].iter().all(|n| names.iter().any(|m| m == n)));
}

#[tokio::test]
async fn versioned_delete_requires_current_version() {
    let catalog = MemoryCatalog::new();
    let source_v2 = SIMPLE_TREE.replace("Root node", "Root node v2");

    assert_eq!(catalog.put("t1", SIMPLE_TREE).await.unwrap(), 1);
    assert_eq!(catalog.put("t1", &source_v2).await.unwrap(), 2);

    assert!(matches!(
        catalog.delete_version("t1", 1).await.unwrap_err(),
        CatalogError::VersionConflict { .. }
    ));
    catalog.delete_version("t1", 2).await.unwrap();
    assert!(matches!(
        catalog.get("t1").await.unwrap_err(),
        CatalogError::NotFound { .. }
    ));
}

#[tokio::test]
async fn stored_tree_matches_a_direct_parse() {
    let catalog = catalog_with(&[("test1", SIMPLE_TREE)]).await;
    let stored = catalog.get("test1").await.unwrap();

    let doc = parse_tree_json(SIMPLE_TREE).unwrap();
    let direct = build_tree("test1", 1, &doc).unwrap();

    assert_eq!(*stored, direct);
}

#[tokio::test]
async fn teardown_clears_every_entry() {
    let catalog = catalog_with(&[
        ("t1", &SIMPLE_TREE.replace("Root node", "t1")),
        ("t2", &SIMPLE_TREE.replace("Root node", "t2")),
    ])
    .await;

    // harness teardown: delete whatever is listed
    for summary in catalog.list().await.unwrap() {
        catalog.delete(&summary.name).await.unwrap();
    }
    assert!(catalog.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn back_home_and_reopen_starts_fresh() {
    let catalog = catalog_with(&[("test1", SIMPLE_TREE)]).await;

    let mut session = Session::start(catalog.get("test1").await.unwrap());
    session.select("1st Left").unwrap();
    assert!(session.is_final());

    // going home discards the session; reopening the tree starts over
    drop(session);
    let reopened = Session::start(catalog.get("test1").await.unwrap());
    assert_eq!(reopened.current_label(), "Root node");
    assert_eq!(reopened.history_labels(), vec!["Root node"]);
    assert!(!reopened.is_final());
}

#[tokio::test]
async fn reload_picks_up_later_additions() {
    let catalog = catalog_with(&[
        ("t1", &SIMPLE_TREE.replace("Root node", "t1")),
        ("t2", &SIMPLE_TREE.replace("Root node", "t2")),
    ])
    .await;
    assert_eq!(catalog.list().await.unwrap().len(), 2);

    catalog
        .put("t3", &SIMPLE_TREE.replace("Root node", "t3"))
        .await
        .unwrap();
    let names: Vec<String> = catalog
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["t1", "t2", "t3"]);
}
