//! Duplicate and unlink against old and new hosts

mod helpers;

use helpers::{session, LEGACY_HOST, LINKED_HOST};
use stagehand_client::properties::PropertyBag;
use stagehand_client::{
    BridgeCall, DuplicateOptions, Error, Item, Scene, SceneArg, SourceProperties,
};

#[tokio::test]
async fn test_legacy_duplicate_is_plain_additem() {
    let (memory, host) = session(LEGACY_HOST);
    let id = memory.add_item(0, &[("name", "Cam"), ("type", "2")]);
    let mut item = Item::resolve(&host, &id).await.unwrap();
    memory.clear_calls();

    let options = DuplicateOptions::new()
        .linked(true)
        .scene(Scene::from_number(2).unwrap());
    item.duplicate(Some(options)).await.unwrap();

    assert_eq!(memory.func_calls(), vec!["additem"]);
    // No keeploaded write on old hosts
    assert_eq!(memory.calls().len(), 1);
    assert_eq!(memory.item_ids().len(), 2);
}

#[tokio::test]
async fn test_duplicate_without_options() {
    let (memory, host) = session(LINKED_HOST);
    let id = memory.add_item(0, &[("name", "Cam")]);
    let mut item = Item::resolve(&host, &id).await.unwrap();
    memory.clear_calls();

    item.duplicate(None).await.unwrap();

    assert_eq!(memory.func_calls(), vec!["link:0|additem"]);
    let copy = memory.item_ids().pop().unwrap();
    assert_ne!(memory.source_of(&copy), memory.source_of(&id));
}

#[tokio::test]
async fn test_linked_duplicate_into_scene() {
    let (memory, host) = session(LINKED_HOST);
    let id = memory.add_item(0, &[("name", "Cam"), ("type", "2")]);
    let mut item = Item::resolve(&host, &id).await.unwrap();
    memory.clear_calls();

    let options = DuplicateOptions::new()
        .linked(true)
        .scene(Scene::from_number(2).unwrap());
    let same = item.duplicate(Some(options)).await.unwrap();
    assert_eq!(same.id(), id);

    let calls = memory.calls();
    assert_eq!(
        calls[0],
        BridgeCall::Set {
            key: "prop:keeploaded".to_string(),
            value: "1".to_string(),
            id: id.clone(),
        }
    );
    assert_eq!(calls[1].func_name(), Some("link:1|s:2|additem"));

    let copy = memory.item_ids().pop().unwrap();
    assert_eq!(memory.source_of(&copy), memory.source_of(&id));
    assert_eq!(memory.scene_of(&copy), Some(1));
}

#[tokio::test]
async fn test_duplicate_sends_serialized_item() {
    let (memory, host) = session(LINKED_HOST);
    let id = memory.add_item(0, &[("name", "Cam"), ("pos", "0,0,1,1")]);
    let mut item = Item::from_xml(
        &host,
        &format!(
            r#"<item id="{}" srcid="{}" name="Cam" pos="0,0,1,1"/>"#,
            id,
            memory.source_of(&id).unwrap()
        ),
        0,
    )
    .unwrap();
    memory.clear_calls();

    item.duplicate(None).await.unwrap();

    let argument = match &memory.calls()[0] {
        BridgeCall::CallFunc { argument, .. } => argument.clone(),
        other => panic!("expected callFunc, got {:?}", other),
    };
    let bag = PropertyBag::from_item_xml(&argument).unwrap();
    assert_eq!(bag.get("id"), Some(id.as_str()));
    assert_eq!(bag.get("name"), Some("Cam"));
    assert_eq!(bag.get("pos"), Some("0,0,1,1"));
}

#[tokio::test]
async fn test_scene_number_is_rejected() {
    let (memory, host) = session(LINKED_HOST);
    let id = memory.add_item(0, &[("name", "Cam")]);
    let mut item = Item::resolve(&host, &id).await.unwrap();
    memory.clear_calls();

    let options = DuplicateOptions {
        linked: Some(true),
        scene: Some(SceneArg::Number(42)),
    };
    let result = item.duplicate(Some(options)).await;

    assert!(matches!(result, Err(Error::InvalidParameters(_))));
    assert!(memory.calls().is_empty());
}

#[tokio::test]
async fn test_legacy_duplicate_ignores_invalid_scene() {
    let (memory, host) = session(LEGACY_HOST);
    let id = memory.add_item(0, &[("name", "Cam")]);
    let mut item = Item::resolve(&host, &id).await.unwrap();
    memory.clear_calls();

    let options = DuplicateOptions {
        linked: None,
        scene: Some(SceneArg::Number(42)),
    };
    item.duplicate(Some(options)).await.unwrap();

    assert_eq!(memory.func_calls(), vec!["additem"]);
    assert_eq!(memory.item_ids().len(), 2);
}

#[tokio::test]
async fn test_linked_duplicate_defaults_to_internal_scene_id() {
    let (memory, host) = session(LINKED_HOST);
    let id = memory.add_item(0, &[("name", "Cam")]);
    let mut item = Item::resolve(&host, &id).await.unwrap();
    memory.clear_calls();

    item.duplicate(Some(DuplicateOptions::new().linked(true)))
        .await
        .unwrap();

    assert_eq!(memory.func_calls(), vec!["link:1|s:0|additem"]);
    let copy = memory.item_ids().pop().unwrap();
    assert_eq!(memory.source_of(&copy), memory.source_of(&id));
    assert_eq!(memory.scene_of(&copy), Some(0));
}

#[tokio::test]
async fn test_duplicate_failure_propagates() {
    let (memory, host) = session(LINKED_HOST);
    let id = memory.add_item(0, &[("name", "Cam")]);
    let mut item = Item::resolve(&host, &id).await.unwrap();
    memory.fail_on("callFunc link:0|additem", "rejected");

    let result = item.duplicate(None).await;
    assert!(matches!(result, Err(Error::Transport { .. })));
    assert_eq!(memory.item_ids().len(), 1);
}

#[tokio::test]
async fn test_unlink_twice() {
    let (memory, host) = session(LINKED_HOST);
    let a_id = memory.add_item(0, &[("name", "Cam")]);
    let b_id = memory.add_linked_item(&a_id, 0).unwrap();
    let shared = memory.source_of(&a_id).unwrap();

    let mut b = Item::resolve(&host, &b_id).await.unwrap();
    b.unlink().await.unwrap();

    let own = memory.source_of(&b_id).unwrap();
    assert_ne!(own, shared);
    assert_eq!(b.source_id(), own);
    assert_eq!(memory.source_of(&a_id).unwrap(), shared);
    assert_eq!(memory.property(&b_id, "globalsrc").as_deref(), Some("0"));

    // Second unlink resolves and changes nothing
    b.unlink().await.unwrap();
    assert_eq!(b.source_id(), own);
    assert_eq!(memory.source_of(&b_id).unwrap(), own);
}

#[tokio::test]
async fn test_unlinked_item_stops_sharing() {
    let (memory, host) = session(LINKED_HOST);
    let a_id = memory.add_item(0, &[("name", "Cam")]);
    let b_id = memory.add_linked_item(&a_id, 0).unwrap();

    let mut a = Item::resolve(&host, &a_id).await.unwrap();
    let mut b = Item::resolve(&host, &b_id).await.unwrap();
    assert_eq!(a.name().await.unwrap(), "Cam");

    b.unlink().await.unwrap();
    assert_ne!(a, b);
    // The split source starts from what the shared one held
    assert_eq!(b.cached_property("name").as_deref(), Some("Cam"));

    a.set_name("Changed").await.unwrap();
    assert_eq!(b.cached_property("name").as_deref(), Some("Cam"));
    assert_eq!(memory.property(&b_id, "name").as_deref(), Some("Cam"));
}

#[tokio::test]
async fn test_legacy_unlink_only_clears_flag() {
    let (memory, host) = session(LEGACY_HOST);
    let id = memory.add_item(0, &[("name", "Cam")]);
    let mut item = Item::resolve(&host, &id).await.unwrap();
    memory.clear_calls();

    item.unlink().await.unwrap();
    assert_eq!(
        memory.calls(),
        vec![BridgeCall::Set {
            key: "prop:globalsrc".to_string(),
            value: "0".to_string(),
            id: id.clone(),
        }]
    );
}
