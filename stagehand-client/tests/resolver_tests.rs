//! Source deduplication and classification over live items

mod helpers;

use helpers::{get_keys, session, LINKED_HOST};
use stagehand_client::resolver::{dedup_by_source, first_source, resolve_sources};
use stagehand_client::source::AUDIO_DEVICE_GUID;
use stagehand_client::{Error, Item, SourceKind};

#[tokio::test]
async fn test_classifies_each_source() {
    let (memory, host) = session(LINKED_HOST);
    let audio_item = format!("@DEVICE:CM:{}\\Mic", AUDIO_DEVICE_GUID);
    let specs: Vec<(Vec<(&str, &str)>, SourceKind)> = vec![
        (vec![("type", "7"), ("item", "<src pid=\"1\"/>")], SourceKind::Game),
        (vec![("type", "8"), ("item", "https://example.com")], SourceKind::Html),
        (vec![("type", "5"), ("item", "<screen/>")], SourceKind::Screen),
        (vec![("type", "1"), ("item", "C:\\loop.gif")], SourceKind::Image),
        (vec![("type", "1"), ("item", "C:\\clip.mp4")], SourceKind::Media),
        (vec![("type", "2"), ("item", "@DEVICE:PNP:usb")], SourceKind::Camera),
        (vec![("type", "2"), ("item", audio_item.as_str())], SourceKind::Audio),
        (vec![("type", "6"), ("item", "C:\\a.swf")], SourceKind::Flash),
        (vec![("type", "3"), ("item", "hello")], SourceKind::Generic),
    ];

    let mut items = Vec::new();
    for (properties, _) in &specs {
        let id = memory.add_item(0, properties);
        items.push(Item::resolve(&host, &id).await.unwrap());
    }

    let sources = resolve_sources(&items).await.unwrap();
    let kinds: Vec<SourceKind> = sources.iter().map(|s| s.kind()).collect();
    let expected: Vec<SourceKind> = specs.iter().map(|(_, kind)| *kind).collect();
    assert_eq!(kinds, expected);
}

#[tokio::test]
async fn test_video_playlist_reads_playlist_property() {
    let (memory, host) = session(LINKED_HOST);
    let id = memory.add_item(
        0,
        &[
            ("type", "1"),
            ("name", "Video Playlist 1"),
            ("item", "C:\\a.mp4"),
            ("FilePlaylist", "C:\\a.mp4*0|C:\\b.mp4*0"),
        ],
    );
    let item = Item::resolve(&host, &id).await.unwrap();
    memory.clear_calls();

    let sources = resolve_sources(&[item]).await.unwrap();
    assert_eq!(sources[0].kind(), SourceKind::VideoPlaylist);
    assert!(get_keys(&memory).contains(&"prop:FilePlaylist".to_string()));
}

#[tokio::test]
async fn test_playlist_property_skipped_for_other_names() {
    let (memory, host) = session(LINKED_HOST);
    let id = memory.add_item(0, &[("type", "1"), ("name", "Clip"), ("item", "C:\\a.mp4")]);
    let item = Item::resolve(&host, &id).await.unwrap();
    memory.clear_calls();

    resolve_sources(&[item]).await.unwrap();
    assert!(!get_keys(&memory).contains(&"prop:FilePlaylist".to_string()));
}

#[tokio::test]
async fn test_cached_evidence_is_not_reread() {
    let (memory, host) = session(LINKED_HOST);
    let id = memory.add_item(0, &[("type", "8"), ("name", "Page"), ("item", "https://a.b")]);
    let source_id = memory.source_of(&id).unwrap();
    let item = Item::from_xml(
        &host,
        &format!(
            r#"<item id="{}" srcid="{}" type="8" name="Page" item="https://a.b"/>"#,
            id, source_id
        ),
        0,
    )
    .unwrap();
    memory.clear_calls();

    let sources = resolve_sources(&[item]).await.unwrap();
    assert_eq!(sources[0].kind(), SourceKind::Html);
    assert!(memory.calls().is_empty());
}

#[tokio::test]
async fn test_dedup_keeps_first_seen_order_and_last_item() {
    let (memory, host) = session(LINKED_HOST);
    let a_id = memory.add_item(0, &[("type", "2"), ("item", "@DEVICE:PNP:usb")]);
    let c_id = memory.add_item(0, &[("type", "8"), ("item", "https://a.b")]);
    let b_id = memory.add_linked_item(&a_id, 1).unwrap();

    let a = Item::resolve(&host, &a_id).await.unwrap();
    let b = Item::resolve(&host, &b_id).await.unwrap();
    let c = Item::resolve(&host, &c_id).await.unwrap();
    let items = vec![a, c, b];

    let unique = dedup_by_source(&items);
    let ids: Vec<&str> = unique.iter().map(|item| item.id()).collect();
    assert_eq!(ids, vec![b_id.as_str(), c_id.as_str()]);

    let sources = resolve_sources(&items).await.unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].kind(), SourceKind::Camera);
    assert_eq!(sources[0].source().identity().item_id, b_id);
    assert_eq!(sources[1].kind(), SourceKind::Html);
}

/// Only the first of several sources comes back
#[tokio::test]
async fn test_first_source_narrows_to_first_of_many() {
    let (memory, host) = session(LINKED_HOST);
    let camera = memory.add_item(0, &[("type", "2"), ("item", "@DEVICE:PNP:usb")]);
    let page = memory.add_item(0, &[("type", "8"), ("item", "https://a.b")]);

    let items = vec![
        Item::resolve(&host, &camera).await.unwrap(),
        Item::resolve(&host, &page).await.unwrap(),
    ];

    let source = first_source(&items).await.unwrap();
    assert_eq!(source.kind(), SourceKind::Camera);
    assert_eq!(source.source_id(), memory.source_of(&camera).unwrap());
}

#[tokio::test]
async fn test_first_source_of_nothing() {
    assert!(matches!(first_source(&[]).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_item_source_is_classified() {
    let (memory, host) = session(LINKED_HOST);
    let id = memory.add_item(0, &[("type", "7"), ("item", "<src pid=\"1\"/>")]);
    let _linked = memory.add_linked_item(&id, 1).unwrap();

    let item = Item::resolve(&host, &id).await.unwrap();
    let mut source = item.source().await.unwrap();
    assert_eq!(source.kind(), SourceKind::Game);
    assert!(source.as_game().is_some());
    assert!(source.as_screen().is_none());
}

#[tokio::test]
async fn test_resolution_fails_when_any_read_fails() {
    let (memory, host) = session(LINKED_HOST);
    let a = memory.add_item(0, &[("type", "2")]);
    let b = memory.add_item(0, &[("type", "8")]);
    let items = vec![
        Item::resolve(&host, &a).await.unwrap(),
        Item::resolve(&host, &b).await.unwrap(),
    ];
    memory.fail_on("get prop:item", "gone");

    assert!(matches!(
        resolve_sources(&items).await,
        Err(Error::Transport { .. })
    ));
}
