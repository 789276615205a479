//! View classification, including its two-read race

mod helpers;

use async_trait::async_trait;
use helpers::{session, LINKED_HOST};
use stagehand_client::item::{resolve_view, PREVIEW_EDITOR_FLAG};
use stagehand_client::{BridgeCall, CallBridge, Host, HostVersion, Item, MemoryHost, ViewKind};
use std::sync::Arc;

#[tokio::test]
async fn test_main_view_never_reads_the_flag() {
    let (memory, host) = session(LINKED_HOST);
    memory.set_global(PREVIEW_EDITOR_FLAG, "1");

    for view_id in ["0", "2", ""] {
        let id = memory.add_item(0, &[("viewid", view_id)]);
        let item = Item::resolve(&host, &id).await.unwrap();
        memory.clear_calls();

        assert_eq!(item.view().await.unwrap(), ViewKind::Main);
        assert!(!memory
            .calls()
            .iter()
            .any(|call| matches!(call, BridgeCall::GetGlobal { .. })));
    }
}

#[tokio::test]
async fn test_editor_view_uses_preview_flag() {
    let (memory, host) = session(LINKED_HOST);
    let id = memory.add_item(0, &[("viewid", "1")]);

    memory.set_global(PREVIEW_EDITOR_FLAG, "1");
    assert_eq!(resolve_view(&host, &id).await.unwrap(), ViewKind::Preview);

    memory.set_global(PREVIEW_EDITOR_FLAG, "0");
    assert_eq!(resolve_view(&host, &id).await.unwrap(), ViewKind::Thumbnail);

    memory.set_global(PREVIEW_EDITOR_FLAG, "");
    assert_eq!(resolve_view(&host, &id).await.unwrap(), ViewKind::Thumbnail);
}

/// Flips the preview flag right after answering `prop:viewid`
struct FlippingBridge {
    inner: Arc<MemoryHost>,
    flip_to: &'static str,
}

#[async_trait]
impl CallBridge for FlippingBridge {
    async fn get(&self, key: &str, id: &str) -> stagehand_client::Result<String> {
        let value = self.inner.get(key, id).await?;
        if key == "prop:viewid" {
            self.inner.set_global(PREVIEW_EDITOR_FLAG, self.flip_to);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, id: &str) -> stagehand_client::Result<()> {
        self.inner.set(key, value, id).await
    }

    async fn get_global_property(&self, key: &str) -> stagehand_client::Result<String> {
        self.inner.get_global_property(key).await
    }

    async fn call_func(&self, name: &str, argument: &str) -> stagehand_client::Result<String> {
        self.inner.call_func(name, argument).await
    }
}

/// The flag is read after `prop:viewid`, not together with it: a change
/// in between decides the answer.
#[tokio::test]
async fn test_flag_change_between_reads_is_observed() {
    let memory = Arc::new(MemoryHost::new());
    let id = memory.add_item(0, &[("viewid", "1")]);
    let version = HostVersion::parse(LINKED_HOST).unwrap();

    memory.set_global(PREVIEW_EDITOR_FLAG, "0");
    let opening = Host::new(
        Arc::new(FlippingBridge {
            inner: memory.clone(),
            flip_to: "1",
        }),
        version.clone(),
    );
    // Thumbnail when viewid was read, Preview by the time the flag was
    assert_eq!(resolve_view(&opening, &id).await.unwrap(), ViewKind::Preview);

    memory.set_global(PREVIEW_EDITOR_FLAG, "1");
    let closing = Host::new(
        Arc::new(FlippingBridge {
            inner: memory.clone(),
            flip_to: "0",
        }),
        version,
    );
    assert_eq!(resolve_view(&closing, &id).await.unwrap(), ViewKind::Thumbnail);
}

#[tokio::test]
async fn test_view_errors_propagate() {
    let (memory, host) = session(LINKED_HOST);
    let id = memory.add_item(0, &[("viewid", "1")]);
    memory.fail_on("global preview_editor_opened", "gone");

    assert!(matches!(
        resolve_view(&host, &id).await,
        Err(stagehand_client::Error::Transport { .. })
    ));
}
