//! View classification

use crate::host::Host;
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// `prop:viewid` value of items shown in an editor view
pub const EDITOR_VIEW_ID: &str = "1";

/// Global flag set while the preview editor is open
pub const PREVIEW_EDITOR_FLAG: &str = "preview_editor_opened";

/// Where an item is being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    Main,
    Preview,
    Thumbnail,
}

/// Classify the view `item_id` renders in
///
/// Two round trips with nothing tying them together: the preview flag can
/// change after `prop:viewid` was read, and the answer reflects whatever
/// the flag said at the second read. Items outside the editor view never
/// look at the flag.
pub async fn resolve_view(host: &Host, item_id: &str) -> Result<ViewKind> {
    let view_id = host.get("prop:viewid", item_id).await?;
    if view_id != EDITOR_VIEW_ID {
        return Ok(ViewKind::Main);
    }

    let preview_open = host.get_global_property(PREVIEW_EDITOR_FLAG).await?;
    let view = if preview_open == "1" {
        ViewKind::Preview
    } else {
        ViewKind::Thumbnail
    };
    debug!("Item {} renders in {:?}", item_id, view);
    Ok(view)
}
