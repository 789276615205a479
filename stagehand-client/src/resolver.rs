//! Source type resolution
//!
//! Fan-out/fan-in over a list of items: deduplicate by source id, load the
//! classification evidence of every unique source concurrently, classify
//! each one.

use crate::item::Item;
use crate::source::{Source, TypedSource};
use crate::{Error, Result};
use futures::future::try_join_all;
use std::collections::HashMap;
use tracing::debug;

/// One item per source id
///
/// Sources keep the order in which their id was first seen; for each
/// source the last item in `items` wins.
pub fn dedup_by_source(items: &[Item]) -> Vec<Item> {
    let mut order: Vec<Item> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for item in items {
        match slots.get(item.source_id()) {
            Some(&slot) => order[slot] = item.clone(),
            None => {
                slots.insert(item.source_id(), order.len());
                order.push(item.clone());
            }
        }
    }
    order
}

/// Classify the source of every unique source id among `items`
///
/// Any failed round trip fails the whole resolution.
pub async fn resolve_sources(items: &[Item]) -> Result<Vec<TypedSource>> {
    let unique = dedup_by_source(items);
    debug!(
        "Resolving {} sources from {} items",
        unique.len(),
        items.len()
    );

    try_join_all(unique.iter().map(|item| async move {
        let mut source = Source::from_item(item);
        source.load_classification_evidence().await?;
        Ok::<_, Error>(source.into_typed())
    }))
    .await
}

/// The first source [`resolve_sources`] yields
///
/// When the items render more than one source, the rest are dropped.
pub async fn first_source(items: &[Item]) -> Result<TypedSource> {
    let sources = resolve_sources(items).await?;
    if sources.len() > 1 {
        debug!(
            "{} sources resolved, returning the first ({})",
            sources.len(),
            sources[0].source_id()
        );
    }
    sources
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound("no items to resolve a source from".to_string()))
}
