use futures::StreamExt;
use futures::stream;
use serde::Serialize;
use tracing::{debug, info};

use crate::db::Database;
use crate::error::SyncError;
use crate::models::RecipeIndex;
use crate::remote::{RecipeSource, RemoteRecipeSummary};

/// Counters for one sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub remote_total: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl SyncSummary {
    /// Documents actually downloaded this run.
    #[must_use]
    pub fn fetched(&self) -> usize {
        self.created + self.updated
    }
}

/// Bring the local store up to date with the remote index.
///
/// Lists the remote index, compares each entry's hash against the stored
/// one, and downloads stale or missing documents with at most `max_workers`
/// requests in flight. Results are applied in completion order, each as its
/// own transaction, so a failed run keeps everything applied before the
/// failure. The first error aborts the run and drops in-flight requests.
pub async fn fetch_all<S>(
    db: &Database,
    source: &S,
    max_workers: usize,
) -> Result<SyncSummary, SyncError>
where
    S: RecipeSource + ?Sized,
{
    let remote = source.list_recipes().await?;
    let mut summary = SyncSummary {
        remote_total: remote.len(),
        ..SyncSummary::default()
    };

    let mut stale: Vec<(RemoteRecipeSummary, Option<RecipeIndex>)> = Vec::new();
    for entry in remote {
        debug!("checking recipe {}", entry.uid);
        match db.get_index_by_uid(&entry.uid)? {
            Some(index) if index.hash == entry.hash => {
                debug!("recipe {} is unchanged", entry.uid);
                summary.unchanged += 1;
            }
            prior => {
                debug!("recipe {} has changed", entry.uid);
                stale.push((entry, prior));
            }
        }
    }

    // A width of 0 would never poll anything.
    let width = max_workers.max(1);
    let mut results = stream::iter(stale.into_iter().map(|(entry, prior)| async move {
        (source.fetch_recipe(&entry.uid).await, prior)
    }))
    .buffer_unordered(width);

    while let Some((fetched, prior)) = results.next().await {
        let recipe = fetched?;
        info!("retrieved recipe {} ({})", recipe.uid, recipe.name);
        db.apply_remote_recipe(&recipe)?;
        if prior.is_some() {
            summary.updated += 1;
        } else {
            summary.created += 1;
        }
    }

    Ok(summary)
}
