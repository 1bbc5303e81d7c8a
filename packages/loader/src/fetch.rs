//! Remote partition artifact fetch fallback.
//!
//! Missing partitions may exist in a remote artifact store under a
//! deterministic name, `{dataset-key}_{year}_{month:02}.csv`. A fetch
//! downloads the full body before persisting, writing to a temp path
//! and renaming into place so a failed transfer never leaves a partial
//! partition on disk.
//!
//! Every failure mode — 404, timeout, transport error, write error —
//! is treated as "partition absent": logged and absorbed, never
//! propagated. Absence is an expected condition for sparse historical
//! data.

use std::path::Path;

use identity_pulse_records_models::Dataset;

/// Remote artifact file name for one partition.
#[must_use]
pub fn artifact_name(dataset: Dataset, year: i32, month: u32) -> String {
    format!("{}_{year}_{month:02}.csv", dataset.remote_key())
}

/// Attempts to fetch one partition from the remote store and persist it
/// at `dest`. Returns `true` only when the file was downloaded and
/// written completely.
pub async fn fetch_partition(
    client: &reqwest::Client,
    base_url: &str,
    dataset: Dataset,
    year: i32,
    month: u32,
    dest: &Path,
) -> bool {
    let asset = artifact_name(dataset, year, month);
    let url = format!("{}/{asset}", base_url.trim_end_matches('/'));

    log::info!("{dataset}: partition {year}-{month:02} missing locally, fetching {url}");

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            log::warn!("{dataset}: fetch failed for {asset}: {e}");
            return false;
        }
    };

    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        log::warn!("{dataset}: no remote artifact for {year}-{month:02} (404)");
        return false;
    }

    if !status.is_success() {
        log::warn!("{dataset}: fetch of {asset} returned HTTP {status}");
        return false;
    }

    // Full-body read before any write, then temp-file + rename, so a
    // truncated transfer cannot leave a partial partition behind.
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            log::warn!("{dataset}: failed reading body of {asset}: {e}");
            return false;
        }
    };

    if let Err(e) = persist_atomically(dest, &body).await {
        log::warn!("{dataset}: failed persisting {asset}: {e}");
        return false;
    }

    log::info!("{dataset}: downloaded {asset} ({} bytes)", body.len());
    true
}

/// Writes `body` to `dest` via a sibling temp file and rename.
async fn persist_atomically(dest: &Path, body: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = dest.with_extension("csv.part");
    tokio::fs::write(&tmp, body).await?;
    tokio::fs::rename(&tmp, dest).await
}
