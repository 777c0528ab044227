//! Atomic file writer: write-temp, fsync, rename.
//!
//! Crash-safe visibility for a byte buffer at a target path — readers
//! never observe a truncated or half-written file.

use std::path::Path;

use tracing::debug;

/// Write `bytes` durably to `target`.
///
/// Writes to `{target}.tmp`, fsyncs it (best-effort — platforms without
/// fsync just skip it), then renames over `target`. No unencrypted buffer
/// should ever reach this function; callers are responsible for
/// encrypting first.
pub async fn write(target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = tmp_path(target);
    {
        let file = tokio::fs::File::create(&tmp).await?;
        use tokio::io::AsyncWriteExt;
        let mut file = file;
        file.write_all(bytes).await?;
        file.sync_all().await?;
    }

    tokio::fs::rename(&tmp, target).await?;
    debug!(path = %target.display(), bytes = bytes.len(), "atomic write complete");
    Ok(())
}

fn tmp_path(target: &Path) -> std::path::PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

/// Remove any leftover `.tmp` sibling of `target`. Leftover temp files
/// from a prior crash are benign; this is a best-effort cleanup the store
/// runs at construction time.
pub async fn sweep_stale_tmp(dir: &Path) -> std::io::Result<()> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("tmp") {
            let _ = tokio::fs::remove_file(&path).await;
        }
    }
    Ok(())
}
