//! Replace-on-success file writes.
//!
//! Bytes go to a uniquely named temp file next to the target and are renamed
//! over it only once fully written and synced. Readers see either the
//! previous file or the new one, and concurrent writers of the same target
//! never share a temp file.

use std::{
  io::{self, Write as _},
  path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

pub(crate) async fn write_atomically(path: &Path, bytes: Vec<u8>) -> io::Result<()> {
  let path = path.to_path_buf();
  tokio::task::spawn_blocking(move || persist(&path, &bytes))
    .await
    .map_err(io::Error::other)?
}

fn persist(path: &Path, bytes: &[u8]) -> io::Result<()> {
  let parent = parent_dir(path);
  std::fs::create_dir_all(&parent)?;

  let mut file = NamedTempFile::new_in(&parent)?;
  file.write_all(bytes)?;
  file.as_file().sync_all()?;
  // On failure the temp file is removed when the returned error drops.
  file.persist(path).map_err(|e| e.error)?;
  Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
  match path.parent() {
    Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
    _ => PathBuf::from("."),
  }
}
