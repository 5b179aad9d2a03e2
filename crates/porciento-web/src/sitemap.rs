//! Sitemap builder.
//!
//! The sitemap is a projection of the calculation store: every promoted url,
//! sorted, deduplicated, written as a minimal sitemaps.org `urlset`. It is
//! rebuilt wholesale on each promotion and can be discarded at any time.

use std::{
  io,
  path::{Path, PathBuf},
};

use porciento_core::store::CalculationStore;
use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::atomic::write_atomically;

const NS_SITEMAP: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Error)]
pub enum SitemapError {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("io error: {0}")]
  Io(#[from] io::Error),

  #[error("xml error: {0}")]
  Xml(String),
}

/// Owns the on-disk sitemap file.
///
/// Rebuilds are serialised, so concurrent promotions never share the
/// temporary file.
#[derive(Debug)]
pub struct Sitemap {
  path: PathBuf,
  lock: Mutex<()>,
}

impl Sitemap {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), lock: Mutex::new(()) }
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Refresh the projection from `store` and replace the file.
  ///
  /// Returns the number of urls written. On failure the previous file, if
  /// any, is left untouched.
  pub async fn rebuild<S>(&self, store: &S) -> Result<usize, SitemapError>
  where
    S: CalculationStore,
  {
    let _guard = self.lock.lock().await;

    let urls = store
      .refresh_sitemap_urls()
      .await
      .map_err(|e| SitemapError::Store(Box::new(e)))?;
    let document = render(&urls)?;
    write_atomically(&self.path, document).await?;

    tracing::info!(path = %self.path.display(), urls = urls.len(), "sitemap rebuilt");
    Ok(urls.len())
  }
}

/// Serialise `urls` as a `urlset` document, in the order given.
pub fn render(urls: &[String]) -> Result<Vec<u8>, SitemapError> {
  let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

  write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

  let mut urlset = BytesStart::new("urlset");
  urlset.push_attribute(("xmlns", NS_SITEMAP));
  write(&mut writer, Event::Start(urlset))?;

  for url in urls {
    write(&mut writer, Event::Start(BytesStart::new("url")))?;
    write(&mut writer, Event::Start(BytesStart::new("loc")))?;
    write(&mut writer, Event::Text(BytesText::new(url)))?;
    write(&mut writer, Event::End(BytesEnd::new("loc")))?;
    write(&mut writer, Event::End(BytesEnd::new("url")))?;
  }

  write(&mut writer, Event::End(BytesEnd::new("urlset")))?;

  let mut bytes = writer.into_inner();
  bytes.push(b'\n');
  Ok(bytes)
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SitemapError> {
  writer
    .write_event(event)
    .map_err(|e| SitemapError::Xml(e.to_string()))
}
