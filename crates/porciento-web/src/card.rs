//! Illustrative PNG cards for landing pages.
//!
//! One card per key, memoised on disk by file name: once
//! `result_{x}_{y}.png` exists it is served as-is and never redrawn.

use std::{
  io::{self, Cursor},
  path::{Path, PathBuf},
};

use image::{ImageFormat, Rgb, RgbImage};
use porciento_core::record::CalcKey;
use thiserror::Error;

use crate::atomic::write_atomically;

/// URL prefix the image directory is mounted under.
pub const PUBLIC_PREFIX: &str = "/images";

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 600;

const CENTRE: [f32; 3] = [0.0, 0.0, 139.0]; // darkblue
const EDGE: [f32; 3] = [144.0, 238.0, 144.0]; // lightgreen

#[derive(Debug, Error)]
pub enum ImageError {
  #[error("io error: {0}")]
  Io(#[from] io::Error),

  #[error("encode error: {0}")]
  Encode(#[from] image::ImageError),

  #[error("render task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct ImageRenderer {
  dir: PathBuf,
}

impl ImageRenderer {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  pub fn dir(&self) -> &Path { &self.dir }

  pub fn file_name(key: CalcKey) -> String { format!("result_{}_{}.png", key.x, key.y) }

  /// Return the public path of the card for `key`, drawing it if needed.
  pub async fn render(&self, key: CalcKey) -> Result<String, ImageError> {
    let file_name = Self::file_name(key);
    let public = format!("{PUBLIC_PREFIX}/{file_name}");
    let path = self.dir.join(&file_name);

    if tokio::fs::try_exists(&path).await? {
      return Ok(public);
    }

    let png = tokio::task::spawn_blocking(move || encode_png(&draw_card(key))).await??;
    write_atomically(&path, png).await?;
    tracing::debug!(path = %path.display(), "rendered image");
    Ok(public)
  }
}

/// Radial gradient background with a bar along the bottom filled to `x`%.
fn draw_card(key: CalcKey) -> RgbImage {
  let (cx, cy) = (WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0);
  let radius = WIDTH as f32 / 2.0;
  let filled = key.x.clamp(0, 100) as f32 / 100.0;

  let (bar_left, bar_right) = (100, WIDTH - 100);
  let (bar_top, bar_bottom) = (HEIGHT - 100, HEIGHT - 60);
  let bar_end = bar_left + ((bar_right - bar_left) as f32 * filled) as u32;

  RgbImage::from_fn(WIDTH, HEIGHT, |px, py| {
    if (bar_top..bar_bottom).contains(&py) && (bar_left..bar_right).contains(&px) {
      return if px < bar_end { Rgb([255, 255, 255]) } else { Rgb([20, 20, 60]) };
    }
    let dist = ((px as f32 - cx).powi(2) + (py as f32 - cy).powi(2)).sqrt();
    let t = (dist / radius).min(1.0);
    Rgb(std::array::from_fn(|i| (CENTRE[i] + (EDGE[i] - CENTRE[i]) * t) as u8))
  })
}

fn encode_png(img: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
  let mut out = Cursor::new(Vec::new());
  img.write_to(&mut out, ImageFormat::Png)?;
  Ok(out.into_inner())
}
