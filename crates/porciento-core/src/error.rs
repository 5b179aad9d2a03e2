//! Error types for `porciento-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown explanation template: {0}")]
  UnknownTemplate(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
