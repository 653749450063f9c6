#[derive(Debug, Clone)]
pub struct OutputAsset {
  /// Output path relative to the project root.
  pub filename: String,
  pub content: String,
}

impl OutputAsset {
  pub fn filename(&self) -> &str {
    &self.filename
  }

  pub fn content_as_bytes(&self) -> &[u8] {
    self.content.as_bytes()
  }

  pub fn size_in_kib(&self) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let size = self.content.len() as f64;
    size / 1024.0
  }
}
