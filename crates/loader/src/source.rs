use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// A file prepared for scanning.
///
/// Bytes are decoded as latin-1 so every input decodes, and line breaks
/// (`\n`, `\r\n` or a lone `\r`) are normalised to `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Normalised text; lines are joined by `\n` with no trailing newline.
    pub text: String,
    /// blake3 hex digest of the raw bytes.
    pub fingerprint: String,
}

impl SourceFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::from_bytes(path, &bytes))
    }

    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Self {
        let decoded: String = bytes.iter().map(|&b| b as char).collect();
        Self {
            path: path.to_path_buf(),
            text: split_lines(&decoded).join("\n"),
            fingerprint: blake3::hash(bytes).to_hex().to_string(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// 1-based line, if it exists.
    pub fn line(&self, number: usize) -> Option<&str> {
        number.checked_sub(1).and_then(|i| self.lines().nth(i))
    }
}

/// Splits on `\n`, `\r\n` and lone `\r`. A final line break does not start
/// a new line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}
