use anyhow::{Context, Result};
use qrcode::QrCode;
use std::path::{Path, PathBuf};
use tracing::debug;

/// QR image file for a song hash.
pub fn qr_path(pics_dir: &Path, hash: &str) -> PathBuf {
    pics_dir.join(format!("{}.png", hash))
}

/// URL the card back encodes: where the trimmed mp3 for this hash is hosted.
pub fn audio_url(base_url: &str, hash: &str) -> String {
    format!("{}/{}.mp3", base_url.trim_end_matches('/'), hash)
}

/// Render the payload as a QR code PNG unless the image already exists on
/// disk, mirroring the audio cache. Returns whether a new image was written.
pub fn ensure_qr_png(payload: &str, path: &Path) -> Result<bool> {
    if path.is_file() {
        debug!("{} already exists, skipping", path.display());
        return Ok(false);
    }
    write_qr_png(payload, path)?;
    Ok(true)
}

/// Render the payload as a QR code PNG.
pub fn write_qr_png(payload: &str, path: &Path) -> Result<()> {
    let code = QrCode::new(payload.as_bytes())
        .with_context(|| format!("cannot encode QR payload '{}'", payload))?;
    let image = code
        .render::<image::Luma<u8>>()
        .min_dimensions(360, 360)
        .build();
    image
        .save(path)
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_url_normalizes_trailing_slash() {
        assert_eq!(
            audio_url("https://example.com", "abc"),
            "https://example.com/abc.mp3"
        );
        assert_eq!(
            audio_url("https://example.com/", "abc"),
            "https://example.com/abc.mp3"
        );
    }

    #[test]
    fn writes_a_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = qr_path(dir.path(), "abc123");
        write_qr_png("https://example.com/abc123.mp3", &path).unwrap();
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn skips_existing_qr_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = qr_path(dir.path(), "abc123");
        std::fs::write(&path, b"placeholder").unwrap();

        let written = ensure_qr_png("https://example.com/abc123.mp3", &path).unwrap();
        assert!(!written);
        // The existing file is left untouched.
        assert_eq!(std::fs::read(&path).unwrap(), b"placeholder");
    }

    #[test]
    fn writes_missing_qr_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = qr_path(dir.path(), "def456");

        let written = ensure_qr_png("https://example.com/def456.mp3", &path).unwrap();
        assert!(written);
        assert!(path.is_file());
    }
}
