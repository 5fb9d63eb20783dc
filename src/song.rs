use anyhow::{Context, Result, bail};
use sha2::{Digest, Sha256};
use std::path::Path;

/// One row of the song list CSV. Padding cells use the default (all-empty)
/// record, which renders as an empty card.
#[derive(Debug, Clone, Default)]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub url: String,
    pub start: String,
}

impl Song {
    /// Placeholder cells have no title and produce no audio or QR code.
    pub fn is_placeholder(&self) -> bool {
        self.title.is_empty()
    }

    /// Hex SHA-256 of title + artist + album, assumed unique per song.
    /// Keys the audio file, the QR image and the QR payload, so the player
    /// cannot read the title from the file name.
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update(self.artist.as_bytes());
        hasher.update(self.album.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Start timestamp converted to whole seconds. Accepts HH:MM:SS, MM:SS,
    /// bare seconds, or an empty field (no trimming offset).
    pub fn start_offset(&self) -> Result<u64> {
        parse_timestamp(&self.start)
            .with_context(|| format!("invalid start time for '{} - {}'", self.artist, self.title))
    }
}

fn parse_timestamp(ts: &str) -> Result<u64> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Ok(0);
    }
    let parts: Vec<&str> = ts.split(':').collect();
    if parts.len() > 3 {
        bail!("too many ':' in timestamp '{}'", ts);
    }
    let mut total = 0u64;
    for part in &parts {
        let value: u64 = part
            .parse()
            .with_context(|| format!("invalid number '{}' in timestamp '{}'", part, ts))?;
        total = total * 60 + value;
    }
    Ok(total)
}

/// Read the song list, skipping the header line.
pub fn read_song_list(path: &Path) -> Result<Vec<Song>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("cannot open song list {}", path.display()))?;

    let mut songs = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != 6 {
            bail!(
                "line {}: expected 6 fields (title, artist, album, year, url, start time), got {}",
                line,
                record.len()
            );
        }
        let song = Song {
            title: record[0].to_string(),
            artist: record[1].to_string(),
            album: record[2].to_string(),
            year: record[3].to_string(),
            url: record[4].to_string(),
            start: record[5].to_string(),
        };
        if song.is_placeholder() {
            bail!("line {}: song has no title", line);
        }
        songs.push(song);
    }
    Ok(songs)
}
