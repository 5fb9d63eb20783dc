use crate::qr;
use crate::song::Song;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// One manifest record, mapping a song hash back to its metadata and the
/// hosted audio URL. Useful for uploading the songs/ directory and for
/// resolving a scanned code back to a song.
#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    pub hash: String,
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub album: String,
    pub year: String,
    pub url: String,
    pub audio_url: String,
}

impl ManifestEntry {
    pub fn for_song(song: &Song, base_url: &str) -> Self {
        let hash = song.hash();
        let audio_url = qr::audio_url(base_url, &hash);
        ManifestEntry {
            hash,
            title: song.title.clone(),
            artist: song.artist.clone(),
            album: song.album.clone(),
            year: song.year.clone(),
            url: song.url.clone(),
            audio_url,
        }
    }
}

pub fn write(path: &Path, songs: &[Song], base_url: &str) -> anyhow::Result<()> {
    let entries: Vec<ManifestEntry> = songs
        .iter()
        .map(|song| ManifestEntry::for_song(song, base_url))
        .collect();
    let json = serde_json::to_string_pretty(&entries)?;
    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_carries_hash_and_audio_url() {
        let song = Song {
            title: "T".to_string(),
            artist: "A".to_string(),
            year: "1999".to_string(),
            url: "https://example.com/v".to_string(),
            ..Song::default()
        };
        let entry = ManifestEntry::for_song(&song, "https://cards.example.com/");
        assert_eq!(entry.hash, song.hash());
        assert_eq!(
            entry.audio_url,
            format!("https://cards.example.com/{}.mp3", song.hash())
        );

        // Empty albums stay out of the JSON.
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("album"));
    }

    #[test]
    fn writes_a_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        let song = Song {
            title: "T".to_string(),
            artist: "A".to_string(),
            ..Song::default()
        };
        write(&path, &[song], "https://example.com").unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert!(parsed[0]["hash"].is_string());
    }
}
