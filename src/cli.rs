use clap::Parser;
use std::path::PathBuf;

/// Turn a CSV song list into printable QR song-quiz cards.
///
/// Front pages carry the song text, back pages carry mirrored QR codes
/// linking to the hosted audio, laid out for long-side double-sided printing.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Input CSV song list (title, artist, album, year, url, start time; first line is a header)
    pub songlist: Option<PathBuf>,

    /// Output LaTeX file
    pub outfile: Option<PathBuf>,

    /// LaTeX document template with a \replaceme marker for the generated pages
    #[arg(short = 't', long, default_value = "template.tex")]
    pub template: PathBuf,

    /// Base URL under which the trimmed mp3 files will be hosted
    #[arg(short = 'u', long, default_value = "https://yourdomainhere.com")]
    pub base_url: String,

    /// Maximum cards per grid row/column; pages hold at most max-grid^2 cards
    #[arg(long, default_value_t = 4)]
    pub max_grid: usize,

    /// Directory for downloaded and trimmed audio files
    #[arg(long, default_value = "songs")]
    pub songs_dir: PathBuf,

    /// Directory for generated QR code images
    #[arg(long, default_value = "pics")]
    pub pics_dir: PathBuf,

    /// Skip the download/trim step and only generate QR codes and the document
    #[arg(short = 'n', long)]
    pub skip_download: bool,

    /// Write a JSON manifest mapping each song hash to its metadata. If no file is provided, the output file name (without extension) will be used with .json.
    #[arg(short = 'w', long = "write-manifest", num_args = 0..=1, value_name = "FILE")]
    pub write_manifest: Option<Option<PathBuf>>,

    /// Show yt-dlp and ffmpeg logs.
    #[arg(short = 'g', long)]
    pub debug: bool,

    /// Ignore the ffmpeg version check.
    #[arg(long)]
    pub ignore_tool_versions: bool,

    /// Check yt-dlp/ffmpeg installation and version compatibility.
    #[arg(short = 'c', long)]
    pub check_tools: bool,

    /// Automatically confirm the build plan and proceed without prompting
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}
