use crate::cli::Args;
use crate::download::{audio_path, download_song};
use crate::grid::GridPlan;
use crate::layout;
use crate::manifest;
use crate::qr;
use crate::song::{self, Song};
use crate::tools::{check_dependency, check_ffmpeg_version, check_tool_installation};
use anyhow::{Context, Result, bail};
use comfy_table::{Table, presets::UTF8_FULL};
use std::{fs, io};
use tracing::info;

pub fn run(args: Args) -> Result<()> {
    // Handle --check-tools command
    if args.check_tools {
        return handle_tools_check();
    }

    let songlist = args
        .songlist
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("<SONGLIST> is required"))?;
    let outfile = args
        .outfile
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("<OUTFILE> is required"))?;
    if songlist == outfile {
        bail!("Song list and output file cannot be the same.");
    }

    let songs = song::read_song_list(songlist)?;
    if songs.is_empty() {
        bail!("Song list {} contains no songs.", songlist.display());
    }

    // Calculate the grid size for the amount of songs in the list; overflow
    // spills into further grids and the rest is padded with empty cells.
    let plan = GridPlan::for_count(songs.len(), args.max_grid);
    info!(
        "generating {} grids with size {}x{}",
        plan.grids, plan.size, plan.size
    );

    // --- User Confirmation ---
    let mut table = Table::new();
    table
        .set_header(vec!["#", "Title", "Artist", "Year", "Audio"])
        .load_preset(UTF8_FULL);
    for (i, song) in songs.iter().enumerate() {
        let audio = if args.skip_download {
            "skipped"
        } else if audio_path(&args.songs_dir, &song.hash()).is_file() {
            "cached"
        } else {
            "download"
        };
        table.add_row(vec![
            (i + 1).to_string(),
            song.title.clone(),
            song.artist.clone(),
            song.year.clone(),
            audio.to_string(),
        ]);
    }
    println!("\n▶️ Song List:");
    println!("{table}");

    let mut info_table = Table::new();
    info_table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Parameter", "Value"]);
    info_table
        .add_row(vec!["Song List", &songlist.display().to_string()])
        .add_row(vec!["Output File", &outfile.display().to_string()])
        .add_row(vec!["Template", &args.template.display().to_string()])
        .add_row(vec!["Base URL", &args.base_url])
        .add_row(vec!["Songs", &songs.len().to_string()])
        .add_row(vec!["Grid", &format!("{0}x{0}", plan.size)])
        .add_row(vec![
            "Pages",
            &format!("{} front + {} back", plan.grids, plan.grids),
        ]);
    println!("\n▶️ Job Details:");
    println!("{info_table}");

    if args.yes {
        println!("\n--yes flag provided, proceeding without confirmation.");
    } else {
        println!("\nProceed with this plan? [y/N]");
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Aborting operation.");
            return Ok(());
        }
    }

    // 1. Download and trim all songs
    if !args.skip_download {
        check_dependency("yt-dlp", "--version")?;
        check_ffmpeg_version(args.ignore_tool_versions)?;
        fs::create_dir_all(&args.songs_dir)?;
        for song in &songs {
            download_song(song, &args.songs_dir, args.debug)?;
        }
    }

    // 2. Generate QR codes, skip-if-exists like the audio files
    fs::create_dir_all(&args.pics_dir)?;
    for song in &songs {
        let path = qr::qr_path(&args.pics_dir, &song.hash());
        if qr::ensure_qr_png(&qr::audio_url(&args.base_url, &song.hash()), &path)? {
            info!("generated QR code for {} - {}", song.artist, song.title);
        }
    }

    // Optionally write the manifest to a file
    if let Some(write_manifest) = &args.write_manifest {
        let out_path = if let Some(path) = write_manifest {
            path.clone()
        } else {
            // Use the output file path with extension replaced by .json
            let mut out = outfile.clone();
            out.set_extension("json");
            out
        };
        manifest::write(&out_path, &songs, &args.base_url)?;
        println!("✅ Wrote manifest to {}", out_path.display());
    }

    // 3. Pad to full grids and render the document
    let mut padded = songs.clone();
    padded.resize(plan.total_cells(), Song::default());
    let pics_dir = args.pics_dir.display().to_string();
    let pages = layout::render_pages(&padded, plan, &pics_dir);
    let template = fs::read_to_string(&args.template)
        .with_context(|| format!("cannot read template {}", args.template.display()))?;
    let document = layout::render_document(&template, &pages)?;
    fs::write(outfile, document)
        .with_context(|| format!("cannot write {}", outfile.display()))?;

    println!(
        "✅ Processing complete! Wrote {} cards to {}",
        songs.len(),
        outfile.display()
    );
    Ok(())
}

fn handle_tools_check() -> Result<()> {
    println!("🔍 Checking external tools...\n");

    let check_result = check_tool_installation();

    // Display ffmpeg status
    if check_result.ffmpeg_available {
        if let Some(version_info) = &check_result.ffmpeg_version {
            println!("✅ ffmpeg found:");
            println!(
                "   Version: {}.{}.{}",
                version_info.major, version_info.minor, version_info.patch
            );

            if version_info.is_compatible {
                println!("   Status: ✅ Compatible (minimum required: 4.0.0)");
            } else {
                println!("   Status: ❌ Too old (minimum required: 4.0.0)");
            }
        } else {
            println!("⚠️  Could not parse ffmpeg version from output");
        }
    } else if let Some(error) = &check_result.error {
        println!("❌ ffmpeg not found in PATH");
        println!("   Please install ffmpeg and ensure it's accessible from the command line");
        bail!("ffmpeg is required but not installed: {}", error);
    }

    println!();

    // Display yt-dlp status
    if check_result.ytdlp_available {
        match &check_result.ytdlp_version {
            Some(version) => println!("✅ yt-dlp found (release {})", version),
            None => println!("✅ yt-dlp found"),
        }
    } else {
        println!("❌ yt-dlp not found in PATH");
        bail!("yt-dlp is required but not installed");
    }

    println!("\n🎉 Tool check complete!");
    Ok(())
}
