use crate::grid::{self, CELL_SIZE, grid_pos, mirror_rows};
use crate::song::Song;
use anyhow::{Result, bail};

/// Text width of a card front, slightly narrower than the cell.
const TEXT_WIDTH: &str = "4cm";
/// Printed width of a QR code on a card back.
const QR_WIDTH: &str = "3.8cm";
/// Grid width relative to \linewidth.
const GRID_WIDTH: &str = "1";

/// Marker in template.tex (and in the grid skeleton) that gets substituted
/// with generated content.
const MARKER: &str = "\\replaceme";

/// Escape characters that would break pdflatex. Not a complete filter, but
/// covers what shows up in song metadata.
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("\\&"),
            '%' => escaped.push_str("\\%"),
            '#' => escaped.push_str("\\#"),
            '_' => escaped.push_str("\\_"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Card front: title, year in huge type, artist, album when present.
fn text_node(song: &Song, x: usize, y: usize) -> String {
    let content = if song.is_placeholder() {
        "Empty".to_string()
    } else {
        let album = if song.album.is_empty() {
            String::new()
        } else {
            format!(" \\\\[1em] {}", escape_latex(&song.album))
        };
        format!(
            "{} \\\\[1em] {{\\Huge {}}} \\\\[1em] {}{}",
            escape_latex(&song.title),
            escape_latex(&song.year),
            escape_latex(&song.artist),
            album
        )
    };
    format!(
        "\\node[text width={}, align=center] at ({},{}) {{{}}};",
        TEXT_WIDTH, x, y, content
    )
}

/// Card back: the QR code image generated for this song.
fn qr_node(song: &Song, x: usize, y: usize, pics_dir: &str) -> String {
    let content = if song.is_placeholder() {
        "Empty".to_string()
    } else {
        format!(
            "\\includegraphics[width={}]{{{}/{}.png}}",
            QR_WIDTH,
            pics_dir,
            song.hash()
        )
    };
    format!("\\node[align=center] at ({},{}) {{{}}};", x, y, content)
}

/// One tikzpicture page, scaled to the line width so any grid size fits.
fn grid_page(nodes: &[String], size: usize) -> String {
    let span = size * CELL_SIZE;
    let skeleton = format!(
        "\\resizebox{{{GRID_WIDTH}\\linewidth}}{{!}}{{\n    \\begin{{tikzpicture}}\n        \\draw[step={CELL_SIZE}.0,black,thin] (0,0) grid ({span},{span});\n        {MARKER}\n    \\end{{tikzpicture}}\n}}\n"
    );
    skeleton.replace(MARKER, &nodes.join("\n        "))
}

/// Front page plus mirrored QR back page for one grid of songs.
/// `songs` must hold exactly size^2 records (padded with placeholders).
pub fn render_grid(songs: &[Song], size: usize, pics_dir: &str) -> String {
    debug_assert_eq!(songs.len(), size * size);

    let fronts: Vec<String> = songs
        .iter()
        .enumerate()
        .map(|(i, song)| {
            let (x, y) = grid_pos(i, size);
            text_node(song, x, y)
        })
        .collect();

    // Mirrored so each code lands behind its card text when printed
    // double-sided along the long edge.
    let backs: Vec<String> = mirror_rows(songs, size)
        .iter()
        .enumerate()
        .map(|(i, song)| {
            let (x, y) = grid_pos(i, size);
            qr_node(song, x, y, pics_dir)
        })
        .collect();

    format!(
        "{}\n\\pagebreak\n\n{}\n\\pagebreak\n\n",
        grid_page(&fronts, size),
        grid_page(&backs, size)
    )
}

/// All grid pages for a padded song list.
pub fn render_pages(songs: &[Song], plan: grid::GridPlan, pics_dir: &str) -> String {
    songs
        .chunks(plan.cells)
        .map(|chunk| render_grid(chunk, plan.size, pics_dir))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitute the generated pages into the document template.
pub fn render_document(template: &str, pages: &str) -> Result<String> {
    if !template.contains(MARKER) {
        bail!("template has no {} marker", MARKER);
    }
    Ok(template.replace(MARKER, pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridPlan;

    fn song(title: &str, artist: &str, album: &str, year: &str) -> Song {
        Song {
            title: title.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            year: year.to_string(),
            ..Song::default()
        }
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_latex("Me & You"), "Me \\& You");
        assert_eq!(escape_latex("100% #1_hit"), "100\\% \\#1\\_hit");
        assert_eq!(escape_latex("plain"), "plain");
    }

    #[test]
    fn text_node_includes_album_when_present() {
        let with_album = text_node(&song("T", "A", "L", "1999"), 2, 2);
        assert!(with_album.contains("T \\\\[1em] {\\Huge 1999} \\\\[1em] A \\\\[1em] L"));
        assert!(with_album.contains("at (2,2)"));

        let without = text_node(&song("T", "A", "", "1999"), 2, 2);
        assert!(without.ends_with("{T \\\\[1em] {\\Huge 1999} \\\\[1em] A};"));
    }

    #[test]
    fn placeholder_cells_render_empty() {
        let node = text_node(&Song::default(), 6, 2);
        assert_eq!(node, "\\node[text width=4cm, align=center] at (6,2) {Empty};");
        let node = qr_node(&Song::default(), 6, 2, "pics");
        assert_eq!(node, "\\node[align=center] at (6,2) {Empty};");
    }

    #[test]
    fn qr_node_references_hashed_image() {
        let s = song("T", "A", "L", "1999");
        let node = qr_node(&s, 2, 6, "pics");
        assert!(node.contains(&format!("\\includegraphics[width=3.8cm]{{pics/{}.png}}", s.hash())));
    }

    #[test]
    fn grid_page_spans_the_whole_grid() {
        let page = grid_page(&["\\node;".to_string()], 2);
        assert!(page.contains("grid (8,8)"));
        assert!(page.contains("\\begin{tikzpicture}"));
        assert!(!page.contains("\\replaceme"));
    }

    #[test]
    fn back_page_is_mirrored() {
        // 2x2 grid: front order a b / c d, back order b a / d c.
        let songs = vec![
            song("a", "x", "", "1"),
            song("b", "x", "", "1"),
            song("c", "x", "", "1"),
            song("d", "x", "", "1"),
        ];
        let rendered = render_grid(&songs, 2, "pics");
        let back = rendered.split("\\pagebreak").nth(1).unwrap();
        let b_pos = back.find(&songs[1].hash()).unwrap();
        let a_pos = back.find(&songs[0].hash()).unwrap();
        assert!(b_pos < a_pos);
        // First back cell sits at the origin cell center.
        assert!(back.contains(&format!("at (2,2) {{\\includegraphics[width=3.8cm]{{pics/{}.png}}}}", songs[1].hash())));
    }

    #[test]
    fn pages_chunk_by_grid() {
        let songs: Vec<Song> = (0..8)
            .map(|i| song(&format!("t{}", i), "a", "", "2000"))
            .collect();
        let plan = GridPlan::for_count(songs.len(), 2);
        let mut padded = songs.clone();
        padded.resize(plan.total_cells(), Song::default());
        let pages = render_pages(&padded, plan, "pics");
        assert_eq!(pages.matches("\\pagebreak").count(), plan.grids * 2);
    }

    #[test]
    fn document_substitution() {
        let template = "\\begin{document}\n\\replaceme\n\\end{document}";
        let doc = render_document(template, "PAGES").unwrap();
        assert_eq!(doc, "\\begin{document}\nPAGES\n\\end{document}");
        assert!(render_document("\\begin{document}", "PAGES").is_err());
    }
}
