//! Plain-text rendering for the command line.

use std::fmt::Write;

use crate::model::{ArtworkDetail, Department, GeoCapital};

const ARTIST_WIDTH: usize = 28;
const TITLE_WIDTH: usize = 40;
const DATE_WIDTH: usize = 16;

/// `-` for missing or blank values.
pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}

/// Cut to `max_len` characters, marking the cut with `...`.
pub fn truncate(value: &str, max_len: usize) -> String {
    if value.chars().count() <= max_len {
        value.to_string()
    } else {
        let head: String = value.chars().take(max_len).collect();
        format!("{}...", head)
    }
}

/// `"the MET collection"` -> `"The Met Collection"`.
pub fn capitalize_words(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn cell(value: Option<&str>, width: usize) -> String {
    // Leave room for the ellipsis
    truncate(or_dash(value), width.saturating_sub(3))
}

pub fn departments_table(departments: &[Department]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {}", "ID", "DEPARTMENT");
    let _ = writeln!(out, "{}", "-".repeat(48));
    for department in departments {
        let _ = writeln!(out, "{:<6} {}", department.id, department.display_name);
    }
    out
}

pub fn artworks_table(artworks: &[ArtworkDetail]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<9} {:<w_a$} {:<w_t$} {:<w_d$}",
        "ID",
        "ARTIST",
        "TITLE",
        "DATE",
        w_a = ARTIST_WIDTH,
        w_t = TITLE_WIDTH,
        w_d = DATE_WIDTH
    );
    let _ = writeln!(out, "{}", "-".repeat(9 + ARTIST_WIDTH + TITLE_WIDTH + DATE_WIDTH + 3));

    for artwork in artworks {
        let _ = writeln!(
            out,
            "{:<9} {:<w_a$} {:<w_t$} {:<w_d$}",
            artwork.object_id,
            cell(artwork.artist_display_name.as_deref(), ARTIST_WIDTH),
            cell(artwork.title.as_deref(), TITLE_WIDTH),
            cell(artwork.object_date.as_deref(), DATE_WIDTH),
            w_a = ARTIST_WIDTH,
            w_t = TITLE_WIDTH,
            w_d = DATE_WIDTH
        );
    }
    out
}

/// Location line from the geography fields that are set.
fn place(artwork: &ArtworkDetail) -> Option<String> {
    let parts: Vec<&str> = [
        &artwork.city,
        &artwork.state,
        &artwork.county,
        &artwork.country,
        &artwork.region,
    ]
    .into_iter()
    .filter_map(|v| v.as_deref())
    .filter(|v| !v.trim().is_empty())
    .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}

pub fn artwork_detail(artwork: &ArtworkDetail) -> String {
    let mut out = String::new();

    let title = or_dash(artwork.title.as_deref());
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count().min(72)));

    let mut artist = or_dash(artwork.artist_display_name.as_deref()).to_string();
    if let Some(nationality) = artwork.artist_nationality.as_deref().filter(|n| !n.trim().is_empty()) {
        let _ = write!(artist, ", {}", nationality);
    }
    if let Some(lifespan) = artwork.artist_lifespan() {
        let _ = write!(artist, " ({})", lifespan);
    }

    let place = place(artwork);
    let classification = artwork.classification.as_deref().map(capitalize_words);
    let fields: [(&str, Option<&str>); 10] = [
        ("Artist", Some(artist.as_str())),
        ("Date", artwork.object_date.as_deref()),
        ("Medium", artwork.medium.as_deref()),
        ("Dimensions", artwork.dimensions.as_deref()),
        ("Classification", classification.as_deref()),
        ("Place", place.as_deref()),
        ("Gallery", artwork.gallery_number.as_deref()),
        ("Credit", artwork.credit_line.as_deref()),
        ("Image", artwork.high_res_image_url()),
        ("Link", artwork.object_url.as_deref()),
    ];
    for (label, value) in fields {
        let _ = writeln!(out, "{:<15} {}", format!("{}:", label), or_dash(value));
    }

    if let Some(tags) = artwork.tags.as_ref().filter(|t| !t.is_empty()) {
        let terms: Vec<&str> = tags.iter().map(|t| t.term.as_str()).collect();
        let _ = writeln!(out, "{:<15} {}", "Tags:", terms.join(", "));
    }
    if artwork.is_highlight == Some(true) {
        let _ = writeln!(out, "{:<15} {}", "Highlight:", "yes");
    }

    out
}

pub fn capitals_table(capitals: &[GeoCapital]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<4} {:<12} {:<12} {:>9} {:>9}", "CODE", "CAPITAL", "COUNTRY", "LAT", "LON");
    let _ = writeln!(out, "{}", "-".repeat(50));
    for c in capitals {
        let _ = writeln!(
            out,
            "{:<4} {:<12} {:<12} {:>9.4} {:>9.4}",
            c.country_code, c.capital, c.country, c.latitude, c.longitude
        );
    }
    out
}
