use std::{path::Path, sync::Arc};

/// Build the font database used for text overlays: system fonts plus any
/// `.ttf`/`.otf`/`.ttc` files found directly inside `font_dirs`.
#[tracing::instrument(skip_all, fields(dirs = font_dirs.len()))]
pub fn build_font_db<P: AsRef<Path>>(font_dirs: &[P]) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    for dir in font_dirs {
        load_fonts_from_dir(&mut db, dir.as_ref());
    }

    tracing::debug!(faces = db.len(), "font database ready");
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(font = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

/// Generic faces tried, in order, after the requested families.
pub const FALLBACK_FAMILIES: [usvg::fontdb::Family<'static>; 3] = [
    usvg::fontdb::Family::SansSerif,
    usvg::fontdb::Family::Serif,
    usvg::fontdb::Family::Monospace,
];

/// Resolve requested families against the database, then [`FALLBACK_FAMILIES`], then any face.
///
/// Overlays only set family, weight and style, so stretch is always normal.
pub fn font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let families: Vec<_> = font
                .families()
                .iter()
                .map(db_family)
                .chain(FALLBACK_FAMILIES)
                .collect();
            let style = if matches!(font.style(), usvg::FontStyle::Normal) {
                usvg::fontdb::Style::Normal
            } else {
                usvg::fontdb::Style::Italic
            };
            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

fn db_family(family: &usvg::FontFamily) -> usvg::fontdb::Family<'_> {
    match family {
        usvg::FontFamily::Named(name) => usvg::fontdb::Family::Name(name.as_str()),
        usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
        usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
        usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
        usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
        usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
