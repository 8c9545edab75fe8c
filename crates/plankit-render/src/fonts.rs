//! System font lookup for raster text.
//!
//! Queries the system font database once for a sans-serif face (regular and
//! bold). Machines without usable fonts degrade to geometry-only rendering:
//! every caller receives `None` and a warning is logged once.

use std::fs;
use std::sync::OnceLock;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::Font;
use tracing::warn;

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}

fn load_sans(weight: Weight) -> Option<Font<'static>> {
    let query = Query {
        families: &[Family::SansSerif],
        weight,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let id = db().query(&query)?;
    let face = db().face(id)?;
    match &face.source {
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::Binary(bytes) => Font::try_from_vec(bytes.as_ref().as_ref().to_vec()),
    }
}

/// Regular sans-serif face, if the system has one.
pub fn sans() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font = load_sans(Weight::NORMAL);
        if font.is_none() {
            warn!("no system sans-serif font found, text layers will be skipped");
        }
        font
    })
    .as_ref()
}

/// Bold sans-serif face; falls back to the regular face.
pub fn sans_bold() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| load_sans(Weight::BOLD))
        .as_ref()
        .or_else(sans)
}
