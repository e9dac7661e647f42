//! Fonts used on the overlay page.
//!
//! The brand TrueType fonts are embedded when present in the fonts directory.
//! A missing or unreadable font file falls back to the matching built-in
//! Helvetica face; this is logged, never raised.

use std::path::Path;
use std::sync::Arc;

use lopdf::{dictionary, Document, Object, ObjectId, Stream};

pub const REGULAR_FONT_FILE: &str = "OpenSauceSans-Regular.ttf";
pub const BOLD_FONT_FILE: &str = "OpenSauceSans-Bold.ttf";

const FIRST_CHAR: u8 = 32;
const LAST_CHAR: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for ASCII 32..=126, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// WinAnsi code points 0x80..=0x9F that differ from Latin-1.
const WIN_ANSI_EXTRAS: &[(char, u8)] = &[
    ('€', 0x80),
    ('…', 0x85),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('™', 0x99),
];

/// Encode `text` as WinAnsi bytes; unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if (0x20..=0x7E).contains(&code) || (0xA0..=0xFF).contains(&code) {
                code as u8
            } else {
                WIN_ANSI_EXTRAS
                    .iter()
                    .find(|(ch, _)| *ch == c)
                    .map(|(_, b)| *b)
                    .unwrap_or(b'?')
            }
        })
        .collect()
}

fn decode_win_ansi(byte: u8) -> Option<char> {
    match byte {
        0x20..=0x7E | 0xA0..=0xFF => char::from_u32(byte as u32),
        _ => WIN_ANSI_EXTRAS
            .iter()
            .find(|(_, b)| *b == byte)
            .map(|(c, _)| *c),
    }
}

/// ASCII letter a Latin-1 accented letter is drawn like, for width lookup.
fn ascii_base(c: char) -> Option<char> {
    let base = match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' | 'ª' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' | 'º' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        '¡' => '!',
        '¿' => '?',
        '\u{A0}' => ' ',
        _ => return None,
    };
    Some(base)
}

fn standard_widths(ascii: &[u16; 95]) -> Vec<u16> {
    (FIRST_CHAR..=LAST_CHAR)
        .map(|code| {
            let c = decode_win_ansi(code).unwrap_or(' ');
            let lookup = if c.is_ascii() { Some(c) } else { ascii_base(c) };
            lookup
                .filter(|c| (' '..='~').contains(c))
                .map(|c| ascii[(c as u8 - FIRST_CHAR) as usize])
                .unwrap_or(556)
        })
        .collect()
}

#[derive(Debug, Clone)]
struct EmbeddedMetrics {
    base_font: String,
    bbox: [i64; 4],
    ascent: i64,
    descent: i64,
    cap_height: i64,
}

#[derive(Debug, Clone)]
enum FontSource {
    Standard { base_font: &'static str },
    TrueType {
        data: Arc<Vec<u8>>,
        metrics: EmbeddedMetrics,
    },
}

/// A font ready to be measured and embedded.
#[derive(Debug, Clone)]
pub struct FontFace {
    resource_name: &'static str,
    source: FontSource,
    /// Widths for WinAnsi codes FIRST_CHAR..=LAST_CHAR, in 1/1000 em.
    widths: Vec<u16>,
}

impl FontFace {
    pub fn helvetica(weight: FontWeight) -> Self {
        match weight {
            FontWeight::Regular => Self {
                resource_name: "FOvRegular",
                source: FontSource::Standard {
                    base_font: "Helvetica",
                },
                widths: standard_widths(&HELVETICA_WIDTHS),
            },
            FontWeight::Bold => Self {
                resource_name: "FOvBold",
                source: FontSource::Standard {
                    base_font: "Helvetica-Bold",
                },
                widths: standard_widths(&HELVETICA_BOLD_WIDTHS),
            },
        }
    }

    /// Parse a TrueType file. Returns a description of the problem on failure.
    pub fn truetype(weight: FontWeight, path: &Path) -> Result<Self, String> {
        let data = std::fs::read(path).map_err(|e| e.to_string())?;
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| e.to_string())?;

        let units_per_em = face.units_per_em().max(1) as f32;
        let scale = |v: i16| ((v as f32) * 1000.0 / units_per_em).round() as i64;

        let widths = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| {
                decode_win_ansi(code)
                    .and_then(|c| face.glyph_index(c))
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(|adv| ((adv as f32) * 1000.0 / units_per_em).round() as u16)
                    .unwrap_or(0)
            })
            .collect();

        let bbox = face.global_bounding_box();
        let base_font = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("EmbeddedFont")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect::<String>();

        let metrics = EmbeddedMetrics {
            base_font,
            bbox: [
                scale(bbox.x_min),
                scale(bbox.y_min),
                scale(bbox.x_max),
                scale(bbox.y_max),
            ],
            ascent: scale(face.ascender()),
            descent: scale(face.descender()),
            cap_height: scale(face.capital_height().unwrap_or(face.ascender())),
        };
        drop(face);

        let resource_name = match weight {
            FontWeight::Regular => "FOvRegular",
            FontWeight::Bold => "FOvBold",
        };

        Ok(Self {
            resource_name,
            source: FontSource::TrueType {
                data: Arc::new(data),
                metrics,
            },
            widths,
        })
    }

    /// Name under which the font is registered in the page resources.
    pub fn resource_name(&self) -> &'static str {
        self.resource_name
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.source, FontSource::TrueType { .. })
    }

    /// Width of `text` at `size` points.
    pub fn width_of(&self, text: &str, size: f32) -> f32 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|b| {
                b.checked_sub(FIRST_CHAR)
                    .and_then(|i| self.widths.get(i as usize))
                    .copied()
                    .unwrap_or(0) as u32
            })
            .sum();
        units as f32 * size / 1000.0
    }

    /// Add the font objects to `doc` and return the font dictionary id.
    pub fn add_to(&self, doc: &mut Document) -> ObjectId {
        match &self.source {
            FontSource::Standard { base_font } => doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => *base_font,
                "Encoding" => "WinAnsiEncoding",
            }),
            FontSource::TrueType { data, metrics } => {
                let file_id = doc.add_object(Stream::new(
                    dictionary! { "Length1" => Object::Integer(data.len() as i64) },
                    data.as_ref().clone(),
                ));
                let descriptor_id = doc.add_object(dictionary! {
                    "Type" => "FontDescriptor",
                    "FontName" => Object::Name(metrics.base_font.clone().into_bytes()),
                    "Flags" => Object::Integer(32),
                    "FontBBox" => metrics.bbox.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
                    "ItalicAngle" => Object::Integer(0),
                    "Ascent" => Object::Integer(metrics.ascent),
                    "Descent" => Object::Integer(metrics.descent),
                    "CapHeight" => Object::Integer(metrics.cap_height),
                    "StemV" => Object::Integer(80),
                    "FontFile2" => Object::Reference(file_id),
                });
                doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "TrueType",
                    "BaseFont" => Object::Name(metrics.base_font.clone().into_bytes()),
                    "FirstChar" => Object::Integer(FIRST_CHAR as i64),
                    "LastChar" => Object::Integer(LAST_CHAR as i64),
                    "Widths" => self.widths.iter().map(|w| Object::Integer(*w as i64)).collect::<Vec<_>>(),
                    "FontDescriptor" => Object::Reference(descriptor_id),
                    "Encoding" => "WinAnsiEncoding",
                })
            }
        }
    }
}

/// The two weights used on the overlay.
#[derive(Debug, Clone)]
pub struct FontSet {
    pub regular: FontFace,
    pub bold: FontFace,
}

impl Default for FontSet {
    fn default() -> Self {
        Self {
            regular: FontFace::helvetica(FontWeight::Regular),
            bold: FontFace::helvetica(FontWeight::Bold),
        }
    }
}

impl FontSet {
    /// Load the brand fonts from `dir`, falling back per weight.
    pub fn load(dir: &Path) -> Self {
        Self {
            regular: load_or_fallback(dir, REGULAR_FONT_FILE, FontWeight::Regular),
            bold: load_or_fallback(dir, BOLD_FONT_FILE, FontWeight::Bold),
        }
    }

    pub fn face(&self, weight: FontWeight) -> &FontFace {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

fn load_or_fallback(dir: &Path, file: &str, weight: FontWeight) -> FontFace {
    let path = dir.join(file);
    if !path.exists() {
        log::warn!(
            "Font '{}' not found, using Helvetica instead",
            path.display()
        );
        return FontFace::helvetica(weight);
    }

    match FontFace::truetype(weight, &path) {
        Ok(face) => {
            log::info!("Loaded font '{}'", path.display());
            face
        }
        Err(e) => {
            log::warn!(
                "Font '{}' could not be loaded ({}), using Helvetica instead",
                path.display(),
                e
            );
            FontFace::helvetica(weight)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_keeps_spanish_letters() {
        assert_eq!(encode_win_ansi("Ñá"), vec![0xD1, 0xE1]);
        assert_eq!(encode_win_ansi("€"), vec![0x80]);
        assert_eq!(encode_win_ansi("漢"), vec![b'?']);
    }

    #[test]
    fn test_helvetica_widths() {
        let regular = FontFace::helvetica(FontWeight::Regular);
        // "AB" = 667 + 667 units
        assert!((regular.width_of("AB", 10.0) - 13.34).abs() < 1e-3);
        // accented letters measure like their base letter
        assert_eq!(regular.width_of("é", 10.0), regular.width_of("e", 10.0));

        let bold = FontFace::helvetica(FontWeight::Bold);
        assert!(bold.width_of("abc", 10.0) > regular.width_of("abc", 10.0));
    }

    #[test]
    fn test_missing_fonts_fall_back_to_helvetica() {
        let fonts = FontSet::load(Path::new("/nonexistent/fonts"));
        assert!(!fonts.regular.is_embedded());
        assert!(!fonts.bold.is_embedded());
        assert_eq!(fonts.bold.resource_name(), "FOvBold");
    }

    #[test]
    fn test_unparsable_font_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(REGULAR_FONT_FILE), b"not a font").unwrap();
        let fonts = FontSet::load(dir.path());
        assert!(!fonts.regular.is_embedded());
    }
}
