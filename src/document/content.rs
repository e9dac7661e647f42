//! Encodes an [`OverlayPage`] as a PDF content stream.

use std::fmt::Write as _;

use super::fonts::{encode_win_ansi, FontSet};
use super::layout::OverlayPage;

/// Escape WinAnsi bytes for a PDF literal string.
pub fn escape_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7E => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}

pub fn encode_page(page: &OverlayPage, fonts: &FontSet) -> Vec<u8> {
    let mut ops = String::from("0 g\n");
    for run in &page.runs {
        let face = fonts.face(run.weight);
        let _ = writeln!(
            ops,
            "BT /{} {:.1} Tf 1 0 0 1 {:.2} {:.2} Tm ({}) Tj ET",
            face.resource_name(),
            run.size,
            run.x,
            run.y,
            escape_literal(&encode_win_ansi(&run.text))
        );
    }
    ops.into_bytes()
}
