//! Positions every field of the overlay page.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of a
//! US Letter page. Nothing here touches PDF objects; [`compose`] only returns
//! the text runs to draw.

use chrono::NaiveDate;

use super::fonts::{FontSet, FontWeight};
use crate::request::totals::{format_amount, format_cost};
use crate::request::{PaymentRequest, SalesRep};

const HEADER_SIZE: f32 = 7.0;
const IDENTIFIER_POS: (f32, f32) = (525.0, 669.0);
const DATE_POS: (f32, f32) = (510.0, 660.0);

const REP_SIZE: f32 = 8.0;
const REP_X: f32 = 300.0;
const REP_NAME_Y: f32 = 130.0;
const REP_PHONE_Y: f32 = 120.0;
const REP_EMAIL_Y: f32 = 110.0;

pub const CLIENT_SIZE: f32 = 10.0;
pub const CLIENT_X: f32 = 118.0;
pub const CLIENT_Y: f32 = 570.0;
pub const CLIENT_MAX_WIDTH: f32 = 170.0;
pub const LINE_STEP: f32 = 12.0;
pub const CUSTOMER_NAME_Y: f32 = 558.0;
pub const CUSTOMER_PHONE_Y: f32 = 546.0;
pub const CUSTOMER_EMAIL_Y: f32 = 534.0;

const SUMMARY_X: f32 = 300.0;
const SERVICES_Y: f32 = 570.0;
const OPERATION_Y: f32 = 558.0;
const REFERENCE_Y: f32 = 546.0;
const CONTAINERS_Y: f32 = 534.0;

pub const TABLE_X: f32 = 100.0;
pub const TABLE_TOP: f32 = 460.0;
pub const TABLE_COLUMN_WIDTHS: [f32; 4] = [80.0, 200.0, 5.0, 160.0];
const TABLE_SIZE: f32 = 9.0;
const TABLE_PADDING_TOP: f32 = 3.0;
const TABLE_PADDING_BOTTOM: f32 = 5.0;
pub const TABLE_ROW_HEIGHT: f32 = TABLE_SIZE * 1.2 + TABLE_PADDING_TOP + TABLE_PADDING_BOTTOM;

const TOTAL_SIZE: f32 = 9.0;
pub const TOTAL_POS: (f32, f32) = (395.0, 240.0);

const FOOTER_SIZE: f32 = 8.0;
const FOOTER_X: f32 = 115.0;
const FOOTER_Y: f32 = 190.0;
const FOOTER_STEP: f32 = 10.0;

pub const DISCLAIMERS: [&str; 3] = [
    "* Precios no incluyen IVA y están sujetos al mismo.",
    "* Los pagos en dólares se realizan a la TRM del día del pago a la línea +2%",
    "* (El día de la facturación se coloca la TRM a la que se realiza el pago).",
];

/// A single string drawn at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub weight: FontWeight,
    pub size: f32,
    pub text: String,
}

/// Everything drawn on one overlay page.
#[derive(Debug, Clone, Default)]
pub struct OverlayPage {
    pub runs: Vec<TextRun>,
}

impl OverlayPage {
    fn text(&mut self, x: f32, y: f32, weight: FontWeight, size: f32, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        self.runs.push(TextRun {
            x,
            y,
            weight,
            size,
            text,
        });
    }

    /// First run whose text equals `text`.
    pub fn find(&self, text: &str) -> Option<&TextRun> {
        self.runs.iter().find(|run| run.text == text)
    }
}

/// Greedy word wrap. A single word wider than `max_width` gets its own line.
pub fn wrap_text(
    text: &str,
    fonts: &FontSet,
    weight: FontWeight,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let face = fonts.face(weight);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if face.width_of(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Extra vertical space taken by wrapped lines beyond the first.
pub fn wrap_shift(line_count: usize) -> f32 {
    line_count.saturating_sub(1) as f32 * LINE_STEP
}

/// Lay out the overlay page for `request`.
pub fn compose(
    request: &PaymentRequest,
    rep: &SalesRep,
    date: NaiveDate,
    total: &str,
    fonts: &FontSet,
) -> OverlayPage {
    let mut page = OverlayPage::default();

    draw_header(&mut page, request, date);
    draw_rep(&mut page, rep, fonts);
    draw_customer(&mut page, request, fonts);
    draw_summary(&mut page, request);
    draw_surcharge_table(&mut page, request, fonts);
    draw_footer(&mut page, request, total);

    page
}

fn draw_header(page: &mut OverlayPage, request: &PaymentRequest, date: NaiveDate) {
    let (x, y) = IDENTIFIER_POS;
    page.text(
        x,
        y,
        FontWeight::Bold,
        HEADER_SIZE,
        request.operation_number.trim().to_uppercase(),
    );
    let (x, y) = DATE_POS;
    page.text(
        x,
        y,
        FontWeight::Bold,
        HEADER_SIZE,
        date.format("%d/%m/%Y").to_string(),
    );
}

fn draw_rep(page: &mut OverlayPage, rep: &SalesRep, fonts: &FontSet) {
    let name = format!("{}.  ", rep.name.to_uppercase());
    let name_width = fonts.bold.width_of(&name, REP_SIZE);
    page.text(REP_X, REP_NAME_Y, FontWeight::Bold, REP_SIZE, name);
    page.text(
        REP_X + name_width,
        REP_NAME_Y,
        FontWeight::Regular,
        REP_SIZE,
        rep.title.to_uppercase(),
    );
    page.text(
        REP_X,
        REP_PHONE_Y,
        FontWeight::Regular,
        REP_SIZE,
        rep.phone.to_uppercase(),
    );
    page.text(
        REP_X,
        REP_EMAIL_Y,
        FontWeight::Regular,
        REP_SIZE,
        rep.email.to_uppercase(),
    );
}

fn draw_customer(page: &mut OverlayPage, request: &PaymentRequest, fonts: &FontSet) {
    let client = request.client.trim().to_uppercase();
    let lines = wrap_text(
        &client,
        fonts,
        FontWeight::Bold,
        CLIENT_SIZE,
        CLIENT_MAX_WIDTH,
    );
    for (i, line) in lines.iter().enumerate() {
        page.text(
            CLIENT_X,
            CLIENT_Y - i as f32 * LINE_STEP,
            FontWeight::Bold,
            CLIENT_SIZE,
            line.as_str(),
        );
    }

    let shift = wrap_shift(lines.len());
    page.text(
        CLIENT_X,
        CUSTOMER_NAME_Y - shift,
        FontWeight::Bold,
        CLIENT_SIZE,
        request.customer_name.trim().to_uppercase(),
    );
    page.text(
        CLIENT_X,
        CUSTOMER_PHONE_Y - shift,
        FontWeight::Regular,
        CLIENT_SIZE,
        request.customer_phone.trim().to_uppercase(),
    );
    // Email addresses are printed as typed.
    page.text(
        CLIENT_X,
        CUSTOMER_EMAIL_Y - shift,
        FontWeight::Regular,
        CLIENT_SIZE,
        request.customer_email.trim(),
    );
}

fn draw_summary(page: &mut OverlayPage, request: &PaymentRequest) {
    page.text(
        SUMMARY_X,
        SERVICES_Y,
        FontWeight::Regular,
        CLIENT_SIZE,
        request.service_types.join(", "),
    );
    page.text(
        SUMMARY_X,
        OPERATION_Y,
        FontWeight::Regular,
        CLIENT_SIZE,
        format!("Tipo de Operación: {}", request.operation_type.trim()),
    );
    let reference = request.reference_text();
    if !reference.is_empty() {
        page.text(
            SUMMARY_X,
            REFERENCE_Y,
            FontWeight::Regular,
            CLIENT_SIZE,
            format!("Referencia de cliente: {}", reference),
        );
    }
    page.text(
        SUMMARY_X,
        CONTAINERS_Y,
        FontWeight::Regular,
        CLIENT_SIZE,
        request.container_types.join(", "),
    );
}

/// One row per surcharge: concept, currency, container group, cost.
/// Cells are centred in their column.
fn draw_surcharge_table(page: &mut OverlayPage, request: &PaymentRequest, fonts: &FontSet) {
    let face = fonts.face(FontWeight::Regular);

    for (row, (container, surcharge)) in request.all_surcharges().enumerate() {
        let baseline = TABLE_TOP - row as f32 * TABLE_ROW_HEIGHT - TABLE_PADDING_TOP - TABLE_SIZE;
        let cells = [
            surcharge.concept.trim().to_string(),
            surcharge.currency.trim().to_uppercase(),
            container.to_string(),
            format_cost(surcharge.cost, &surcharge.currency),
        ];

        let mut left = TABLE_X;
        for (cell, width) in cells.into_iter().zip(TABLE_COLUMN_WIDTHS) {
            let text_width = face.width_of(&cell, TABLE_SIZE);
            let x = left + ((width - text_width) / 2.0).max(0.0);
            page.text(x, baseline, FontWeight::Regular, TABLE_SIZE, cell);
            left += width;
        }
    }
}

fn draw_footer(page: &mut OverlayPage, request: &PaymentRequest, total: &str) {
    let (x, y) = TOTAL_POS;
    page.text(x, y, FontWeight::Bold, TOTAL_SIZE, total);

    let mut y = FOOTER_Y;
    for line in DISCLAIMERS {
        page.text(FOOTER_X, y, FontWeight::Regular, FOOTER_SIZE, line);
        y -= FOOTER_STEP;
    }

    if let Some(rate) = request.exchange_rate.filter(|r| *r > 0.0) {
        page.text(
            FOOTER_X,
            y,
            FontWeight::Regular,
            FOOTER_SIZE,
            format!("TRM: ${}", format_amount(rate)),
        );
        y -= FOOTER_STEP;
    }

    for line in request.notes_text().lines().filter(|l| !l.trim().is_empty()) {
        page.text(FOOTER_X, y, FontWeight::Regular, FOOTER_SIZE, line.trim());
        y -= FOOTER_STEP;
    }
}
