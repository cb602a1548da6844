//! PDF document writer.
//!
//! Renders the composed section list into an A4 document using `printpdf`'s
//! op-based API. The writer is deliberately dumb: it knows fonts, cursors
//! and page breaks, not metrics. Each section renders independently, top to
//! bottom, and long text blocks split across pages.

use std::fs;
use std::path::Path;

use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::image::RawImage;
use printpdf::ops::Op;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{BuiltinFont, Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt, TextItem, TextMatrix, XObjectId};

use crate::error::AppError;
use crate::report::sections::Section;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_PT: f32 = 48.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;
const CELL_SIZE: f32 = 10.0;

const TITLE_PITCH: f32 = 34.0;
const HEADING_PITCH: f32 = 26.0;
const BODY_PITCH: f32 = 19.0;
const ROW_PITCH: f32 = 24.0;
const SECTION_GAP: f32 = 10.0;

/// Maximum height the embedded chart may occupy on a page.
const IMAGE_MAX_HEIGHT_PT: f32 = 320.0;

/// Write the ordered sections to a PDF at `path`, overwriting any existing
/// file.
pub fn write_report_pdf(path: &Path, sections: &[Section]) -> Result<(), AppError> {
    let title = sections
        .iter()
        .find_map(|s| match s {
            Section::Title(t) => Some(t.as_str()),
            _ => None,
        })
        .unwrap_or("Report");

    let mut writer = PageWriter::new(title);
    for section in sections {
        writer.render_section(section)?;
    }
    let bytes = writer.finish();

    fs::write(path, bytes)
        .map_err(|e| AppError::compose(format!("Failed to write PDF '{}': {e}", path.display())))?;
    log::info!("wrote document artifact: {}", path.display());
    Ok(())
}

/// Op-level page state: a top-down cursor plus the text-section flag that
/// keeps the op stream well-formed.
struct PageWriter {
    doc: PdfDocument,
    ops: Vec<Op>,
    /// Distance from the top of the current page, in points.
    cursor_y: f32,
    page_w: f32,
    page_h: f32,
    is_text_section_open: bool,
}

impl PageWriter {
    fn new(title: &str) -> Self {
        let page_w = Mm(PAGE_WIDTH_MM).into_pt().0;
        let page_h = Mm(PAGE_HEIGHT_MM).into_pt().0;
        Self {
            doc: PdfDocument::new(title),
            ops: Vec::new(),
            cursor_y: MARGIN_PT,
            page_w,
            page_h,
            is_text_section_open: false,
        }
    }

    fn content_width(&self) -> f32 {
        self.page_w - 2.0 * MARGIN_PT
    }

    fn close_text_section_if_open(&mut self) {
        if self.is_text_section_open {
            self.ops.push(Op::EndTextSection);
            self.is_text_section_open = false;
        }
    }

    /// Flush the current op stream into a finished page and reset the cursor.
    fn start_new_page(&mut self) {
        self.close_text_section_if_open();
        let ops = std::mem::take(&mut self.ops);
        self.doc
            .pages
            .push(PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops));
        self.cursor_y = MARGIN_PT;
    }

    /// Break the page when `height` no longer fits above the bottom margin.
    fn ensure_room(&mut self, height: f32) {
        if self.cursor_y + height > self.page_h - MARGIN_PT {
            self.start_new_page();
        }
    }

    /// Place one line of text with its baseline derived from `top`, without
    /// touching the cursor.
    fn draw_text_at(&mut self, text: &str, size: f32, font: BuiltinFont, x: f32, top: f32) {
        if !self.is_text_section_open {
            self.ops.push(Op::StartTextSection);
            self.is_text_section_open = true;
        }
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(size),
            font,
        });
        let baseline = top + size * 0.8;
        self.ops.push(Op::SetTextMatrix {
            matrix: TextMatrix::Translate(Pt(x), Pt(self.page_h - baseline)),
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        });
    }

    /// Draw one left-aligned line at the cursor and advance by `pitch`.
    fn draw_line(&mut self, text: &str, size: f32, font: BuiltinFont, pitch: f32) {
        self.ensure_room(pitch);
        self.draw_text_at(text, size, font, MARGIN_PT, self.cursor_y);
        self.cursor_y += pitch;
    }

    /// Draw one horizontally centered line at the cursor and advance.
    fn draw_centered_line(&mut self, text: &str, size: f32, font: BuiltinFont, pitch: f32) {
        self.ensure_room(pitch);
        let x = MARGIN_PT + (self.content_width() - approx_text_width(text, size)).max(0.0) / 2.0;
        self.draw_text_at(text, size, font, x, self.cursor_y);
        self.cursor_y += pitch;
    }

    fn stroke_rect(&mut self, x: f32, top: f32, w: f32, h: f32) {
        self.close_text_section_if_open();
        let y = self.page_h - (top + h);
        let polygon = Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    LinePoint { p: Point { x: Pt(x), y: Pt(y) }, bezier: false },
                    LinePoint { p: Point { x: Pt(x + w), y: Pt(y) }, bezier: false },
                    LinePoint { p: Point { x: Pt(x + w), y: Pt(y + h) }, bezier: false },
                    LinePoint { p: Point { x: Pt(x), y: Pt(y + h) }, bezier: false },
                ],
            }],
            mode: PaintMode::Stroke,
            winding_order: WindingOrder::EvenOdd,
        };
        self.ops.push(Op::SetOutlineThickness { pt: Pt(0.75) });
        self.ops.push(Op::DrawPolygon { polygon });
    }

    fn render_section(&mut self, section: &Section) -> Result<(), AppError> {
        match section {
            Section::Title(text) => {
                self.draw_centered_line(text, TITLE_SIZE, BuiltinFont::HelveticaBold, TITLE_PITCH);
                self.cursor_y += SECTION_GAP;
            }
            Section::Image(path) => self.render_image(path)?,
            Section::Heading(text) => {
                self.cursor_y += SECTION_GAP;
                self.draw_centered_line(text, HEADING_SIZE, BuiltinFont::HelveticaBold, HEADING_PITCH);
            }
            Section::TextBlock(lines) => {
                for line in lines {
                    self.draw_line(line, BODY_SIZE, BuiltinFont::Helvetica, BODY_PITCH);
                }
            }
            Section::Table { columns, rows } => self.render_table(columns, rows),
        }
        Ok(())
    }

    fn render_image(&mut self, path: &Path) -> Result<(), AppError> {
        let bytes = fs::read(path).map_err(|e| {
            AppError::compose(format!(
                "Failed to read chart artifact '{}': {e}",
                path.display()
            ))
        })?;

        let mut warnings = Vec::new();
        let image = RawImage::decode_from_bytes(&bytes, &mut warnings).map_err(|e| {
            AppError::compose(format!(
                "Failed to decode chart artifact '{}': {e}",
                path.display()
            ))
        })?;

        let (img_w, img_h) = (image.width as f32, image.height as f32);
        let mut draw_w = self.content_width();
        let mut draw_h = draw_w * img_h / img_w.max(1.0);
        if draw_h > IMAGE_MAX_HEIGHT_PT {
            draw_w *= IMAGE_MAX_HEIGHT_PT / draw_h;
            draw_h = IMAGE_MAX_HEIGHT_PT;
        }

        self.ensure_room(draw_h + SECTION_GAP);
        self.close_text_section_if_open();

        let xobj_id = XObjectId::new();
        self.doc
            .resources
            .xobjects
            .map
            .insert(xobj_id.clone(), XObject::Image(image));

        let x = MARGIN_PT + (self.content_width() - draw_w) / 2.0;
        let y = self.page_h - (self.cursor_y + draw_h);
        let transform = XObjectTransform {
            translate_x: Some(Pt(x)),
            translate_y: Some(Pt(y)),
            scale_x: Some(draw_w / img_w.max(1.0)),
            scale_y: Some(draw_h / img_h.max(1.0)),
            rotate: None,
            dpi: Some(72.0),
        };
        self.ops.push(Op::UseXobject { id: xobj_id, transform });

        self.cursor_y += draw_h + SECTION_GAP;
        Ok(())
    }

    fn render_table(&mut self, columns: &[String], rows: &[Vec<String>]) {
        if columns.is_empty() {
            return;
        }
        let n_rows = rows.len() + 1;
        self.ensure_room(ROW_PITCH * n_rows as f32);

        let col_w = self.content_width() / columns.len() as f32;

        self.render_table_row(columns, col_w, BODY_SIZE, BuiltinFont::HelveticaBold);
        for row in rows {
            self.render_table_row(row, col_w, CELL_SIZE, BuiltinFont::Helvetica);
        }
    }

    fn render_table_row(&mut self, cells: &[String], col_w: f32, size: f32, font: BuiltinFont) {
        self.ensure_room(ROW_PITCH);
        let top = self.cursor_y;

        // Borders first (closes the text section), then all cell texts.
        for i in 0..cells.len() {
            self.stroke_rect(MARGIN_PT + i as f32 * col_w, top, col_w, ROW_PITCH);
        }
        for (i, cell) in cells.iter().enumerate() {
            let cell_x = MARGIN_PT + i as f32 * col_w;
            let x = cell_x + (col_w - approx_text_width(cell, size)).max(0.0) / 2.0;
            self.draw_text_at(cell, size, font, x, top + (ROW_PITCH - size) / 2.0);
        }

        self.cursor_y += ROW_PITCH;
    }

    fn finish(mut self) -> Vec<u8> {
        // Flush the in-progress page; an all-empty section list still
        // produces one blank page, but a section break that landed exactly
        // on a page boundary must not add a trailing empty one.
        if !self.ops.is_empty() || self.doc.pages.is_empty() {
            self.start_new_page();
        }
        let mut warnings = Vec::new();
        self.doc.save(&PdfSaveOptions::default(), &mut warnings)
    }
}

/// Rough Helvetica advance estimate, good enough to center headings and
/// table cells. Exact metrics would require shipping a parsed font.
fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.52
}
