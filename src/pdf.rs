use crate::canvas::{Command, Document, TextAlign};
use crate::types::{Color, Px};

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const PAGE_ID: usize = 3;
const CONTENT_ID: usize = 4;
const FONT_ID: usize = 5;

// Width heuristic for the built-in face: 0.6 em per character.
const CHAR_WIDTH_EM: f64 = 0.6;

/// Serializes a recorded document as a single-page PDF 1.7 file, mapping one
/// surface pixel to one PDF point. Output is deterministic byte for byte.
pub fn document_to_pdf(document: &Document) -> Vec<u8> {
    let width = document.size.width.to_i32();
    let height = document.size.height.to_i32();
    let content = render_commands(document);

    let objects = vec![
        format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID),
        format!("<< /Type /Pages /Count 1 /Kids [{} 0 R] >>", PAGE_ID),
        format!(
            "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
            PAGES_ID, width, height, FONT_ID, CONTENT_ID
        ),
        stream_object(&content),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
         /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];
    build_pdf(objects)
}

fn build_pdf(objects: Vec<String>) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.7\n");
    out.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::new();
    for (index, object) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
        out.extend_from_slice(object.as_bytes());
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF",
            objects.len() + 1,
            CATALOG_ID,
            xref_start
        )
        .as_bytes(),
    );
    out
}

fn stream_object(content: &str) -> String {
    format!(
        "<< /Length {} >>\nstream\n{}\nendstream",
        content.len(),
        content
    )
}

fn render_commands(document: &Document) -> String {
    let page_height = document.size.height;
    let mut out = String::new();
    // Text alignment and font size are resolved here rather than copied
    // into the stream: PDF text placement wants the final anchor up front.
    let mut text_align = TextAlign::Left;
    let mut font_size = Px::from_i32(10);
    for command in &document.commands {
        match command {
            Command::SaveState => out.push_str("q\n"),
            Command::RestoreState => out.push_str("Q\n"),
            Command::SetStrokeColor(color) => out.push_str(&stroke_color(*color)),
            Command::SetFillColor(color) => out.push_str(&fill_color(*color)),
            Command::SetTextAlign(align) => text_align = *align,
            Command::SetFontSize(size) => font_size = *size,
            // Paths are implicit in PDF; painting consumes them.
            Command::BeginPath => {}
            Command::MoveTo { x, y } => {
                out.push_str(&format!(
                    "{} {} m\n",
                    x.to_i32(),
                    (page_height - *y).to_i32()
                ));
            }
            Command::LineTo { x, y } => {
                out.push_str(&format!(
                    "{} {} l\n",
                    x.to_i32(),
                    (page_height - *y).to_i32()
                ));
            }
            Command::Stroke => out.push_str("S\n"),
            Command::FillRect {
                x,
                y,
                width,
                height,
            } => {
                let draw_y = page_height - *y - *height;
                out.push_str(&format!(
                    "{} {} {} {} re\nf\n",
                    x.to_i32(),
                    draw_y.to_i32(),
                    width.to_i32(),
                    height.to_i32()
                ));
            }
            Command::ClearRect {
                x,
                y,
                width,
                height,
            } => {
                // Closest print analog of clearing: paint the area white.
                let draw_y = page_height - *y - *height;
                out.push_str("q\n");
                out.push_str(&fill_color(Color::WHITE));
                out.push_str(&format!(
                    "{} {} {} {} re\nf\nQ\n",
                    x.to_i32(),
                    draw_y.to_i32(),
                    width.to_i32(),
                    height.to_i32()
                ));
            }
            Command::DrawText {
                x,
                y,
                text,
                max_width,
            } => {
                draw_text(
                    &mut out,
                    page_height,
                    text_align,
                    font_size,
                    *x,
                    *y,
                    text,
                    *max_width,
                );
            }
        }
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn draw_text(
    out: &mut String,
    page_height: Px,
    text_align: TextAlign,
    font_size: Px,
    x: Px,
    y: Px,
    text: &str,
    max_width: Option<Px>,
) {
    let estimated = estimate_text_width(text, font_size);
    let (width, squeeze) = match max_width {
        Some(limit) if estimated > limit.to_f64() && limit.to_f64() > 0.0 => {
            (limit.to_f64(), Some(100.0 * limit.to_f64() / estimated))
        }
        _ => (estimated, None),
    };
    let anchor_x = match text_align {
        TextAlign::Left => x.to_f64(),
        TextAlign::Center => x.to_f64() - width / 2.0,
        TextAlign::Right => x.to_f64() - width,
    };
    out.push_str("BT\n");
    out.push_str(&format!("/F1 {} Tf\n", font_size.to_i32()));
    if let Some(scale) = squeeze {
        out.push_str(&format!("{} Tz\n", fmt(scale)));
    }
    out.push_str(&format!(
        "{} {} Td\n",
        fmt(anchor_x),
        (page_height - y).to_i32()
    ));
    out.push_str(&format!("({}) Tj\n", escape_pdf_string(text)));
    if squeeze.is_some() {
        // Tz survives BT/ET, so put it back.
        out.push_str("100 Tz\n");
    }
    out.push_str("ET\n");
}

fn estimate_text_width(text: &str, font_size: Px) -> f64 {
    CHAR_WIDTH_EM * font_size.to_f64() * text.chars().count() as f64
}

fn stroke_color(color: Color) -> String {
    format!(
        "{} {} {} RG\n",
        fmt(color.r as f64),
        fmt(color.g as f64),
        fmt(color.b as f64)
    )
}

fn fill_color(color: Color) -> String {
    format!(
        "{} {} {} rg\n",
        fmt(color.r as f64),
        fmt(color.g as f64),
        fmt(color.b as f64)
    )
}

fn fmt(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    format_milli((value * 1000.0).round() as i64)
}

fn format_milli(milli: i64) -> String {
    if milli == 0 {
        return "0".to_string();
    }
    let sign = if milli < 0 { "-" } else { "" };
    let abs = milli.abs();
    let int_part = abs / 1000;
    let frac_part = abs % 1000;
    if frac_part == 0 {
        format!("{}{}", sign, int_part)
    } else {
        let mut s = format!("{}{}.{:03}", sign, int_part, frac_part);
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
        s
    }
}

fn escape_pdf_string(input: &str) -> String {
    let mut out = String::new();
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}
