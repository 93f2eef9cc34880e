// SVG drawing of the progress chart.

use std::f64::consts::PI;
use std::fmt::Write;

use crate::dashboard::render::{escape_html, Segment};

// Below this share, a segment is not drawn and carries no label inside the pie.
const MIN_FRACTION: f64 = 1e-6;

/// Draws the segments as a pie, starting at the top and turning counter-clockwise.
///
/// The fractions of the segments are expected to add up to 1.
pub fn pie_svg(segments: &[Segment], size: u32) -> String {
    let c = size as f64 / 2.0;
    let r = c - 2.0;
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="pie" width="{size}" height="{size}" viewBox="0 0 {size} {size}" role="img">"#
    );

    let mut start = PI / 2.0;
    for seg in segments {
        if seg.fraction < MIN_FRACTION {
            continue;
        }
        let sweep = 2.0 * PI * seg.fraction.min(1.0);
        if seg.fraction >= 1.0 - MIN_FRACTION {
            let _ = write!(
                svg,
                r#"<circle cx="{c:.2}" cy="{c:.2}" r="{r:.2}" fill="{}" stroke="{}"/>"#,
                seg.fill, STROKE
            );
        } else {
            let (x0, y0) = point(c, r, start);
            let (x1, y1) = point(c, r, start + sweep);
            let large_arc = if seg.fraction > 0.5 { 1 } else { 0 };
            let _ = write!(
                svg,
                r#"<path d="M {c:.2} {c:.2} L {x0:.2} {y0:.2} A {r:.2} {r:.2} 0 {large_arc} 0 {x1:.2} {y1:.2} Z" fill="{}" stroke="{}"/>"#,
                seg.fill, STROKE
            );
        }
        let (lx, ly) = point(c, r * 0.6, start + sweep / 2.0);
        let _ = write!(
            svg,
            r#"<text x="{lx:.2}" y="{ly:.2}" fill="{}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
            seg.text_color,
            escape_html(&seg.amount.to_string())
        );
        start += sweep;
    }
    svg.push_str("</svg>");
    svg
}

const STROKE: &str = "#014421";

// SVG coordinates grow downwards.
fn point(c: f64, r: f64, angle: f64) -> (f64, f64) {
    (c + r * angle.cos(), c - r * angle.sin())
}
