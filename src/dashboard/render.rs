// The page displayed on the venue screen.
//
// A cycle produces a `Frame` (what to show), and the `Page` turns it into HTML.
// The parts of the page that do not depend on the donations are rendered once.

use std::fmt::Write;
use std::path::Path;

use crate::dashboard::chart::pie_svg;
use crate::dashboard::config_reader::{is_url, DashboardConfig, QrCodes};
use crate::dashboard::sponsors::SponsorCell;
use crate::dashboard::{DashboardError, FailureKind};
use donation_tally::*;

pub const DONATED_FILL: &str = "#014421";
pub const REMAINING_FILL: &str = "#F9F4EA";
pub const EMPTY_FEED: &str = "No donations yet";

const CHART_SIZE: u32 = 320;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Segment {
    pub label: &'static str,
    pub amount: Amount,
    /// Share of the chart, between 0 and 1.
    pub fraction: f64,
    pub fill: &'static str,
    pub text_color: &'static str,
}

impl Segment {
    pub fn caption(&self) -> String {
        format!("{} {}", self.label, self.amount)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Feed {
    pub latest: Option<Donation>,
    pub previous: Vec<Donation>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Body {
    Donations {
        metrics: Vec<Metric>,
        chart: Vec<Segment>,
        feed: Feed,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

/// Everything that changes from one cycle to the next.
#[derive(PartialEq, Debug, Clone)]
pub struct Frame {
    pub body: Body,
    pub sponsors: Vec<SponsorCell>,
}

pub fn latest_text(d: &Donation) -> String {
    format!("New donation of {} from {}", d.amount, d.donor)
}

pub fn previous_text(d: &Donation) -> String {
    format!("{} from {}", d.amount, d.donor)
}

pub fn build_frame(
    outcome: Result<&DonationSummary, &DashboardError>,
    target: Amount,
    config: &DashboardConfig,
    sponsors: Vec<SponsorCell>,
) -> Frame {
    let body = match outcome {
        Ok(summary) => {
            let metrics = vec![
                Metric {
                    label: "Total Donations",
                    value: summary.total.to_string(),
                },
                Metric {
                    label: "Donation Count",
                    value: summary.count.to_string(),
                },
                Metric {
                    label: "Attendee Count",
                    value: config.attendee_count.to_string(),
                },
            ];
            let p = progress(summary.total, target);
            let donated_fraction = p.donated_fraction();
            let chart = vec![
                Segment {
                    label: "Donated",
                    amount: p.donated,
                    fraction: donated_fraction,
                    fill: DONATED_FILL,
                    text_color: "white",
                },
                Segment {
                    label: "Remaining",
                    amount: p.remaining,
                    fraction: 1.0 - donated_fraction,
                    fill: REMAINING_FILL,
                    text_color: "black",
                },
            ];
            let feed = Feed {
                latest: summary.latest.clone(),
                previous: summary.previous.clone(),
            };
            Body::Donations {
                metrics,
                chart,
                feed,
            }
        }
        Err(e) => Body::Failed {
            kind: e.kind(),
            message: e.describe(),
        },
    };
    Frame { body, sponsors }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// Local paths are turned into file URLs when absolute, so that the page can be
// opened from anywhere.
fn asset_url(path: &Path) -> String {
    if path.is_absolute() {
        format!("file://{}", path.display())
    } else {
        path.display().to_string()
    }
}

const STYLE: &str = r#"<style>
body { background-color: #F9F4EA; margin: 0 2em; font-family: 'Verdana', sans-serif; }
h1, h2, h3 { color: #014421; font-family: 'Georgia', serif; }
.metric-row, .columns, .sponsors { display: flex; gap: 2em; }
.metric-item { flex: 1; background-color: #F9F4EA; padding: 20px; border-radius: 10px; margin-bottom: 20px; }
.metric-label { font-size: 14px; color: #555; }
.metric-value { font-size: 36px; color: #014421; }
.columns > div { flex: 1; }
.legend span { display: inline-block; margin-right: 1em; }
.swatch { width: 12px; height: 12px; border: 1px solid #014421; margin-right: 4px; }
.latest-donation { background-color: #014421; color: white; padding: 10px; border-radius: 5px; font-weight: bold; margin-bottom: 1em; }
.previous-donation { background-color: #E3F2FD; color: #0B3D91; padding: 8px; border-radius: 5px; margin-bottom: 8px; }
.empty-state { color: #555; font-style: italic; }
.error-state { background-color: #F8D7DA; color: #721C24; border: 1px solid #F5C6CB; padding: 16px; border-radius: 5px; }
.qr-code-container { text-align: center; margin-top: 20px; }
.qr-placeholder { display: inline-block; width: 100px; height: 100px; line-height: 100px; border: 1px dashed #555; font-size: 10px; margin-right: 10px; }
.sponsor { flex: 1; }
.sponsor-missing { background-color: #FFF3CD; color: #856404; padding: 10px; border-radius: 5px; }
footer { font-family: 'Arial', sans-serif; color: #555; text-align: center; font-size: 12px; }
</style>"#;

/// The HTML document, with its static sections already rendered.
pub struct Page {
    head: String,
    header: String,
    instructions: String,
    footer: String,
    logo_width: u32,
}

impl Page {
    pub fn new(config: &DashboardConfig) -> Page {
        let event = &config.event;
        let head = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<meta http-equiv=\"refresh\" content=\"{}\">\n<title>{}</title>\n{}\n</head>\n",
            config.refresh_seconds,
            escape_html(&event.page_title),
            STYLE
        );
        let header = format!(
            "<header>\n<h1>{}</h1>\n<p><b>{}</b></p>\n<p>Event Date: <b>{}</b> | Time: <b>{}</b> | Location: <b>{}</b></p>\n</header>\n",
            escape_html(&event.title),
            escape_html(&event.tagline),
            escape_html(&event.date),
            escape_html(&event.time),
            escape_html(&event.location)
        );
        let mut instructions = String::from("<section class=\"instructions\">\n");
        for line in config.instructions.iter() {
            let _ = writeln!(instructions, "<h3>{}</h3>", escape_html(line));
        }
        instructions.push_str(&qr_codes_html(&config.qr_codes));
        instructions.push_str("</section>\n");

        let contact = &config.contact;
        let footer = format!(
            "<footer>\n<p>Contact us at <a href=\"mailto:{email}\">{email}</a> | Phone: {} | Visit our website: <a href=\"http://{website}\" target=\"_blank\">{website}</a></p>\n</footer>\n",
            escape_html(&contact.phone),
            email = escape_html(&contact.email),
            website = escape_html(&contact.website),
        );
        Page {
            head,
            header,
            instructions,
            footer,
            logo_width: config.sponsor_logo_width,
        }
    }

    pub fn render(&self, frame: &Frame) -> String {
        let mut html = String::new();
        html.push_str(&self.head);
        html.push_str("<body>\n");
        html.push_str(&self.header);
        match &frame.body {
            Body::Donations {
                metrics,
                chart,
                feed,
            } => {
                html.push_str(&metrics_html(metrics));
                html.push_str("<div class=\"columns\">\n");
                html.push_str(&chart_html(chart));
                html.push_str(&feed_html(feed));
                html.push_str("</div>\n");
            }
            Body::Failed { kind, message } => {
                let _ = write!(
                    html,
                    "<div class=\"error-state\">\n<h2>{}</h2>\n<p>{}</p>\n<p>The dashboard will try again at the next refresh.</p>\n</div>\n",
                    kind.title(),
                    escape_html(message)
                );
            }
        }
        html.push_str(&self.instructions);
        html.push_str(&sponsors_html(&frame.sponsors, self.logo_width));
        html.push_str(&self.footer);
        html.push_str("</body>\n</html>\n");
        html
    }
}

fn metrics_html(metrics: &[Metric]) -> String {
    let mut html = String::from("<div class=\"metric-row\">\n");
    for m in metrics {
        let _ = writeln!(
            html,
            "<div class=\"metric-item\"><div class=\"metric-label\">{}</div><div class=\"metric-value\">{}</div></div>",
            m.label,
            escape_html(&m.value)
        );
    }
    html.push_str("</div>\n");
    html
}

fn chart_html(chart: &[Segment]) -> String {
    let mut html = String::from("<div>\n<h2>Donation Progress</h2>\n");
    html.push_str(&pie_svg(chart, CHART_SIZE));
    html.push_str("\n<div class=\"legend\">");
    for seg in chart {
        let _ = write!(
            html,
            "<span><span class=\"swatch\" style=\"background-color: {}\"></span>{}</span>",
            seg.fill,
            escape_html(&seg.caption())
        );
    }
    html.push_str("</div>\n</div>\n");
    html
}

fn feed_html(feed: &Feed) -> String {
    let mut html = String::from("<div>\n<h2>Recent Donations</h2>\n");
    match &feed.latest {
        Some(d) => {
            let _ = writeln!(
                html,
                "<div class=\"latest-donation\">{}</div>",
                escape_html(&latest_text(d))
            );
        }
        None => {
            let _ = writeln!(html, "<div class=\"empty-state\">{}</div>", EMPTY_FEED);
        }
    }
    for d in feed.previous.iter() {
        let _ = writeln!(
            html,
            "<div class=\"previous-donation\">{}</div>",
            escape_html(&previous_text(d))
        );
    }
    html.push_str("</div>\n");
    html
}

fn qr_codes_html(qr: &QrCodes) -> String {
    let mut html = String::from("<div class=\"qr-code-container\">\n");
    for (src, alt) in [
        (&qr.tickets, "QR Code for Tickets"),
        (&qr.donations, "QR Code for Donations"),
    ] {
        match src {
            Some(src) => {
                let url = if is_url(src) {
                    src.clone()
                } else {
                    asset_url(Path::new(src))
                };
                let _ = writeln!(
                    html,
                    "<img src=\"{}\" alt=\"{}\" style=\"width:100px; margin-right:10px;\">",
                    escape_html(&url),
                    alt
                );
            }
            None => {
                let _ = writeln!(html, "<span class=\"qr-placeholder\">{}</span>", alt);
            }
        }
    }
    html.push_str("</div>\n");
    html
}

fn sponsors_html(sponsors: &[SponsorCell], logo_width: u32) -> String {
    let mut html = String::from("<section>\n<h2>Our Sponsors</h2>\n<div class=\"sponsors\">\n");
    for cell in sponsors {
        match &cell.logo {
            Some(logo) => {
                let _ = writeln!(
                    html,
                    "<div class=\"sponsor\"><h3>Sponsor {}</h3><img src=\"{}\" width=\"{}\" alt=\"Sponsor {}\"></div>",
                    cell.position,
                    escape_html(&asset_url(logo)),
                    logo_width,
                    cell.position
                );
            }
            None => {
                let _ = writeln!(
                    html,
                    "<div class=\"sponsor sponsor-missing\">No logo found in {}</div>",
                    escape_html(&cell.dir)
                );
            }
        }
    }
    html.push_str("</div>\n</section>\n");
    html
}
