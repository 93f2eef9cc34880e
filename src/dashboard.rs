use log::{debug, info, warn};

use donation_tally::*;
use snafu::{prelude::*, Snafu};

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;
use tokio::time::MissedTickBehavior;

use crate::dashboard::config_reader::*;
use crate::dashboard::render::{build_frame, Page};

pub mod config_reader;
mod chart;
mod io_common;
mod io_csv;
mod io_xlsx;
mod render;
mod sponsors;

#[derive(Debug, Snafu)]
pub enum DashboardError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet in {path}"))]
    NoWorksheet { path: String },
    #[snafu(display("Worksheet {name:?} not found in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading file {path}"))]
    CsvLineParse { source: csv::Error, path: String },
    #[snafu(display("Invalid donation table in {path}"))]
    InvalidTable { source: TallyError, path: String },
    #[snafu(display("Error opening configuration file {path}"))]
    OpeningConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration file {path}"))]
    ParsingConfig {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid configuration: {message}"))]
    InvalidConfig { message: String },
    #[snafu(display("Unknown input provider {provider:?}"))]
    UnknownProvider { provider: String },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingSummary { source: serde_json::Error },
    #[snafu(display("Error opening reference summary {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing reference summary {path}"))]
    ParsingReference {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the summary and the reference {path}"))]
    ReferenceMismatch { path: String },
    #[snafu(display("Error running the refresh timer"))]
    Runtime { source: std::io::Error },
    #[snafu(display("A refresh cycle stopped unexpectedly"))]
    CycleAborted { source: tokio::task::JoinError },
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// How a failed cycle is reported on the screen.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum FailureKind {
    SourceUnavailable,
    SchemaError,
    Other,
}

impl FailureKind {
    pub fn title(&self) -> &'static str {
        match self {
            FailureKind::SourceUnavailable => "Donation data unavailable",
            FailureKind::SchemaError => "Donation data could not be read",
            FailureKind::Other => "Dashboard error",
        }
    }
}

impl DashboardError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DashboardError::OpeningExcel { .. }
            | DashboardError::OpeningCsv { .. }
            | DashboardError::CsvLineParse { .. } => FailureKind::SourceUnavailable,
            DashboardError::NoWorksheet { .. }
            | DashboardError::MissingWorksheet { .. }
            | DashboardError::InvalidTable { .. } => FailureKind::SchemaError,
            _ => FailureKind::Other,
        }
    }

    /// The message of the error followed by all its causes.
    pub fn describe(&self) -> String {
        let mut message = self.to_string();
        let mut cause = self.source();
        while let Some(c) = cause {
            message.push_str(": ");
            message.push_str(&c.to_string());
            cause = c.source();
        }
        message
    }
}

/// The input providers supported for the donation table.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Xlsx,
    Csv,
}

fn read_donations(source: &FileSource, provider: Provider) -> DashboardResult<Vec<Donation>> {
    debug!("Attempting to read donation file {:?}", source.file_path);
    match provider {
        Provider::Xlsx => io_xlsx::read_xlsx_donations(&source.file_path, source),
        Provider::Csv => io_csv::read_csv_donations(&source.file_path),
    }
}

/// A validated configuration, ready to run refresh cycles.
///
/// The static parts of the page are rendered once here.
pub struct Dashboard {
    config: DashboardConfig,
    provider: Provider,
    target: Amount,
    interval: Duration,
    page: Page,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> DashboardResult<Dashboard> {
        let provider = config.source.provider()?;
        let target = config.target()?;
        let interval = config.refresh_interval()?;
        let page = Page::new(&config);
        info!(
            "Dashboard: reading {:?} ({:?}) every {:?}, writing {:?}",
            config.source.file_path, provider, interval, config.output_path
        );
        Ok(Dashboard {
            config,
            provider,
            target,
            interval,
            page,
        })
    }

    pub fn refresh_interval(&self) -> Duration {
        self.interval
    }

    /// Reads the donation table and aggregates it.
    pub fn load_summary(&self) -> DashboardResult<DonationSummary> {
        let table = read_donations(&self.config.source, self.provider)?;
        Ok(summarize(&table, self.config.previous_donations_shown))
    }

    /// Runs one cycle: load, aggregate and render the page.
    ///
    /// The page is written even if the donations could not be read: it then
    /// shows the error. The error is returned in both cases.
    pub fn run_cycle(&self) -> DashboardResult<DonationSummary> {
        let outcome = self.load_summary();
        if let Err(e) = &outcome {
            warn!("run_cycle: {}", e.describe());
        }
        let sponsors = sponsors::scan_sponsors(&self.config.sponsor_paths);
        let frame = build_frame(outcome.as_ref(), self.target, &self.config, sponsors);
        let html = self.page.render(&frame);
        write_page(&self.config.output_path, &html)?;
        outcome
    }
}

fn write_page(path: &str, html: &str) -> DashboardResult<()> {
    let target = Path::new(path);
    if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).context(WritingOutputSnafu { path })?;
    }
    let mut tmp = target.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, html).context(WritingOutputSnafu { path })?;
    fs::rename(&tmp, target).context(WritingOutputSnafu { path })?;
    debug!("write_page: wrote {} bytes to {}", html.len(), path);
    Ok(())
}

fn donation_js(d: &Donation) -> JSValue {
    json!({ "donor": d.donor, "amount": d.amount.to_string() })
}

pub fn build_summary_js(summary: &DonationSummary, target: Amount) -> JSValue {
    let p = progress(summary.total, target);
    json!({
        "total": summary.total.to_string(),
        "totalCents": summary.total.cents(),
        "count": summary.count,
        "target": target.to_string(),
        "remaining": p.remaining.to_string(),
        "latest": summary.latest.as_ref().map(donation_js),
        "previous": summary.previous.iter().map(donation_js).collect::<Vec<JSValue>>(),
    })
}

fn read_reference(path: &str) -> DashboardResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningReferenceSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingReferenceSnafu { path })
}

/// Runs a single cycle, optionally writing the summary and checking it
/// against a reference summary.
pub fn run_once(
    dashboard: &Dashboard,
    summary_out: Option<&str>,
    check_summary_path: Option<&str>,
) -> DashboardResult<()> {
    let summary = dashboard.run_cycle()?;
    let summary_js = build_summary_js(&summary, dashboard.target);
    let pretty_js = serde_json::to_string_pretty(&summary_js).context(SerializingSummarySnafu {})?;

    match summary_out {
        Some("stdout") => println!("{}", pretty_js),
        Some(path) => fs::write(path, &pretty_js).context(WritingOutputSnafu { path })?,
        None => {}
    }

    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_reference(summary_p)?;
        let pretty_js_ref =
            serde_json::to_string_pretty(&summary_ref).context(SerializingSummarySnafu {})?;
        if pretty_js_ref != pretty_js {
            warn!("Found differences with the reference summary");
            print_diff(pretty_js_ref.as_str(), pretty_js.as_str(), "\n");
            return ReferenceMismatchSnafu { path: summary_p }.fail();
        }
        info!("Summary matches the reference {}", summary_p);
    }
    Ok(())
}

/// Refreshes the dashboard at a fixed interval until a shutdown signal arrives.
pub fn run_dashboard(dashboard: Dashboard) -> DashboardResult<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context(RuntimeSnafu {})?;
    runtime.block_on(refresh_loop(Arc::new(dashboard)))
}

async fn refresh_loop(dashboard: Arc<Dashboard>) -> DashboardResult<()> {
    let mut interval = tokio::time::interval(dashboard.refresh_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let shutdown = wait_for_shutdown_signal();
    tokio::pin!(shutdown);

    let mut cycle: u64 = 0;
    loop {
        tokio::select! {
            res = &mut shutdown => {
                res?;
                info!("Shutdown requested after {} cycles", cycle);
                return Ok(());
            }
            _ = interval.tick() => {
                cycle += 1;
                let d = dashboard.clone();
                run_cycle_task(cycle, move || d.run_cycle()).await;
            }
        }
    }
}

/// Runs one cycle on the blocking pool and reports how it went.
///
/// A failed or aborted cycle is only logged: the next tick tries again.
async fn run_cycle_task<F>(cycle: u64, run: F) -> bool
where
    F: FnOnce() -> DashboardResult<DonationSummary> + Send + 'static,
{
    let res = tokio::task::spawn_blocking(run)
        .await
        .context(CycleAbortedSnafu {});
    match res {
        Ok(Ok(summary)) => {
            debug!("cycle {}: {} donations", cycle, summary.count);
            true
        }
        Ok(Err(e)) | Err(e) => {
            warn!("cycle {}: {}", cycle, e.describe());
            false
        }
    }
}

async fn wait_for_shutdown_signal() -> DashboardResult<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).context(RuntimeSnafu {})?;
        let mut sigint = signal(SignalKind::interrupt()).context(RuntimeSnafu {})?;
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.context(RuntimeSnafu {})?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn csv_dashboard(dir: &Path, rows: &str) -> (Dashboard, PathBuf) {
        let data = dir.join("donations.csv");
        fs::write(&data, rows).unwrap();
        let out = dir.join("dashboard.html");
        let mut config = DashboardConfig::default();
        config.source.file_path = data.display().to_string();
        config.output_path = out.display().to_string();
        config.target_donation = 1000.0;
        config.sponsor_paths = vec![];
        (Dashboard::new(config).unwrap(), out)
    }

    #[test]
    fn cycle_writes_page() {
        let dir = tempfile::tempdir().unwrap();
        let (dashboard, out) = csv_dashboard(
            dir.path(),
            "Donor Name,Donation Amount\nA,100\nB,200\n",
        );
        let summary = dashboard.run_cycle().unwrap();
        assert_eq!(summary.total, Amount::from_dollars(300));

        let html = fs::read_to_string(out).unwrap();
        assert!(html.contains("New donation of $200 from B"));
        assert!(html.contains("Remaining $700"));
    }

    #[test]
    fn failed_cycle_shows_error() {
        let dir = tempfile::tempdir().unwrap();
        let (dashboard, out) = csv_dashboard(dir.path(), "Name,Amount\nA,100\n");
        let err = dashboard.run_cycle().unwrap_err();
        assert_eq!(err.kind(), FailureKind::SchemaError);

        let html = fs::read_to_string(&out).unwrap();
        assert!(html.contains("Donation data could not be read"));
        assert!(html.contains("Donor Name"));

        // The next cycle picks up the corrected file.
        fs::write(
            dir.path().join("donations.csv"),
            "Donor Name,Donation Amount\nA,100\n",
        )
        .unwrap();
        assert!(dashboard.run_cycle().is_ok());
        let html = fs::read_to_string(&out).unwrap();
        assert!(!html.contains("Donation data could not be read"));
    }

    #[test]
    fn missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DashboardConfig::default();
        config.source.file_path = dir.path().join("nope.xlsx").display().to_string();
        config.output_path = dir.path().join("out.html").display().to_string();
        config.sponsor_paths = vec![];
        let dashboard = Dashboard::new(config).unwrap();
        let err = dashboard.run_cycle().unwrap_err();
        assert_eq!(err.kind(), FailureKind::SourceUnavailable);
        let html = fs::read_to_string(dir.path().join("out.html")).unwrap();
        assert!(html.contains("Donation data unavailable"));
    }

    #[test]
    fn logos_found_from_another_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("donations.csv"),
            "Donor Name,Donation Amount\nA,100\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("logos/1")).unwrap();
        fs::write(dir.path().join("logos/1/acme.png"), b"png").unwrap();
        let config_path = dir.path().join("event.json");
        fs::write(
            &config_path,
            r#"{"source": {"filePath": "donations.csv"}, "outputPath": "site/index.html", "sponsorPaths": ["logos/1"]}"#,
        )
        .unwrap();
        let config = DashboardConfig::read(config_path.to_str().unwrap()).unwrap();
        Dashboard::new(config).unwrap().run_cycle().unwrap();

        let html = fs::read_to_string(dir.path().join("site/index.html")).unwrap();
        let logo = dir.path().join("logos/1/acme.png").canonicalize().unwrap();
        assert!(html.contains(&format!("<img src=\"file://{}\"", logo.display())));
    }

    #[test]
    fn aborted_cycle_keeps_the_loop_going() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let ok = runtime.block_on(run_cycle_task(1, || panic!("cycle panicked")));
        assert!(!ok);
        let ok = runtime.block_on(run_cycle_task(2, || Ok(summarize(&[], 4))));
        assert!(ok);
        let ok = runtime.block_on(run_cycle_task(3, || {
            InvalidConfigSnafu { message: "broken" }.fail()
        }));
        assert!(!ok);
    }

    #[test]
    fn summary_js() {
        let table = vec![
            Donation::new("A", Amount::from_dollars(100)),
            Donation::new("B", Amount::from_dollars(200)),
        ];
        let js = build_summary_js(&summarize(&table, 4), Amount::from_dollars(1000));
        assert_eq!(
            js,
            json!({
                "total": "$300",
                "totalCents": 30000,
                "count": 2,
                "target": "$1,000",
                "remaining": "$700",
                "latest": {"donor": "B", "amount": "$200"},
                "previous": [{"donor": "A", "amount": "$100"}],
            })
        );

        let empty = build_summary_js(&summarize(&[], 4), Amount::from_dollars(1000));
        assert_eq!(empty["latest"], JSValue::Null);
        assert_eq!(empty["total"], json!("$0"));
    }

    #[test]
    fn reference_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let (dashboard, _) = csv_dashboard(
            dir.path(),
            "Donor Name,Donation Amount\nA,100\n",
        );
        let good = dir.path().join("good.json");
        let summary = dashboard.load_summary().unwrap();
        fs::write(
            &good,
            serde_json::to_string(&build_summary_js(&summary, Amount::from_dollars(1000))).unwrap(),
        )
        .unwrap();
        assert!(run_once(&dashboard, None, Some(good.to_str().unwrap())).is_ok());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"total": "$1"}"#).unwrap();
        let res = run_once(&dashboard, None, Some(bad.to_str().unwrap()));
        assert!(matches!(res, Err(DashboardError::ReferenceMismatch { .. })));
    }
}
