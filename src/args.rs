use clap::Parser;

/// This is a live donation dashboard for fundraising events.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON configuration of the dashboard. If not provided, the defaults are used.
    /// The paths in the configuration are relative to the directory of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The spreadsheet containing the donations. Setting this option overrides the path
    /// that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (xlsx or csv) The type of the input. By default, it is guessed from the extension of the file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use (the first one by default).
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path) Where the HTML page of the dashboard is written.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (seconds) The time between two refreshes of the dashboard.
    #[clap(long, value_parser)]
    pub interval: Option<u64>,

    /// If passed as an argument, refreshes the dashboard once and exits.
    #[clap(long, takes_value = false)]
    pub once: bool,

    /// (file path or 'stdout') With --once, the summary of the donations will be written in JSON format to the
    /// given location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (file path) With --once, a reference file containing the expected summary in JSON format. If provided,
    /// the program checks that the summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
