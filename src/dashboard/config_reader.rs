use crate::dashboard::*;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSource {
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub provider: Option<String>,
    #[serde(rename = "worksheetName")]
    pub worksheet_name: Option<String>,
}

impl Default for FileSource {
    fn default() -> Self {
        FileSource {
            file_path: "donations.xlsx".to_string(),
            provider: None,
            worksheet_name: None,
        }
    }
}

impl FileSource {
    /// The provider to use, from the configuration or else from the file extension.
    pub fn provider(&self) -> DashboardResult<Provider> {
        let name = match &self.provider {
            Some(p) => p.to_lowercase(),
            None => Path::new(&self.file_path)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .unwrap_or_default(),
        };
        match name.as_str() {
            "xlsx" | "xlsm" | "excel" => Ok(Provider::Xlsx),
            "csv" => Ok(Provider::Csv),
            _ => UnknownProviderSnafu {
                provider: self
                    .provider
                    .clone()
                    .unwrap_or_else(|| self.file_path.clone()),
            }
            .fail(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    #[serde(rename = "pageTitle")]
    pub page_title: String,
    pub title: String,
    pub tagline: String,
    pub date: String,
    pub time: String,
    pub location: String,
}

impl Default for EventSettings {
    fn default() -> Self {
        EventSettings {
            page_title: "Annual Benefit Dinner - Donation Dashboard".to_string(),
            title: "Darul Uloom Austin - Annual Benefit Dinner".to_string(),
            tagline: "Join us in supporting this noble cause!".to_string(),
            date: "Sunday, November 17, 2024".to_string(),
            time: "5 PM".to_string(),
            location: "Georgetown Community Center".to_string(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrCodes {
    pub tickets: Option<String>,
    pub donations: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSettings {
    pub email: String,
    pub phone: String,
    pub website: String,
}

impl Default for ContactSettings {
    fn default() -> Self {
        ContactSettings {
            email: "info@darululoomaustin.org".to_string(),
            phone: "(512) 981-5323".to_string(),
            website: "darululoomaustin.org".to_string(),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: FileSource,
    #[serde(rename = "outputPath")]
    pub output_path: String,
    #[serde(rename = "targetDonation")]
    pub target_donation: f64,
    #[serde(rename = "attendeeCount")]
    pub attendee_count: u64,
    #[serde(rename = "refreshSeconds")]
    pub refresh_seconds: u64,
    #[serde(rename = "previousDonationsShown")]
    pub previous_donations_shown: usize,
    #[serde(rename = "sponsorLogoWidth")]
    pub sponsor_logo_width: u32,
    #[serde(rename = "sponsorPaths")]
    pub sponsor_paths: Vec<String>,
    pub event: EventSettings,
    pub instructions: Vec<String>,
    #[serde(rename = "qrCodes")]
    pub qr_codes: QrCodes,
    pub contact: ContactSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            source: FileSource::default(),
            output_path: "dashboard.html".to_string(),
            target_donation: 100000.0,
            attendee_count: 350,
            refresh_seconds: 5,
            previous_donations_shown: DEFAULT_PREVIOUS_SHOWN,
            sponsor_logo_width: 50,
            sponsor_paths: vec![
                "./logos/1".to_string(),
                "./logos/2".to_string(),
                "./logos/3".to_string(),
            ],
            event: EventSettings::default(),
            instructions: vec![
                "After raising your hand, please fill the card out and pass it to the volunteer closest to you during the fundraiser.".to_string(),
                "If you choose to donate secretly please text the amount and method to 512-767-4082 e.g ‘5000 Card’ or ‘5000 Zelle’".to_string(),
            ],
            qr_codes: QrCodes::default(),
            contact: ContactSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Reads a configuration file.
    ///
    /// The relative paths it contains are taken relative to the directory of the file.
    pub fn read(path: &str) -> DashboardResult<DashboardConfig> {
        let contents = fs::read_to_string(path).context(OpeningConfigSnafu { path })?;
        let mut config: DashboardConfig =
            serde_json::from_str(&contents).context(ParsingConfigSnafu { path })?;
        debug!("read config: {:?}", config);
        // The page is opened from its own directory, so the paths must not
        // depend on the working directory.
        let full_path = fs::canonicalize(path).context(OpeningConfigSnafu { path })?;
        if let Some(root) = full_path.parent() {
            config.resolve_paths(root);
        }
        Ok(config)
    }

    pub fn resolve_paths(&mut self, root: &Path) {
        self.source.file_path = resolve(root, &self.source.file_path);
        self.output_path = resolve(root, &self.output_path);
        self.sponsor_paths = self
            .sponsor_paths
            .iter()
            .map(|p| resolve(root, p))
            .collect();
        for qr in [&mut self.qr_codes.tickets, &mut self.qr_codes.donations] {
            if let Some(src) = qr {
                if !is_url(src) {
                    *src = resolve(root, src);
                }
            }
        }
    }

    pub fn target(&self) -> DashboardResult<Amount> {
        match Amount::from_number(self.target_donation) {
            Some(a) if !a.is_negative() => Ok(a),
            _ => InvalidConfigSnafu {
                message: format!(
                    "targetDonation must be a non-negative number, got {}",
                    self.target_donation
                ),
            }
            .fail(),
        }
    }

    pub fn refresh_interval(&self) -> DashboardResult<Duration> {
        ensure!(
            self.refresh_seconds > 0,
            InvalidConfigSnafu {
                message: "refreshSeconds must be at least 1"
            }
        );
        Ok(Duration::from_secs(self.refresh_seconds))
    }
}

/// Images given as URLs are used as is, anything else is a local path.
pub fn is_url(src: &str) -> bool {
    src.contains("://") || src.starts_with("data:")
}

fn resolve(root: &Path, p: &str) -> String {
    let path = Path::new(p);
    if path.is_absolute() {
        p.to_string()
    } else {
        let joined: PathBuf = root.join(path);
        joined.display().to_string()
    }
}
