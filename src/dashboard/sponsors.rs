use std::path::PathBuf;

use crate::dashboard::*;

/// The file extensions accepted for sponsor logos.
pub const LOGO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// One cell of the sponsor gallery.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SponsorCell {
    /// The position of the sponsor in the configuration, starting at 1.
    pub position: usize,
    pub dir: String,
    /// None if the directory is missing or holds no logo.
    pub logo: Option<PathBuf>,
}

/// Looks for the logo of every configured sponsor.
///
/// There is always one cell per directory, in the order of the configuration.
pub fn scan_sponsors(dirs: &[String]) -> Vec<SponsorCell> {
    dirs.iter()
        .enumerate()
        .map(|(idx, dir)| {
            let logo = find_logo(Path::new(dir));
            if logo.is_none() {
                warn!("scan_sponsors: no logo found in {}", dir);
            }
            SponsorCell {
                position: idx + 1,
                dir: dir.clone(),
                logo,
            }
        })
        .collect()
}

/// The first image of the directory, by file name, as an absolute path.
fn find_logo(dir: &Path) -> Option<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("find_logo: cannot list {:?}: {}", dir, e);
            return None;
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    let logo = files.into_iter().find(|p| is_logo(p))?;
    // The page may be written elsewhere than the working directory.
    match fs::canonicalize(&logo) {
        Ok(full) => Some(full),
        Err(e) => {
            debug!("find_logo: cannot resolve {:?}: {}", logo, e);
            Some(logo)
        }
    }
}

fn is_logo(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| LOGO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
