use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where session CSVs, JSON artifacts, and condition tables live.
    pub fn data_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("flanker")
        } else {
            ProjectDirs::from("", "", "flanker")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("flanker_data"))
        }
    }

    /// A condition table path: absolute names pass through, bare names
    /// resolve against the data directory.
    pub fn block_path(name: &str) -> PathBuf {
        let p = PathBuf::from(name);
        if p.is_absolute() || p.exists() {
            p
        } else {
            Self::data_dir().join(name)
        }
    }
}
