//! Module for searching for joybridge config files

use std::path::PathBuf;

use crate::constants::{APP_NAME, CONFIG_FILE_NAME};

/// Base system fallback path to use if one cannot be found with XDG
const FALLBACK_BASE_PATH: &str = "/usr/share/joybridge";

/// Returns the base path for configuration data
pub fn get_base_path() -> PathBuf {
    let Ok(base_dirs) = xdg::BaseDirectories::with_prefix(APP_NAME) else {
        log::warn!("Unable to determine config base path. Using fallback path.");
        return PathBuf::from(FALLBACK_BASE_PATH);
    };

    // Get the data directories in preference order
    let data_dirs = base_dirs.get_data_dirs();
    for dir in data_dirs {
        if dir.exists() {
            return dir;
        }
    }

    log::debug!("Config base path not found. Using fallback path.");
    PathBuf::from(FALLBACK_BASE_PATH)
}

/// Returns a list of config file paths in load order.
/// E.g. ["/etc/joybridge/joybridge.yaml", "/usr/share/joybridge/joybridge.yaml"]
pub fn get_config_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/etc/joybridge").join(CONFIG_FILE_NAME),
        get_base_path().join(CONFIG_FILE_NAME),
        PathBuf::from("./rootfs/usr/share/joybridge").join(CONFIG_FILE_NAME),
    ]
}

/// Returns the first config file that exists
pub fn find_config_file() -> Option<PathBuf> {
    get_config_paths().into_iter().find(|path| {
        log::trace!("Checking {path:?} for config");
        path.is_file()
    })
}
