/// Name used for config lookups and logging
pub const APP_NAME: &str = "joybridge";
/// Config file name searched for in the config paths
pub const CONFIG_FILE_NAME: &str = "joybridge.yaml";
/// Number of controller ports on the reference adapter
pub const MAX_CONTROLLERS: usize = 2;
/// Default data pins for the reference adapter ports
pub const DEFAULT_DATA_PINS: [u8; MAX_CONTROLLERS] = [18, 19];
/// Default polling interval (~125Hz)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 8;
