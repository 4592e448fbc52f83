//! UI text shown on the device. Edit here to customize wording.

// Idle screen
pub const IDLE_LINE1: &str = "Press to";
pub const IDLE_LINE2: &str = "Notice";

// Press states
pub const BUTTON_PRESSED: &str = "Pressed";
pub const SAVING: &str = "Saving...";
pub const SAVED: &str = "Saved";

// Long press states
pub const PRIVACY_MODE_LINE1: &str = "PRIVACY";
pub const PRIVACY_MODE_LINE2: &str = "MODE";
pub const PRIVACY_HOLD_INSTRUCTION: &str = "Hold for privacy";

// Debug screen
pub const DEBUG_TITLE: &str = "Debug";
pub const DEBUG_SSID_LABEL: &str = "SSID:";
pub const DEBUG_RSSI_LABEL: &str = "RSSI:";
pub const NOT_AVAILABLE: &str = "N/A";

// WiFi states
pub const WIFI_CONNECTING: &str = "WiFi...";
pub const WIFI_CONNECTED: &str = "Connected!";
pub const WIFI_FAILED: &str = "WiFi Failed";
pub const WIFI_NO_CONNECTION: &str = "NO CONNECTION";
pub const WIFI_RETRY: &str = "Retrying...";
