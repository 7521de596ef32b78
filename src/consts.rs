pub const DEFAULT_LISTEN: &str = "127.0.0.1:2895";
pub const DEFAULT_ASSETS: &str = "./assets";
pub const DEFAULT_COUNTRY: &str = "ES";
pub const DEFAULT_GEOIP_URL: &str = "https://ipapi.co/json/";

/// Seconds between two re-evaluations of the current level.
pub const DEFAULT_REFRESH_SECS: u64 = 60;
