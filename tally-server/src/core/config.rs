use std::path::PathBuf;
use std::str::FromStr;

/// Server configuration - every setting of the label service
///
/// # Environment variables
///
/// All settings can be overridden by environment variables (a `.env` file is
/// loaded first):
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 5000 | HTTP API port |
/// | COUNTER_FILE | counters.json | Persisted counter mapping |
/// | PRINTER_ADDRESS | tcp://10.0.0.13 | Printer identifier |
/// | PRINTER_MODEL | QL-700 | Printer model |
/// | LABEL_SIZE | 62 | Continuous label roll |
/// | PRINTER_ENABLED | true | Send jobs to the printer |
/// | PRINT_TIMEOUT_MS | 5000 | Printer connect and write timeout |
/// | PRINT_STATUS_WAIT_MS | 3000 | Wait for the completion status |
/// | FONT_PATH | arial.ttf | Regular TrueType font |
/// | BOLD_FONT_PATH | arialbd.ttf | Bold TrueType font |
/// | FONT_SIZE | 60 | Font size in pixels |
/// | LOGO_PATH | logo.png | Logo for the logo template |
/// | DEFAULT_LABEL_HEIGHT | 453 | Canvas height of the default template |
/// | LOGO_LABEL_HEIGHT | 400 | Canvas height of the logo template |
/// | COUPON_LABEL_HEIGHT | 420 | Canvas height of the coupon template |
/// | DEBUG_LABEL_DIR | (unset) | Save every rendered label as PNG here |
/// | INDEX_PATH | index.html | Front-end page served at `/` |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout |
/// | LOG_LEVEL | info | Log filter |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | (unset) | Daily rolling log files |
///
/// # Example
///
/// ```ignore
/// PRINTER_ADDRESS=tcp://192.168.1.40 LABEL_SIZE=29 cargo run -p tally-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Counter mapping file
    pub counter_file: PathBuf,

    // === Printer ===
    /// Printer identifier, e.g. `tcp://10.0.0.13`
    pub printer_address: String,
    /// Printer model identifier, e.g. `QL-700`
    pub printer_model: String,
    /// Continuous label roll identifier, e.g. `62`
    pub label_size: String,
    /// When false, labels are rendered but never sent
    pub printer_enabled: bool,
    pub print_timeout_ms: u64,
    pub print_status_wait_ms: u64,

    // === Rendering ===
    pub font_path: PathBuf,
    pub bold_font_path: PathBuf,
    pub font_size: f32,
    pub logo_path: PathBuf,
    pub default_label_height: u32,
    pub logo_label_height: u32,
    pub coupon_label_height: u32,
    /// Directory for debug PNG artifacts (disabled when unset)
    pub debug_label_dir: Option<PathBuf>,

    // === HTTP ===
    pub index_path: PathBuf,
    pub request_timeout_ms: u64,

    // === Logging ===
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            http_port: env_parse("HTTP_PORT", 5000),
            counter_file: PathBuf::from(env_string("COUNTER_FILE", "counters.json")),

            printer_address: env_string("PRINTER_ADDRESS", "tcp://10.0.0.13"),
            printer_model: env_string("PRINTER_MODEL", "QL-700"),
            label_size: env_string("LABEL_SIZE", "62"),
            printer_enabled: env_parse("PRINTER_ENABLED", true),
            print_timeout_ms: env_parse("PRINT_TIMEOUT_MS", 5000),
            print_status_wait_ms: env_parse("PRINT_STATUS_WAIT_MS", 3000),

            font_path: PathBuf::from(env_string("FONT_PATH", "arial.ttf")),
            bold_font_path: PathBuf::from(env_string("BOLD_FONT_PATH", "arialbd.ttf")),
            font_size: env_parse("FONT_SIZE", 60.0),
            logo_path: PathBuf::from(env_string("LOGO_PATH", "logo.png")),
            default_label_height: env_parse("DEFAULT_LABEL_HEIGHT", 280 + 173),
            logo_label_height: env_parse("LOGO_LABEL_HEIGHT", 400),
            coupon_label_height: env_parse("COUPON_LABEL_HEIGHT", 420),
            debug_label_dir: env_optional("DEBUG_LABEL_DIR").map(PathBuf::from),

            index_path: PathBuf::from(env_string("INDEX_PATH", "index.html")),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),

            log_level: env_string("LOG_LEVEL", "info"),
            log_json: env_parse("LOG_JSON", false),
            log_dir: env_optional("LOG_DIR"),
        }
    }

    /// Override the parts that tests care about
    ///
    /// Printing is disabled; enable it explicitly with a test printer address.
    pub fn with_overrides(counter_file: impl Into<PathBuf>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.counter_file = counter_file.into();
        config.http_port = http_port;
        config.printer_enabled = false;
        config.debug_label_dir = None;
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
