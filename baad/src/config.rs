//! Application configuration.
//!
//! Defaults work out of the box; an optional INI file at
//! `~/.config/baad/config.ini` can override any of them, and CLI flags
//! override the file in turn. Missing file, missing sections and
//! missing keys all fall back silently to defaults.

use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::{debug, warn};

use crate::engine::{DEFAULT_CONCURRENCY, DEFAULT_MAX_ATTEMPTS};
use crate::local::VerifyPolicy;
use crate::resolver::DEFAULT_PATCH_BASE;

/// Notice index document carrying the latest client version.
pub const DEFAULT_NOTICE_INDEX_URL: &str =
    "https://prod-noticeindex.bluearchiveyostar.com/prod/index.json";

/// Server-info descriptor template; `{version}` is substituted.
pub const DEFAULT_SERVER_INFO_TEMPLATE: &str =
    "https://yostar-serverinfo.bluearchiveyostar.com/r{version}.json";

const DEFAULT_PRIMARY_DECODER: &str = "baad-decode";
const DEFAULT_STUDIO_DECODER: &str = "asset-studio-cli";

/// Upstream endpoint URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub notice_index: String,
    pub server_info: String,
    pub patch_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            notice_index: DEFAULT_NOTICE_INDEX_URL.to_string(),
            server_info: DEFAULT_SERVER_INFO_TEMPLATE.to_string(),
            patch_base: DEFAULT_PATCH_BASE.to_string(),
        }
    }
}

/// External decoder commands, as `program` plus arguments with
/// `{source}`/`{out}` placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl DecoderCommand {
    fn from_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    fn with_default_args(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: vec!["{source}".to_string(), "{out}".to_string()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoders {
    pub primary: DecoderCommand,
    pub studio: DecoderCommand,
}

impl Default for Decoders {
    fn default() -> Self {
        Self {
            primary: DecoderCommand::with_default_args(DEFAULT_PRIMARY_DECODER),
            studio: DecoderCommand::with_default_args(DEFAULT_STUDIO_DECODER),
        }
    }
}

/// Top-level configuration for both the library and the CLI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directory downloaded files land in.
    pub output_root: PathBuf,

    /// Worker pool size.
    pub concurrency: usize,

    /// Attempts per task before it counts as failed.
    pub max_attempts: u32,

    pub verify_policy: VerifyPolicy,
    pub endpoints: Endpoints,
    pub decoders: Decoders,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("output"),
            concurrency: DEFAULT_CONCURRENCY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            verify_policy: VerifyPolicy::default(),
            endpoints: Endpoints::default(),
            decoders: Decoders::default(),
        }
    }
}

impl Config {
    /// Loads from the default config file location, if it exists.
    pub fn load() -> Self {
        match default_config_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Self::default(),
        }
    }

    /// Loads from an INI file, falling back to defaults key by key.
    /// An unreadable file logs a warning and yields plain defaults.
    pub fn load_from(path: &Path) -> Self {
        let ini = match Ini::load_from_file(path) {
            Ok(ini) => ini,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read config file, using defaults");
                return Self::default();
            }
        };
        debug!(path = %path.display(), "loaded config file");

        let mut config = Self::default();
        if let Some(general) = ini.section(Some("general")) {
            if let Some(root) = general.get("output_root") {
                config.output_root = PathBuf::from(root);
            }
            if let Some(n) = general.get("concurrency").and_then(|v| v.parse().ok()) {
                config.concurrency = n;
            }
            if let Some(n) = general.get("max_attempts").and_then(|v| v.parse().ok()) {
                config.max_attempts = n;
            }
            match general.get("verify") {
                Some("size") => config.verify_policy = VerifyPolicy::SizeOnly,
                Some("crc") => config.verify_policy = VerifyPolicy::CrcWhenAvailable,
                Some(other) => warn!(value = other, "unknown verify policy, keeping default"),
                None => {}
            }
        }
        if let Some(endpoints) = ini.section(Some("endpoints")) {
            if let Some(url) = endpoints.get("notice_index") {
                config.endpoints.notice_index = url.to_string();
            }
            if let Some(url) = endpoints.get("server_info") {
                config.endpoints.server_info = url.to_string();
            }
            if let Some(url) = endpoints.get("patch_base") {
                config.endpoints.patch_base = url.to_string();
            }
        }
        if let Some(decoders) = ini.section(Some("decoders")) {
            if let Some(cmd) = decoders.get("primary").and_then(DecoderCommand::from_line) {
                config.decoders.primary = cmd;
            }
            if let Some(cmd) = decoders.get("studio").and_then(DecoderCommand::from_line) {
                config.decoders.studio = cmd;
            }
        }
        config
    }
}

/// `~/.config/baad/config.ini`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("baad").join("config.ini"))
}

/// Per-version cache directory for catalog snapshots.
pub fn cache_dir(version: &str) -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("baad").join("jp").join(version))
}
