use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use chrono::{FixedOffset, NaiveDate};
use serde::Deserialize;

use crate::text_utils::parse_offset;
use crate::util::local_zone::LocalZone;
use crate::util::toml_date::TomlDate;

pub const CFG_FILE_NAME: &str = "blogml2hugo.toml";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Blog {
    /// Host every in-blog absolute URL must use.
    pub host: String,
    /// Path prefix of the blog, e.g. `/blog/jjameson`.
    pub path: String,
    /// Legacy path segment dropped from permalinks.
    pub archive_segment: String,
    /// Legacy page extension stripped from permalinks.
    pub page_extension: String,
}

impl Default for Blog {
    fn default() -> Self {
        Blog {
            host: "www.technologytoolbox.com".to_string(),
            path: "/blog/jjameson".to_string(),
            archive_segment: "archive".to_string(),
            page_extension: ".aspx".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Dates {
    /// Fixed UTC offset (`-07:00`) used as local time. The system zone when absent.
    pub time_zone: Option<String>,
    /// Dates without a zone designator older than this are shifted by the local offset.
    pub shift_before: TomlDate,
}

impl Default for Dates {
    fn default() -> Self {
        Dates {
            time_zone: None,
            shift_before: TomlDate(NaiveDate::from_ymd_opt(2011, 9, 3).unwrap_or_default()),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Images {
    pub old_host: String,
    pub new_host: String,
    pub old_base_path: String,
    pub new_base_path: String,
    /// Image path relative to `old_base_path` -> path relative to `new_base_path`
    pub mappings: BTreeMap<String, String>,
}

impl Default for Images {
    fn default() -> Self {
        let mappings = [
            ("10/o_Taskbar-Shortcuts.jpg", "My-System/Taskbar-Shortcuts-301x96.jpg"),
            ("9/r_SharePoint-Designer-Error-Creating-Control.png",
             "SharePoint/SharePoint-Designer-Error-Creating-Control-600x305.png"),
            ("9/o_SharePoint-Designer-Error-Creating-Control.png",
             "SharePoint/SharePoint-Designer-Error-Creating-Control-756x384.png"),
        ];

        Images {
            old_host: "www.technologytoolbox.com".to_string(),
            new_host: "assets.technologytoolbox.com".to_string(),
            old_base_path: "/blog/images/www_technologytoolbox_com/blog/jjameson".to_string(),
            new_base_path: "/blog/jjameson/Images".to_string(),
            mappings: mappings.iter()
                .map(|(old, new)| (old.to_string(), new.to_string()))
                .collect(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Content {
    /// `<samp>` content that should have been authored as `<kbd>`
    pub samp_as_kbd: Vec<String>,
    /// When not empty, `<kbd>` content outside this list is rendered as `<code>`
    pub allowed_kbd: Vec<String>,
    /// A lone `<kbd>` in a console block longer than this becomes a paragraph
    pub kbd_wrap_threshold: usize,
}

impl Default for Content {
    fn default() -> Self {
        let samp_as_kbd = [
            "iisapp.vbs",
            "stsadm.exe -o activatefeature",
            "stsadm.exe -o deleteweb",
            "stsadm.exe -o extendvs",
            "stsadm.exe -o upgradesolution",
            "tf.exe checkin",
            "/bypass",
        ];

        Content {
            samp_as_kbd: samp_as_kbd.iter().map(|s| s.to_string()).collect(),
            allowed_kbd: vec![],
            kbd_wrap_threshold: 50,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Output {
    pub draft: bool,
    pub archive_pages: bool,
}

impl Default for Output {
    fn default() -> Self {
        Output {
            draft: true,
            archive_pages: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub level: LogLevel,
    #[serde(default = "default_log_to_console")]
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

fn default_log_to_console() -> bool {
    true
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: LogLevel::Info,
            log_to_console: true,
            location: None,
        }
    }
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub blog: Blog,
    pub dates: Dates,
    pub images: Images,
    pub content: Content,
    pub output: Output,
    pub log: Log,
}

impl Config {
    pub fn local_zone(&self) -> io::Result<LocalZone> {
        let Some(ref time_zone) = self.dates.time_zone else {
            return Ok(LocalZone::System);
        };

        let offset: FixedOffset = parse_offset(time_zone)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("Invalid dates.time_zone: {}", e)))?;
        Ok(LocalZone::Fixed(offset))
    }
}

fn parse_path(path: PathBuf) -> PathBuf {
    if !path.starts_with("${exe_dir}") {
        return path;
    }

    let Some(exe_dir) = exe_dir() else {
        return path;
    };
    let str_path = path.to_string_lossy();
    PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy()))
}

fn exe_dir() -> Option<PathBuf> {
    let cur_exe = env::current_exe().ok()?;
    cur_exe.parent().map(Path::to_path_buf)
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    // Fail early on a bad zone rather than on the first post
    cfg.local_zone()?;

    cfg.log.location = cfg.log.location.map(parse_path);

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}

/// Looks for the configuration next to the executable, in the current
/// directory and in the user configuration directory, in that order.
pub fn find_config_path() -> Option<PathBuf> {
    let mut candidates = vec![];
    if let Some(exe_dir) = exe_dir() {
        candidates.push(exe_dir.join(CFG_FILE_NAME));
    }
    if let Ok(cur_dir) = env::current_dir() {
        candidates.push(cur_dir.join(CFG_FILE_NAME));
    }
    if let Some(cfg_dir) = dirs::config_dir() {
        candidates.push(cfg_dir.join(CFG_FILE_NAME));
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Reads the configuration from `cfg_path`, or from the first file found by
/// [`find_config_path`]. Without any file the defaults are used.
pub fn open_config(cfg_path: Option<PathBuf>) -> io::Result<Config> {
    match cfg_path.or_else(find_config_path) {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}
