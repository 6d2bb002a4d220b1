use clap::{CommandFactory, FromArgMatches, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SpendError};
use crate::models::MerchantSet;

// ── ViewKind ───────────────────────────────────────────────────────────────────

/// How the aggregated report is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Interactive bar charts.
    #[default]
    Chart,
    /// Interactive pivot tables.
    Table,
    /// Pretty-printed JSON report on stdout.
    Json,
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Monthly supermarket spending charts from a bank-transaction CSV
#[derive(Parser, Debug, Clone)]
#[command(
    name = "grocery-spend",
    about = "Monthly supermarket spending charts from a bank-transaction CSV",
    version
)]
pub struct Settings {
    /// CSV file with description, amount and transactiondate columns
    /// (prompted for when omitted)
    pub csv_path: Option<PathBuf>,

    /// Merchant name to match, in priority order (repeatable or comma separated)
    #[arg(
        long = "merchant",
        value_name = "NAME",
        env = "GROCERY_SPEND_MERCHANTS",
        value_delimiter = ','
    )]
    pub merchants: Vec<String>,

    /// TOML config file
    #[arg(long, env = "GROCERY_SPEND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output view
    #[arg(long, value_enum, default_value_t = ViewKind::Chart)]
    pub view: ViewKind,

    /// Hide the average monthly total line
    #[arg(long)]
    pub no_average: bool,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── FileConfig ─────────────────────────────────────────────────────────────────

/// Optional settings read from a TOML file. Every key may be omitted.
///
/// ```toml
/// merchants = ["ALBERT HEIJN", "Jumbo", "Lidl"]
/// theme = "dark"
/// show_average = true
/// view = "chart"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub merchants: Option<Vec<String>>,
    pub theme: Option<String>,
    pub show_average: Option<bool>,
    pub view: Option<ViewKind>,
}

impl FileConfig {
    /// `<config dir>/grocery-spend/config.toml`, e.g.
    /// `~/.config/grocery-spend/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("grocery-spend").join("config.toml"))
    }

    /// Parse a config file. A missing file is an error here; callers decide
    /// whether absence is acceptable.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpendError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| SpendError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML text.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

// ── RunConfig ──────────────────────────────────────────────────────────────────

/// Fully resolved settings for one run: CLI over config file over defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub csv_path: Option<PathBuf>,
    pub merchants: MerchantSet,
    pub view: ViewKind,
    pub show_average: bool,
    pub theme: String,
    pub log_level: String,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and merge the config file.
    pub fn load() -> Result<RunConfig> {
        Self::load_impl(
            std::env::args_os().collect(),
            FileConfig::default_path().as_deref(),
        )
    }

    /// Full implementation: accepts args and the fallback config path so that
    /// tests can redirect to a temporary directory.
    ///
    /// An explicit `--config` must exist; the fallback path is used only
    /// when present.
    pub fn load_impl(
        args: Vec<std::ffi::OsString>,
        fallback_config: Option<&Path>,
    ) -> Result<RunConfig> {
        Self::load_with(Settings::command(), args, fallback_config)
    }

    /// Like [`Settings::load_impl`], parsing with a caller-built `command`.
    pub fn load_with(
        command: clap::Command,
        args: Vec<std::ffi::OsString>,
        fallback_config: Option<&Path>,
    ) -> Result<RunConfig> {
        let matches = command.get_matches_from(args);
        let settings = Settings::from_arg_matches(&matches)
            .map_err(|e| SpendError::Config(e.to_string()))?;

        let file = match (&settings.config, fallback_config) {
            (Some(explicit), _) => FileConfig::load_from(explicit)?,
            (None, Some(fallback)) if fallback.is_file() => FileConfig::load_from(fallback)?,
            _ => FileConfig::default(),
        };

        settings.merge(file, &matches)
    }

    /// Combine CLI values with `file`. A flag set on the command line or via
    /// its environment variable always wins over the file.
    pub fn merge(self, file: FileConfig, matches: &clap::ArgMatches) -> Result<RunConfig> {
        let merchants = if is_arg_user_supplied(matches, "merchants") {
            MerchantSet::new(self.merchants)?
        } else if let Some(names) = file.merchants {
            MerchantSet::new(names)?
        } else {
            MerchantSet::default()
        };

        let view = if is_arg_user_supplied(matches, "view") {
            self.view
        } else {
            file.view.unwrap_or(self.view)
        };

        let theme = if is_arg_user_supplied(matches, "theme") {
            self.theme
        } else {
            match file.theme {
                Some(t) if ["light", "dark", "classic", "auto"].contains(&t.as_str()) => t,
                Some(t) => {
                    return Err(SpendError::Config(format!("unknown theme \"{}\"", t)));
                }
                None => self.theme,
            }
        };

        let show_average = if self.no_average {
            false
        } else {
            file.show_average.unwrap_or(true)
        };

        let log_level = if self.debug {
            "DEBUG".to_string()
        } else {
            self.log_level
        };

        debug!(
            "Resolved settings: merchants={:?}, view={:?}, theme={}",
            merchants.names(),
            view,
            theme
        );

        Ok(RunConfig {
            csv_path: self.csv_path,
            merchants,
            view,
            show_average,
            theme,
            log_level,
        })
    }
}

// ── Helper: check if an arg was set by the user ────────────────────────────────

/// Returns `true` when `name` came from the command line or its environment
/// variable rather than a default.
fn is_arg_user_supplied(matches: &clap::ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(clap::parser::ValueSource::CommandLine)
            | Some(clap::parser::ValueSource::EnvVariable)
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<std::ffi::OsString> {
        std::iter::once("grocery-spend")
            .chain(list.iter().copied())
            .map(Into::into)
            .collect()
    }

    /// The command without its environment fallbacks, so the developer's
    /// shell cannot leak into results.
    fn command_without_env() -> clap::Command {
        Settings::command()
            .mut_arg("merchants", |a| a.env(None::<&'static str>))
            .mut_arg("config", |a| a.env(None::<&'static str>))
    }

    fn parse(list: &[&str]) -> Settings {
        let matches = command_without_env().get_matches_from(args(list));
        Settings::from_arg_matches(&matches).expect("settings")
    }

    fn load(list: &[&str], fallback: Option<&Path>) -> Result<RunConfig> {
        Settings::load_with(command_without_env(), args(list), fallback)
    }

    fn write_config(tmp: &TempDir, body: &str) -> PathBuf {
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, body).expect("write config");
        path
    }

    // ── CLI parsing ───────────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = parse(&[]);

        assert!(settings.csv_path.is_none());
        assert!(settings.merchants.is_empty());
        assert!(settings.config.is_none());
        assert_eq!(settings.view, ViewKind::Chart);
        assert!(!settings.no_average);
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "WARNING");
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_cli_positional_path_and_view() {
        let settings = parse(&["bank.csv", "--view", "table", "--no-average"]);
        assert_eq!(settings.csv_path, Some(PathBuf::from("bank.csv")));
        assert_eq!(settings.view, ViewKind::Table);
        assert!(settings.no_average);
    }

    #[test]
    fn test_settings_cli_merchants_repeat_and_comma() {
        let settings = parse(&["--merchant", "Lidl,Aldi", "--merchant", "ALBERT HEIJN"]);
        assert_eq!(settings.merchants, vec!["Lidl", "Aldi", "ALBERT HEIJN"]);
    }

    // ── load_impl ─────────────────────────────────────────────────────────────

    #[test]
    fn test_load_defaults_without_config() {
        let tmp = TempDir::new().expect("tempdir");
        let missing = tmp.path().join("none.toml");

        let run = load(&["data.csv"], Some(&missing)).unwrap();

        assert_eq!(run.csv_path, Some(PathBuf::from("data.csv")));
        assert_eq!(run.merchants, MerchantSet::default());
        assert_eq!(run.view, ViewKind::Chart);
        assert!(run.show_average);
        assert_eq!(run.theme, "auto");
        assert_eq!(run.log_level, "WARNING");
    }

    #[test]
    fn test_load_uses_fallback_config_when_present() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_config(
            &tmp,
            "merchants = [\"Lidl\", \"Jumbo\"]\ntheme = \"light\"\nshow_average = false\nview = \"json\"\n",
        );

        let run = load(&[], Some(&path)).unwrap();

        assert_eq!(run.merchants.names(), &["Lidl", "Jumbo"]);
        assert_eq!(run.theme, "light");
        assert!(!run.show_average);
        assert_eq!(run.view, ViewKind::Json);
    }

    #[test]
    fn test_load_cli_overrides_config() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_config(&tmp, "merchants = [\"Lidl\"]\ntheme = \"light\"\nview = \"json\"\n");

        let run = load(
            &["--merchant", "Aldi", "--theme", "dark", "--view", "table"],
            Some(&path),
        )
        .unwrap();

        assert_eq!(run.merchants.names(), &["Aldi"]);
        assert_eq!(run.theme, "dark");
        assert_eq!(run.view, ViewKind::Table);
    }

    #[test]
    fn test_load_explicit_config_must_exist() {
        let tmp = TempDir::new().expect("tempdir");
        let missing = tmp.path().join("absent.toml");
        let missing_str = missing.to_string_lossy().to_string();

        let err = load(&["--config", &missing_str], None).unwrap_err();
        assert!(matches!(err, SpendError::Config(_)));
    }

    #[test]
    fn test_load_rejects_unknown_config_key() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_config(&tmp, "merchant = [\"Lidl\"]\n");

        let err = load(&[], Some(&path)).unwrap_err();
        assert!(matches!(err, SpendError::Config(_)));
    }

    #[test]
    fn test_load_rejects_unknown_config_theme() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_config(&tmp, "theme = \"neon\"\n");

        let err = load(&[], Some(&path)).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: unknown theme \"neon\"");
    }

    #[test]
    fn test_load_rejects_empty_merchant_list_in_config() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_config(&tmp, "merchants = []\n");

        assert!(load(&[], Some(&path)).is_err());
    }

    #[test]
    fn test_load_debug_overrides_log_level() {
        let run = load(&["--debug", "--log-level", "ERROR"], None).unwrap();
        assert_eq!(run.log_level, "DEBUG");
    }

    #[test]
    fn test_no_average_beats_config() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_config(&tmp, "show_average = true\n");

        let run = load(&["--no-average"], Some(&path)).unwrap();
        assert!(!run.show_average);
    }

    #[test]
    fn test_merchants_env_var_beats_config() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_config(&tmp, "merchants = [\"Lidl\"]\n");
        let command = command_without_env()
            .mut_arg("merchants", |a| a.env("GROCERY_SPEND_TEST_MERCHANTS"));

        std::env::set_var("GROCERY_SPEND_TEST_MERCHANTS", "Aldi,Jumbo");
        let run = Settings::load_with(command, args(&[]), Some(&path));
        std::env::remove_var("GROCERY_SPEND_TEST_MERCHANTS");

        assert_eq!(run.unwrap().merchants.names(), &["Aldi", "Jumbo"]);
    }

    #[test]
    fn test_file_config_parse_empty() {
        assert_eq!(FileConfig::parse("").unwrap(), FileConfig::default());
    }
}
