//! Configuration management for the topology validator.
//!
//! Handles:
//! - Command-line argument parsing
//! - Project configuration file (`.topo-validate.toml`)
//! - Tag table directory configuration

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::graph::EntityId;
use crate::validation::Validator;

/// Project config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".topo-validate.toml";

/// Command-line arguments for the topology validator
#[derive(Debug, Parser)]
#[command(name = "topo-validate")]
#[command(about = "Topology validation for map graphs")]
#[command(version)]
pub struct Args {
    /// Graph document to validate (JSON)
    pub input: PathBuf,

    /// Highway classification table
    #[arg(long, help = "TOML file with the routable highway values")]
    pub tags: Option<PathBuf>,

    /// Project configuration file
    #[arg(long, help = "Project config file (default: ./.topo-validate.toml)")]
    pub config: Option<PathBuf>,

    /// Only run these rules
    #[arg(long = "rule", value_name = "TYPE", help = "Rule to run (repeatable)")]
    pub rules: Vec<String>,

    /// Only validate these entities
    #[arg(long = "entity", value_name = "ID", help = "Entity id such as w12 or n-3 (repeatable)")]
    pub entities: Vec<EntityId>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Apply the first applicable fix of issue N (1-based) and re-validate
    #[arg(long, value_name = "N")]
    pub fix: Option<usize>,

    /// Log level for the validator
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Contents of a project config file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub disabled_rules: Vec<String>,
    /// Tag table, relative to the config file
    pub tags: Option<PathBuf>,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        if let (Some(tags), Some(base)) = (config.tags.as_mut(), path.parent()) {
            if tags.is_relative() {
                *tags = base.join(&*tags);
            }
        }
        Ok(config)
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    /// Explicit tag table (CLI first, then project config)
    pub tags: Option<PathBuf>,
    /// Directories searched for a user `tags.toml`
    pub tag_dirs: Vec<PathBuf>,
    /// Rules selected on the command line; empty means all
    pub rules: Vec<String>,
    pub disabled_rules: Vec<String>,
    pub entities: Vec<EntityId>,
    pub format: OutputFormat,
    pub fix: Option<usize>,
    /// Log level
    pub log_level: String,
    /// Project config file that was loaded, if any
    pub project_config_path: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Self::from_args_in(args, &cwd)
    }

    /// Like [`Config::from_args`], looking for the project config in `dir`
    pub fn from_args_in(args: Args, dir: &Path) -> Result<Self> {
        let project_config_path = match args.config {
            Some(path) => Some(path),
            None => Some(dir.join(PROJECT_CONFIG_FILE)).filter(|p| p.is_file()),
        };
        let project = match &project_config_path {
            Some(path) => {
                log::debug!("Using project config {}", path.display());
                ProjectConfig::load(path)?
            }
            None => ProjectConfig::default(),
        };

        let mut tag_dirs = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            tag_dirs.push(config_dir.join("topo-validate"));
        }

        // Rules asked for by name are not disabled by the project file
        let disabled_rules = project
            .disabled_rules
            .into_iter()
            .filter(|kind| !args.rules.contains(kind))
            .collect();

        Ok(Config {
            input: args.input,
            tags: args.tags.or(project.tags),
            tag_dirs,
            rules: args.rules,
            disabled_rules,
            entities: args.entities,
            format: args.format,
            fix: args.fix,
            log_level: args.log_level,
            project_config_path,
        })
    }

    pub fn has_project_config(&self) -> bool {
        self.project_config_path.is_some()
    }

    /// Enable exactly the configured rules on `validator`.
    ///
    /// Unknown rule names on the command line are an error; unknown names in
    /// the project file are logged and ignored.
    pub fn apply_rules(&self, validator: &mut Validator) -> Result<()> {
        let known = validator.rule_kinds();

        for kind in &self.rules {
            if !known.contains(&kind.as_str()) {
                bail!("Unknown rule '{}' (known: {})", kind, known.join(", "));
            }
        }
        if !self.rules.is_empty() {
            for kind in &known {
                if !self.rules.iter().any(|r| r == kind) {
                    validator.disable(kind);
                }
            }
        }

        for kind in &self.disabled_rules {
            if !validator.disable(kind) {
                log::warn!("Ignoring unknown rule '{}' in project config", kind);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["topo-validate", "doc.json"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_args() {
        let args = args(&["--entity", "w-1", "--entity", "r7", "--format", "json", "--fix", "2"]);
        assert_eq!(args.input, PathBuf::from("doc.json"));
        assert_eq!(args.entities, vec![EntityId::way(-1), EntityId::relation(7)]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.fix, Some(2));
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_invalid_entity_id_rejected() {
        assert!(Args::try_parse_from(["topo-validate", "doc.json", "--entity", "x1"]).is_err());
    }

    #[test]
    fn test_rule_selection() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_args_in(args(&["--rule", "missing_role"]), dir.path()).unwrap();
        assert!(!config.has_project_config());

        let mut validator = Validator::with_default_rules();
        config.apply_rules(&mut validator).unwrap();
        assert!(validator.is_enabled("missing_role"));
        assert!(!validator.is_enabled("disconnected_way"));
    }

    #[test]
    fn test_unknown_cli_rule() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_args_in(args(&["--rule", "crossing_ways"]), dir.path()).unwrap();
        assert!(config
            .apply_rules(&mut Validator::with_default_rules())
            .is_err());
    }
}
