use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "bookshelf.yaml";

#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(about = "Runs the bookshelf service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct App {
    pub port: u16,
    pub password_file: PathBuf,
    pub static_dir: PathBuf,
    pub admin_page: PathBuf,
}

impl Default for App {
    fn default() -> Self {
        App {
            port: 8080,
            password_file: PathBuf::from("./password.txt"),
            static_dir: PathBuf::from("./static"),
            admin_page: PathBuf::from("./admin_static/index.html"),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub app: App,
}

impl Config {
    /// Loads the explicitly requested file, or `bookshelf.yaml` in the working
    /// directory when present, or falls back to defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Config::new(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::new(DEFAULT_CONFIG_PATH),
            None => Ok(Config::default()),
        }
    }

    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        let yaml_with_env = substitute_env_vars(yaml_str);
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }
}

/// Expands `${VAR}` and `${VAR:-default}`. Unset variables without a default
/// expand to an empty string.
fn substitute_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };

        out.push_str(&rest[..start]);
        let expr = &rest[start + 2..start + len];
        let value = match expr.split_once(":-") {
            Some((name, default)) => env::var(name).unwrap_or_else(|_| default.to_string()),
            None => env::var(expr).unwrap_or_else(|_| {
                tracing::warn!(var = expr, "environment variable not found");
                String::new()
            }),
        };
        out.push_str(&value);
        rest = &rest[start + len + 1..];
    }

    out.push_str(rest);
    out
}
