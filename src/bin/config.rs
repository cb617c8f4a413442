use failure::{format_err, Error};
use log::debug;
use serde_derive::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_TOKEN_FILE: &str = ".token";

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    pub fitbit: Option<FitbitConfig>,
}

#[derive(Deserialize, Debug, Default)]
pub struct FitbitConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub base_url: Option<String>,
    pub token_file: Option<String>,
}

impl FitbitConfig {
    /// Overrides file values with whatever `lookup` finds for the
    /// `FITBIT_CLIENT_ID` and `FITBIT_CLIENT_SECRET` variables.
    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup("FITBIT_CLIENT_ID") {
            self.client_id = Some(id);
        }
        if let Some(secret) = lookup("FITBIT_CLIENT_SECRET") {
            self.client_secret = Some(secret);
        }
    }
}

impl Config {
    /// Load a config from the environment. A config object will be constructed
    /// from a combination of environment variables and/or config files on disk.
    /// Environment variables supercede values in files.
    pub fn load(path: Option<&str>) -> Result<Config, Error> {
        let path = match path {
            // custom path to config file, passed as a flag
            Some(path) => PathBuf::from(path),
            None => default_path()?,
        };

        let mut conf = if path.exists() {
            Config::from_toml_file(&path)?
        } else {
            debug!("no config file at {}", path.display());
            Config::default()
        };
        conf.fitbit
            .get_or_insert_with(FitbitConfig::default)
            .apply_env(|key| env::var(key).ok());
        Ok(conf)
    }

    /// Deserialize a config from a toml file without applying environment variables.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let buffer = fs::read_to_string(path)?;
        Ok(toml::from_str::<Config>(&buffer)?)
    }

    pub fn credentials(&self) -> Result<(&str, &str), Error> {
        let fitbit = self.fitbit.as_ref();
        let id = fitbit
            .and_then(|f| f.client_id.as_ref())
            .ok_or_else(|| format_err!("missing client_id; set FITBIT_CLIENT_ID"))?;
        let secret = fitbit
            .and_then(|f| f.client_secret.as_ref())
            .ok_or_else(|| format_err!("missing client_secret; set FITBIT_CLIENT_SECRET"))?;
        Ok((id.as_str(), secret.as_str()))
    }

    pub fn base_url(&self) -> Option<&str> {
        self.fitbit.as_ref().and_then(|f| f.base_url.as_ref()).map(String::as_str)
    }

    pub fn token_file(&self) -> &str {
        self.fitbit
            .as_ref()
            .and_then(|f| f.token_file.as_ref())
            .map_or(DEFAULT_TOKEN_FILE, String::as_str)
    }
}

fn default_path() -> Result<PathBuf, Error> {
    let base_dir = env::var("HOME")?;
    Ok(Path::new(&base_dir).join(".config/fitbit-grabber/conf.toml"))
}
