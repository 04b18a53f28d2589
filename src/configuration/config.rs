#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::PageLocation;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

/// Name of the clap argument holding a full problem page URL.
pub const PAGE_URL_ARG: &str = "url";

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    BaseUrl,
    Chatspace,
    ConfigFile,
    ConnectTimeout,
    Cookie,
    CsrfCookieName,
    CsrfToken,
    Language,
    Languages,
    ProblemId,
    RequestTimeout,
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        let config_path = dirs::config_dir()
            .unwrap_or_else(|| return path::PathBuf::from("."))
            .join("judgedesk/config.toml")
            .to_string_lossy()
            .to_string();

        let res = match key {
            ConfigKey::BaseUrl => "http://localhost:8000",
            ConfigKey::ConnectTimeout => "10000",
            ConfigKey::Cookie => "",
            ConfigKey::CsrfCookieName => "csrftoken",
            ConfigKey::CsrfToken => "",
            ConfigKey::Language => "py",
            ConfigKey::Languages => "py,cpp,c",
            ConfigKey::ProblemId => "",
            ConfigKey::RequestTimeout => "30000",

            // Special
            ConfigKey::Chatspace => "",
            ConfigKey::ConfigFile => &config_path,
        };

        return res.to_string();
    }

    /// Languages the selector cycles through, in order.
    pub fn languages() -> Vec<String> {
        return Config::get(ConfigKey::Languages)
            .split(',')
            .map(|lang| return lang.trim().to_string())
            .filter(|lang| return !lang.is_empty())
            .collect();
    }

    /// Page address for the configured problem, carrying the session to
    /// resume when there is one.
    pub fn page_location() -> Result<PageLocation> {
        return PageLocation::new(
            &Config::get(ConfigKey::BaseUrl),
            &Config::get(ConfigKey::ProblemId),
            &Config::get(ConfigKey::Chatspace),
        );
    }

    fn apply_page_url(page_url: &str) -> Result<()> {
        let page = PageLocation::parse(page_url)?;
        let Some(problem_id) = page.problem_id() else {
            bail!(format!(
                "{page_url} is not a problem page URL, expected a path like /problem/<id>/"
            ));
        };

        let base_url = page.base_url();
        Config::set(
            ConfigKey::BaseUrl,
            base_url.as_str().trim_end_matches('/'),
        );
        Config::set(ConfigKey::ProblemId, &problem_id);
        if let Some(session_id) = page.session_id() {
            Config::set(ConfigKey::Chatspace, &session_id);
        }

        return Ok(());
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if let Some(val) = doc.get(&key.to_string()) {
                    // Use clap value parsers to do validation.
                    let mut possible_values = vec![];
                    if let Some(arg) = cmd
                        .get_arguments()
                        .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                    {
                        possible_values = arg
                            .get_possible_values()
                            .iter()
                            .map(|e| return e.get_name().to_string())
                            .collect::<Vec<String>>();
                    }

                    if let Some(val_int) = val.as_integer() {
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        if !possible_values.is_empty()
                            && !possible_values.contains(&val_str.to_string())
                        {
                            bail!(format!("config.toml has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                        }
                        Config::set(key, val_str);
                    } else {
                        bail!(format!(
                            "config.toml has an invalid value for key '{key}', expected a string or integer"
                        ));
                    }
                }
            }
        }

        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(page_url)) = matches.try_get_one::<String>(PAGE_URL_ARG) {
                Config::apply_page_url(page_url)?;
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        for key in [ConfigKey::ConnectTimeout, ConfigKey::RequestTimeout] {
            if Config::get(key).parse::<u64>().is_err() {
                bail!(format!(
                    "'{key}' must be a number of milliseconds, got '{}'",
                    Config::get(key)
                ));
            }
        }

        tracing::debug!(
            base_url = Config::get(ConfigKey::BaseUrl),
            problem_id = Config::get(ConfigKey::ProblemId),
            language = Config::get(ConfigKey::Language),
            languages = Config::get(ConfigKey::Languages),
            chatspace = Config::get(ConfigKey::Chatspace),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::Chatspace || key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let help = arg.get_help()?.to_string();
                let mut description = help
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                if !arg.get_possible_values().is_empty() {
                    let possible_values = arg
                        .get_possible_values()
                        .iter()
                        .map(|e| return e.get_name())
                        .collect::<Vec<_>>()
                        .join(", ");
                    description = format!("{description} [possible values: {}]", possible_values);
                }

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i32>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
