//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["plenary.toml", ".plenary.toml"];
const ENV_PREFIX: &str = "PLENARY_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `PLENARY_` environment variables (`PLENARY_SESSION__AUTO_CLOSE_SECONDS=10`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./plenary.toml` or `./.plenary.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/plenary/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("plenary").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        let env_vars: Vec<String> = std::env::vars()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with(ENV_PREFIX))
            .collect();
        if env_vars.is_empty() {
            println!("  [     ] Env:     {}*", ENV_PREFIX);
        } else {
            println!("  [FOUND] Env:     {}", env_vars.join(", "));
        }

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./plenary.toml or ./.plenary.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", mark, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.session.auto_close_seconds, 30);
        assert_eq!(config.session.chair_code, "ADMIN");
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("plenary"));
    }

    #[test]
    fn test_project_file_and_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "plenary.toml",
                r#"
[session]
auto_close_seconds = 20
chair_code = "CHAIRMAN"

[roster]
delegates = ["FRANCE", "CHINA"]
"#,
            )?;
            jail.set_env("PLENARY_SESSION__AUTO_CLOSE_SECONDS", "12");

            let config = ConfigLoader::load(None).unwrap();
            assert_eq!(config.session.auto_close_seconds, 12);
            assert_eq!(config.session.chair_code, "CHAIRMAN");
            assert_eq!(config.roster.delegates, vec!["FRANCE", "CHINA"]);
            assert!(config.session.allow_abstain);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_beats_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(".plenary.toml", "[session]\nobserver_buffer = 8\n")?;
            jail.create_file(
                "custom.toml",
                "[session]\nobserver_buffer = 32\n\n[logging]\ntranscript = \"t.jsonl\"\n",
            )?;

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).unwrap();
            assert_eq!(config.session.observer_buffer, 32);
            assert_eq!(config.logging.transcript, Some(PathBuf::from("t.jsonl")));
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("plenary.toml", "[session]\nauto_close_seconds = \"soon\"\n")?;
            assert!(ConfigLoader::load(None).is_err());
            Ok(())
        });
    }
}
