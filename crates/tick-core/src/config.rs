use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone)]
pub struct Config {
    map: HashMap<String, String>,
    pub loaded_files: Vec<PathBuf>,
}

impl Config {
    #[tracing::instrument(skip(tickrc_override))]
    pub fn load(tickrc_override: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = Config {
            map: HashMap::new(),
            loaded_files: vec![],
        };

        cfg.map
            .insert("data.location".to_string(), "~/.tick".to_string());
        cfg.map
            .insert("default.command".to_string(), "list".to_string());
        cfg.map.insert("color".to_string(), "on".to_string());

        let tickrc = resolve_tickrc_path(tickrc_override)?;
        if let Some(path) = tickrc {
            info!(tickrc = %path.display(), "loading tickrc");
            cfg.load_file(&path)?;
        } else {
            debug!("no tickrc found; using defaults");
        }

        Ok(cfg)
    }

    #[tracing::instrument(skip(self, overrides))]
    pub fn apply_overrides<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (k, v) in overrides {
            let key = k.strip_prefix("rc.").unwrap_or(&k).to_string();
            debug!(key = %key, value = %v, "applying override");
            self.map.insert(key, v);
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.map.iter()
    }

    #[tracing::instrument(skip(self))]
    fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let path = expand_tilde(path);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        self.loaded_files.push(path.clone());

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        for (line_num, raw_line) in text.lines().enumerate() {
            let mut line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((before, _)) = line.split_once('#') {
                line = before.trim();
            }

            if line.is_empty() {
                continue;
            }

            if let Some(include_rest) = line.strip_prefix("include ") {
                let include_path = resolve_include_path(&base_dir, include_rest.trim())?;
                debug!(
                    file = %path.display(),
                    include = %include_path.display(),
                    line = line_num + 1,
                    "processing include"
                );

                if include_path.exists() {
                    self.load_file(&include_path)?;
                } else {
                    warn!(include = %include_path.display(), "include file does not exist; skipping");
                }
                continue;
            }

            let (k, v) = line.split_once('=').ok_or_else(|| {
                anyhow!(
                    "invalid config line {}:{}: {}",
                    path.display(),
                    line_num + 1,
                    raw_line
                )
            })?;

            let key = k.trim().to_string();
            let value = v.trim().to_string();
            trace!(key = %key, value = %value, "loaded config key");
            self.map.insert(key, value);
        }

        Ok(())
    }
}

// Only computes the path; directory creation is the datastore's concern so
// that an unwritable location degrades instead of aborting.
#[tracing::instrument(skip(cfg, override_dir))]
pub fn resolve_data_dir(cfg: &Config, override_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = override_dir {
        return Ok(path.to_path_buf());
    }

    if let Some(cfg_value) = cfg.get("data.location") {
        return Ok(expand_tilde(Path::new(&cfg_value)));
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(home.join(".tick"))
}

#[tracing::instrument(skip(override_path))]
fn resolve_tickrc_path(override_path: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = override_path {
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(tickrc_env) = std::env::var("TICKRC") {
        if tickrc_env == "/dev/null" {
            return Ok(None);
        }
        return Ok(Some(PathBuf::from(tickrc_env)));
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    let candidate = home.join(".tickrc");
    if candidate.exists() {
        return Ok(Some(candidate));
    }

    Ok(None)
}

fn resolve_include_path(base_dir: &Path, include: &str) -> anyhow::Result<PathBuf> {
    if include.trim().is_empty() {
        return Err(anyhow!("include path cannot be empty"));
    }

    let raw = PathBuf::from(include);
    let expanded = expand_tilde(&raw);
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base_dir.join(expanded))
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if let Some(rest) = text.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::Config;

    #[test]
    fn overrides_strip_the_rc_prefix() {
        let mut cfg = Config::load(Some(std::path::Path::new("/dev/null"))).expect("load config");
        cfg.apply_overrides(vec![
            ("rc.color".to_string(), "off".to_string()),
            ("default.command".to_string(), "help".to_string()),
        ]);

        assert_eq!(cfg.get("color").as_deref(), Some("off"));
        assert_eq!(cfg.get("default.command").as_deref(), Some("help"));
    }

    #[test]
    fn config_files_support_comments_and_includes() {
        let temp = tempdir().expect("tempdir");
        let extra = temp.path().join("extra.rc");
        std::fs::write(&extra, "color = off\n").expect("write extra rc");

        let main = temp.path().join("tickrc");
        std::fs::write(
            &main,
            "# comment\ndata.location = /tmp/tick-test # trailing\ninclude extra.rc\n",
        )
        .expect("write main rc");

        let cfg = Config::load(Some(&main)).expect("load config");
        assert_eq!(cfg.get("data.location").as_deref(), Some("/tmp/tick-test"));
        assert_eq!(cfg.get("color").as_deref(), Some("off"));
        assert_eq!(cfg.loaded_files.len(), 2);
    }
}
