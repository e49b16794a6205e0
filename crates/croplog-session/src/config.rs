use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub base: BaseConfig,
    pub refdata: RefdataConfig,
    pub outbox: OutboxConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BaseConfig {
    /// Which base (farm site) this root records for. Reference data and the
    /// task key are both addressed per base.
    pub id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefdataConfig {
    /// Directory holding one subdirectory of YAML datasets per base id,
    /// relative to the root unless absolute.
    pub root: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutboxConfig {
    pub root: String,
}

impl Config {
    pub fn default_for(base_id: &str) -> Self {
        Self {
            base: BaseConfig {
                id: base_id.to_string(),
            },
            refdata: RefdataConfig {
                root: "refdata".to_string(),
            },
            outbox: OutboxConfig {
                root: "~/.croplog/outbox".to_string(),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| "parse croplog.toml")?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path(root: &Path) -> PathBuf {
        root.join(".croplog").join("croplog.toml")
    }

    pub fn db_path(root: &Path) -> PathBuf {
        root.join(".croplog").join("croplog.db")
    }

    pub fn refdata_root(&self, root: &Path) -> PathBuf {
        root.join(&self.refdata.root)
    }

    pub fn outbox_root(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.outbox.root).to_string())
    }

    /// One persisted-snapshot slot per logical task, keyed by base.
    pub fn task_key(&self) -> String {
        format!("work_record:{}", self.base.id)
    }
}
