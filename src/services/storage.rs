use crate::domain::models::{MetaCache, Settings};
use std::path::PathBuf;

fn config_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/sunset"))
}

pub fn meta_cache_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("commands_meta.json"))
}

fn settings_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let p = settings_path()?;
    if !p.exists() {
        return Ok(Settings::default());
    }
    let raw = std::fs::read_to_string(&p)?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("invalid {}: {}", p.display(), e))
}

/// Read once at startup. A corrupt file is an error as a whole; single bad
/// entries are left to metadata sync.
pub fn load_meta_cache() -> anyhow::Result<Option<MetaCache>> {
    let p = meta_cache_path()?;
    if !p.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(p)?;
    match serde_json::from_str(&raw) {
        Ok(cache) => Ok(Some(cache)),
        Err(e) => {
            tracing::debug!("meta cache parse failure: {e}");
            anyhow::bail!("Error while loading command metadata. Please perform login again")
        }
    }
}

pub fn save_meta_cache(cache: &MetaCache) -> anyhow::Result<()> {
    let p = meta_cache_path()?;
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(p, serde_json::to_string_pretty(cache)?)?;
    Ok(())
}

/// Removes everything the tool wrote. Returns the paths that existed.
pub fn cleanup() -> anyhow::Result<Vec<String>> {
    let mut removed = Vec::new();
    for p in [meta_cache_path()?, settings_path()?] {
        if p.exists() {
            std::fs::remove_file(&p)?;
            removed.push(p.to_string_lossy().to_string());
        }
    }
    let dir = config_dir()?;
    if dir.exists() && std::fs::read_dir(&dir)?.next().is_none() {
        std::fs::remove_dir(&dir)?;
    }
    Ok(removed)
}
