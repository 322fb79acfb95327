use crate::*;

/// Login and cleanup. These run before settings and the metadata cache are
/// loaded so that a corrupt file can always be replaced or removed.
pub fn handle_admin_commands(cli: &Cli) -> anyhow::Result<bool> {
    match &cli.command {
        Some(Commands::Login { meta }) => {
            let raw = std::fs::read_to_string(meta)
                .map_err(|e| anyhow::anyhow!("cannot read {}: {}", meta.display(), e))?;
            let response: LoginResponse = serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("invalid login response: {}", e))?;
            let cache = MetaCache {
                version: response.version,
                meta: response.meta,
            };

            let strict = load_settings()
                .map(|s| s.strict_validation)
                .unwrap_or_else(|e| {
                    tracing::warn!("ignoring unreadable settings: {e:#}");
                    false
                });
            let (_, sync_report) = sync(CommandTree::builtin(strict)?, &cache);
            save_meta_cache(&cache)?;

            let report = LoginReport {
                message: "Login successful".to_string(),
                version: cache.version.clone(),
                accepted: sync_report.applied.len(),
                skipped: sync_report
                    .warnings
                    .iter()
                    .map(|w| w.to_string())
                    .collect(),
                warnings: response.warnings,
            };
            print_one(cli.json, report, |r| {
                let mut lines = vec![r.message.clone()];
                lines.extend(r.warnings.iter().map(|w| format!("warning: {w}")));
                lines.extend(r.skipped.iter().map(|s| format!("skipped {s}")));
                lines.join("\n")
            })?;
        }
        Some(Commands::Cleanup) => {
            let removed = cleanup()?;
            if cli.json {
                print_one(true, removed, |_| String::new())?;
            } else if removed.is_empty() {
                println!("nothing to clean up");
            } else {
                println!("removed {} files", removed.len());
            }
        }
        _ => return Ok(false),
    }
    Ok(true)
}
