use crate::domain::errors::MetadataParseWarning;
use crate::domain::models::{CommandKey, DeprecationPolicy, MetaCache, PolicySource};
use crate::registry::CommandTree;
use crate::services::policy;
use serde_json::Value;
use std::collections::BTreeMap;

/// Outcome of merging remote metadata onto the local command tree.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub version: Option<String>,
    pub applied: Vec<CommandKey>,
    pub warnings: Vec<MetadataParseWarning>,
}

/// Parses every entry carrying a `deprecation` object. Bad entries become
/// warnings; for duplicate keys the last valid entry wins.
pub fn parse_entries(
    entries: &[Value],
) -> (BTreeMap<CommandKey, DeprecationPolicy>, Vec<MetadataParseWarning>) {
    let mut policies = BTreeMap::new();
    let mut warnings = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let warn = |key: Option<&CommandKey>, reason: String| MetadataParseWarning {
            index,
            key: key.map(|k| k.to_string()),
            reason,
        };

        let Some(obj) = entry.as_object() else {
            warnings.push(warn(None, "entry is not an object".to_string()));
            continue;
        };
        let Some(deprecation) = obj.get("deprecation") else {
            continue;
        };
        let key = match (field(obj, "command"), field(obj, "subcommand")) {
            (Some(c), Some(s)) => CommandKey::new(c, s),
            _ => {
                warnings.push(warn(
                    None,
                    "missing or empty command/subcommand".to_string(),
                ));
                continue;
            }
        };
        match policy::from_json(deprecation) {
            Ok(p) => {
                if policies.insert(key.clone(), p).is_some() {
                    warnings.push(warn(
                        Some(&key),
                        "duplicate entry, earlier one replaced".to_string(),
                    ));
                }
            }
            Err(e) => warnings.push(warn(Some(&key), e.to_string())),
        }
    }

    (policies, warnings)
}

/// Merges cached metadata onto `tree`. Remote policies override local
/// annotations for the same node; nothing here is fatal.
pub fn sync(mut tree: CommandTree, cache: &MetaCache) -> (CommandTree, SyncReport) {
    let (policies, mut warnings) = parse_entries(&cache.meta);
    let mut applied = Vec::new();

    for (key, policy) in policies {
        if tree.attach(&key, policy, PolicySource::Remote) {
            applied.push(key);
        } else {
            warnings.push(MetadataParseWarning {
                index: entry_index(&cache.meta, &key),
                key: Some(key.to_string()),
                reason: "no such local command".to_string(),
            });
        }
    }

    warnings.sort_by_key(|w| w.index);
    for w in &warnings {
        tracing::warn!("skipping {w}");
    }

    let report = SyncReport {
        version: cache.version.clone(),
        applied,
        warnings,
    };
    (tree, report)
}

fn field<'a>(obj: &'a serde_json::Map<String, Value>, name: &str) -> Option<&'a str> {
    obj.get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn entry_index(entries: &[Value], key: &CommandKey) -> usize {
    entries
        .iter()
        .rposition(|e| {
            e.get("command").and_then(Value::as_str).map(str::trim) == Some(key.command.as_str())
                && e.get("subcommand").and_then(Value::as_str).map(str::trim)
                    == Some(key.subcommand.as_str())
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cache(meta: Vec<Value>) -> MetaCache {
        MetaCache {
            version: Some("4.1.0".to_string()),
            meta,
        }
    }

    #[test]
    fn remote_policy_overrides_local_annotation() {
        let tree = CommandTree::builtin(true).unwrap();
        let local = tree.find("meta", "export").unwrap().policy.clone().unwrap();

        let (tree, report) = sync(
            tree,
            &cache(vec![json!({
                "command": "meta",
                "subcommand": "export",
                "deprecation": {"removal_date": "2025-05-01", "enforce_removal": true}
            })]),
        );
        let node = tree.find("meta", "export").unwrap();
        let remote = node.policy.as_ref().unwrap();
        assert_ne!(remote, &local);
        assert!(remote.enforce_removal);
        assert_eq!(node.source, Some(PolicySource::Remote));
        assert_eq!(report.applied, vec![CommandKey::new("meta", "export")]);
        assert!(report.warnings.is_empty());
        assert_eq!(report.version.as_deref(), Some("4.1.0"));
    }

    #[test]
    fn one_bad_entry_does_not_block_the_rest() {
        let tree = CommandTree::builtin(true).unwrap();
        let (tree, report) = sync(
            tree,
            &cache(vec![
                json!("garbage"),
                json!({"command": "meta", "subcommand": "show", "deprecation": {"alternative": "x"}}),
                json!({"command": "session", "deprecation": {"removal_date": "2025-06-01"}}),
                json!({"command": "session", "subcommand": "status",
                       "deprecation": {"removal_date": "2025-06-01"}}),
                json!({"command": "nope", "subcommand": "nothing",
                       "deprecation": {"removal_date": "2025-06-01"}}),
            ]),
        );
        assert_eq!(report.applied, vec![CommandKey::new("session", "status")]);
        let indices: Vec<usize> = report.warnings.iter().map(|w| w.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 4]);
        assert!(report.warnings[1].reason.contains("removal_date is required"));
        assert!(tree.find("session", "status").unwrap().policy.is_some());
        assert!(tree.find("meta", "show").unwrap().policy.is_none());
    }

    #[test]
    fn entries_without_deprecation_are_ignored() {
        let (policies, warnings) =
            parse_entries(&[json!({"command": "meta", "subcommand": "show"})]);
        assert!(policies.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn duplicate_keys_keep_the_last_valid_entry() {
        let (policies, warnings) = parse_entries(&[
            json!({"command": "meta", "subcommand": "show",
                   "deprecation": {"removal_date": "2025-06-01"}}),
            json!({"command": "meta", "subcommand": "show",
                   "deprecation": {"removal_date": "2025-07-01"}}),
        ]);
        let p = &policies[&CommandKey::new("meta", "show")];
        assert_eq!(p.removal_date.to_string(), "2025-07-01");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].index, 1);
    }
}
