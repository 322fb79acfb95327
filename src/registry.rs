use crate::domain::models::{CommandKey, DeprecationPolicy, MetaCache, PolicySource, SessionStatus};
use crate::services::metadata::SyncReport;
use crate::services::output::write_one;
use crate::services::policy::Deprecation;
use crate::services::render::Paint;
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Output channels of one invocation. Handlers write results to `out`;
/// deprecation banners go to `diag`.
pub struct Streams<'a> {
    pub out: &'a mut dyn Write,
    pub diag: &'a mut dyn Write,
    pub paint: &'a dyn Paint,
}

/// Read-only view of the session a handler runs in.
pub struct Context<'a> {
    pub json: bool,
    /// `sunset <group> <command>`, used in argument errors.
    pub usage: String,
    pub today: NaiveDate,
    pub cache_path: PathBuf,
    pub cache: Option<&'a MetaCache>,
    pub report: &'a SyncReport,
    pub tree: &'a CommandTree,
}

pub trait CommandHandler {
    fn about(&self) -> String;

    fn help(&self, usage: &str, io: &mut Streams<'_>) -> anyhow::Result<()>;

    fn execute(&self, ctx: &Context<'_>, args: &[String], io: &mut Streams<'_>)
        -> anyhow::Result<()>;

    fn listing_tag(&self) -> Option<&'static str> {
        None
    }
}

/// Handler whose arguments are a clap `Parser`. Parsing happens inside
/// `execute`, after any wrapper around it has run.
struct ClapHandler<A> {
    run: fn(&Context<'_>, A, &mut Streams<'_>) -> anyhow::Result<()>,
}

impl<A: Parser> CommandHandler for ClapHandler<A> {
    fn about(&self) -> String {
        A::command()
            .get_about()
            .map(|a| a.to_string())
            .unwrap_or_default()
    }

    fn help(&self, usage: &str, io: &mut Streams<'_>) -> anyhow::Result<()> {
        let mut cmd = A::command().bin_name(usage);
        write!(io.out, "{}", cmd.render_help())?;
        Ok(())
    }

    fn execute(
        &self,
        ctx: &Context<'_>,
        args: &[String],
        io: &mut Streams<'_>,
    ) -> anyhow::Result<()> {
        let argv = std::iter::once("sunset").chain(args.iter().map(String::as_str));
        let matches = A::command()
            .bin_name(&ctx.usage)
            .try_get_matches_from(argv)?;
        let parsed = A::from_arg_matches(&matches)?;
        (self.run)(ctx, parsed, io)
    }
}

pub struct CommandNode {
    pub key: CommandKey,
    pub hidden: bool,
    pub handler: Box<dyn CommandHandler>,
    pub policy: Option<DeprecationPolicy>,
    pub source: Option<PolicySource>,
}

/// The local command tree. Built once at startup, merged with remote
/// metadata once, then only read.
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    pub fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Registers the built-in commands with their local annotations.
    ///
    /// An invalid annotation aborts when `strict`; otherwise the command is
    /// registered without a policy and a warning is logged.
    pub fn builtin(strict: bool) -> anyhow::Result<Self> {
        let mut tree = Self::empty();
        tree.register("meta", "show", false, handler(meta_show), None, strict)?;
        tree.register("meta", "path", false, handler(meta_path), None, strict)?;
        tree.register(
            "meta",
            "export",
            false,
            handler(meta_export),
            Some(
                Deprecation::new()
                    .removal_date("2027-03-31")
                    .deprecated_date("2026-09-01")
                    .version("0.9.0")
                    .alternative("sunset meta show --json")
                    .reason("raw cache dumps are replaced by the structured snapshot view")
                    .enforce_removal(true),
            ),
            strict,
        )?;
        tree.register("session", "status", false, handler(session_status), None, strict)?;
        tree.register("session", "debug", true, handler(session_debug), None, strict)?;
        Ok(tree)
    }

    fn register(
        &mut self,
        command: &str,
        subcommand: &str,
        hidden: bool,
        handler: Box<dyn CommandHandler>,
        annotation: Option<Deprecation>,
        strict: bool,
    ) -> anyhow::Result<()> {
        let key = CommandKey::new(command, subcommand);
        let policy = match annotation.map(Deprecation::build).transpose() {
            Ok(p) => p,
            Err(e) if strict => anyhow::bail!("invalid deprecation annotation on {key}: {e}"),
            Err(e) => {
                tracing::warn!("ignoring invalid deprecation annotation on {key}: {e}");
                None
            }
        };
        let source = policy.as_ref().map(|_| PolicySource::Local);
        self.nodes.push(CommandNode {
            key,
            hidden,
            handler,
            policy,
            source,
        });
        self.nodes.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(())
    }

    /// Replaces the policy of an existing node. Returns false for unknown keys.
    pub fn attach(
        &mut self,
        key: &CommandKey,
        policy: DeprecationPolicy,
        source: PolicySource,
    ) -> bool {
        match self.nodes.iter_mut().find(|n| &n.key == key) {
            Some(node) => {
                node.policy = Some(policy);
                node.source = Some(source);
                true
            }
            None => false,
        }
    }

    pub fn find(&self, command: &str, subcommand: &str) -> Option<&CommandNode> {
        self.nodes
            .iter()
            .find(|n| n.key.command == command && n.key.subcommand == subcommand)
    }

    pub fn has_group(&self, command: &str) -> bool {
        self.nodes.iter().any(|n| n.key.command == command)
    }

    pub fn nodes(&self) -> &[CommandNode] {
        &self.nodes
    }

    /// Nodes eligible for listings; hidden commands are filtered here.
    pub fn visible<'a>(
        &'a self,
        group: Option<&'a str>,
    ) -> impl Iterator<Item = &'a CommandNode> + 'a {
        self.nodes
            .iter()
            .filter(|n| !n.hidden)
            .filter(move |n| group.map(|g| n.key.command == g).unwrap_or(true))
    }
}

fn handler<A: Parser + 'static>(
    run: fn(&Context<'_>, A, &mut Streams<'_>) -> anyhow::Result<()>,
) -> Box<dyn CommandHandler> {
    Box::new(ClapHandler { run })
}

#[derive(Parser, Debug)]
#[command(about = "Show the active command metadata and deprecation policies")]
struct MetaShowArgs {}

#[derive(Serialize)]
struct PolicyRow {
    command: String,
    subcommand: String,
    source: PolicySource,
    policy: DeprecationPolicy,
}

#[derive(Serialize)]
struct MetaSnapshotView {
    version: Option<String>,
    entries: usize,
    policies: Vec<PolicyRow>,
    warnings: Vec<String>,
}

fn meta_show(ctx: &Context<'_>, _args: MetaShowArgs, io: &mut Streams<'_>) -> anyhow::Result<()> {
    let policies = ctx
        .tree
        .nodes()
        .iter()
        .filter_map(|n| {
            Some(PolicyRow {
                command: n.key.command.clone(),
                subcommand: n.key.subcommand.clone(),
                source: n.source?,
                policy: n.policy.clone()?,
            })
        })
        .collect();
    let view = MetaSnapshotView {
        version: ctx.report.version.clone(),
        entries: ctx.cache.map(|c| c.meta.len()).unwrap_or(0),
        policies,
        warnings: ctx.report.warnings.iter().map(|w| w.to_string()).collect(),
    };
    write_one(io.out, ctx.json, view, |v| {
        let mut lines = vec![
            format!("api version: {}", v.version.as_deref().unwrap_or("n/a")),
            format!("meta entries: {}", v.entries),
        ];
        for p in &v.policies {
            lines.push(format!(
                "{} {}\tremoval {}\t{:?}",
                p.command, p.subcommand, p.policy.removal_date, p.source
            ));
        }
        for w in &v.warnings {
            lines.push(format!("warning: {w}"));
        }
        lines.join("\n")
    })
}

#[derive(Parser, Debug)]
#[command(about = "Print the command metadata cache path")]
struct MetaPathArgs {}

fn meta_path(ctx: &Context<'_>, _args: MetaPathArgs, io: &mut Streams<'_>) -> anyhow::Result<()> {
    let path = ctx.cache_path.to_string_lossy().to_string();
    write_one(io.out, ctx.json, path, |p| p.clone())
}

#[derive(Parser, Debug)]
#[command(about = "Dump the raw cached command metadata")]
struct MetaExportArgs {
    #[arg(long, help = "Write to a file instead of stdout")]
    output: Option<PathBuf>,
}

fn meta_export(ctx: &Context<'_>, args: MetaExportArgs, io: &mut Streams<'_>) -> anyhow::Result<()> {
    let Some(cache) = ctx.cache else {
        anyhow::bail!("no command metadata cached; run `sunset login --meta <FILE>` first");
    };
    let raw = serde_json::to_string_pretty(cache)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, raw)?;
            writeln!(io.out, "exported to {}", path.display())?;
        }
        None => writeln!(io.out, "{raw}")?,
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(about = "Report whether command metadata from a login is cached")]
struct SessionStatusArgs {}

fn session_status(
    ctx: &Context<'_>,
    _args: SessionStatusArgs,
    io: &mut Streams<'_>,
) -> anyhow::Result<()> {
    let status = SessionStatus {
        logged_in: ctx.cache.is_some(),
        version: ctx.report.version.clone(),
        cache_path: ctx.cache_path.to_string_lossy().to_string(),
    };
    write_one(io.out, ctx.json, status, |s| {
        format!(
            "logged_in={} version={}",
            s.logged_in,
            s.version.as_deref().unwrap_or("n/a")
        )
    })
}

#[derive(Parser, Debug)]
#[command(about = "Internal diagnostics")]
struct SessionDebugArgs {}

fn session_debug(
    ctx: &Context<'_>,
    _args: SessionDebugArgs,
    io: &mut Streams<'_>,
) -> anyhow::Result<()> {
    writeln!(
        io.out,
        "today={} nodes={} applied={} warnings={}",
        ctx.today,
        ctx.tree.nodes().len(),
        ctx.report.applied.len(),
        ctx.report.warnings.len()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tree_carries_local_annotation() {
        let tree = CommandTree::builtin(true).unwrap();
        let export = tree.find("meta", "export").unwrap();
        assert_eq!(export.source, Some(PolicySource::Local));
        assert!(export.policy.as_ref().unwrap().enforce_removal);
        assert!(tree.find("meta", "show").unwrap().policy.is_none());
    }

    #[test]
    fn hidden_commands_are_not_visible() {
        let tree = CommandTree::builtin(true).unwrap();
        assert!(tree.find("session", "debug").is_some());
        assert!(tree
            .visible(None)
            .all(|n| n.key != CommandKey::new("session", "debug")));
        assert_eq!(tree.visible(Some("session")).count(), 1);
    }

    #[test]
    fn invalid_annotation_degrades_unless_strict() {
        let bad = || Some(Deprecation::new().removal_date("2025-13-01"));
        let mut lenient = CommandTree::empty();
        lenient
            .register("x", "y", false, handler(meta_path), bad(), false)
            .unwrap();
        assert!(lenient.find("x", "y").unwrap().policy.is_none());

        let mut strict = CommandTree::empty();
        assert!(strict
            .register("x", "y", false, handler(meta_path), bad(), true)
            .is_err());
        assert!(strict.find("x", "y").is_none());
    }

    #[test]
    fn attach_rejects_unknown_nodes() {
        let mut tree = CommandTree::builtin(true).unwrap();
        let p = Deprecation::new().removal_date("2025-06-01").build().unwrap();
        assert!(!tree.attach(&CommandKey::new("nope", "none"), p.clone(), PolicySource::Remote));
        assert!(tree.attach(&CommandKey::new("meta", "show"), p, PolicySource::Remote));
    }
}
