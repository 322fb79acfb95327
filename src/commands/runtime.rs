use crate::*;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Everything resident for one invocation: the clock reading, the cached
/// metadata and the merged command tree. Built once, then only borrowed.
pub struct Session {
    pub today: NaiveDate,
    pub cache_path: PathBuf,
    pub cache: Option<MetaCache>,
    pub tree: CommandTree,
    pub report: SyncReport,
}

impl Session {
    pub fn open(settings: &Settings, today: NaiveDate) -> anyhow::Result<Self> {
        let cache_path = meta_cache_path()?;
        let cache = load_meta_cache()?;
        let tree = CommandTree::builtin(settings.strict_validation)?;
        let (tree, report) = match &cache {
            Some(c) => sync(tree, c),
            None => (tree, SyncReport::default()),
        };
        tracing::info!(
            %today,
            applied = report.applied.len(),
            warnings = report.warnings.len(),
            "session ready"
        );
        Ok(Self {
            today,
            cache_path,
            cache,
            tree,
            report,
        })
    }

    fn context(&self, json: bool, usage: String) -> Context<'_> {
        Context {
            json,
            usage,
            today: self.today,
            cache_path: self.cache_path.clone(),
            cache: self.cache.as_ref(),
            report: &self.report,
            tree: &self.tree,
        }
    }

    fn guarded<'a>(&'a self, node: &'a CommandNode) -> Guarded<'a> {
        wrap(node.handler.as_ref(), node.policy.as_ref(), self.today)
    }
}

pub fn handle_runtime_commands(
    cli: &Cli,
    session: &Session,
    paint: &dyn Paint,
) -> anyhow::Result<()> {
    match &cli.command {
        None => list_commands(cli, session, None),
        Some(Commands::List { group }) => list_commands(cli, session, group.as_deref()),
        Some(Commands::Lifecycle {
            command,
            subcommand,
        }) => {
            let report = lifecycle_report(session, command, subcommand)?;
            print_one(cli.json, report, |r| match (&r.state, r.days_left) {
                (Some(state), Some(days)) => format!(
                    "{} {}\t{}\tdays_left={}\tremoval={}\tenforce={}",
                    r.command,
                    r.subcommand,
                    state,
                    days,
                    r.removal_date.as_deref().unwrap_or("n/a"),
                    r.enforce_removal
                ),
                _ => format!("{} {}\tnot deprecated", r.command, r.subcommand),
            })
        }
        Some(Commands::Tree(args)) => dispatch(cli, session, args, paint),
        Some(Commands::Login { .. } | Commands::Cleanup) => Ok(()),
    }
}

fn list_commands(cli: &Cli, session: &Session, group: Option<&str>) -> anyhow::Result<()> {
    if let Some(g) = group {
        if !session.tree.has_group(g) {
            anyhow::bail!("unknown command group: {}", g);
        }
    }
    let items: Vec<ListItem> = session
        .tree
        .visible(group)
        .map(|node| ListItem {
            command: node.key.command.clone(),
            subcommand: node.key.subcommand.clone(),
            about: node.handler.about(),
            tag: session.guarded(node).listing_tag().map(str::to_string),
        })
        .collect();
    print_out(cli.json, &items, |i| {
        let tag = i.tag.as_ref().map(|t| format!(" {t}")).unwrap_or_default();
        format!("{} {}{}\t{}", i.command, i.subcommand, tag, i.about)
    })
}

fn lifecycle_report(
    session: &Session,
    command: &str,
    subcommand: &str,
) -> anyhow::Result<LifecycleReport> {
    let node = session
        .tree
        .find(command, subcommand)
        .ok_or_else(|| anyhow::anyhow!("unknown command: {} {}", command, subcommand))?;
    let guarded = session.guarded(node);
    let lifecycle = guarded.lifecycle();
    Ok(LifecycleReport {
        command: command.to_string(),
        subcommand: subcommand.to_string(),
        deprecated: node.policy.is_some(),
        source: node.source,
        removal_date: node.policy.as_ref().map(|p| p.removal_date.to_string()),
        state: lifecycle.map(|l| l.state),
        days_left: lifecycle.map(|l| l.days_left),
        severity: lifecycle.map(|l| severity(l.state)),
        enforce_removal: node.policy.as_ref().map(|p| p.enforce_removal).unwrap_or(false),
        listing_tag: guarded.listing_tag().map(str::to_string),
    })
}

/// `sunset <group> [<command> [args...]]`.
fn dispatch(
    cli: &Cli,
    session: &Session,
    args: &[String],
    paint: &dyn Paint,
) -> anyhow::Result<()> {
    let Some(group) = args.first().map(String::as_str) else {
        return list_commands(cli, session, None);
    };
    let subcommand = match args.get(1) {
        Some(s) if !s.starts_with('-') => s.as_str(),
        _ => return list_commands(cli, session, Some(group)),
    };
    let Some(node) = session.tree.find(group, subcommand) else {
        anyhow::bail!("unknown command: {} {}", group, subcommand);
    };

    let rest = &args[2..];
    let guarded = session.guarded(node);
    let usage = format!("sunset {} {}", group, subcommand);
    let ctx = session.context(cli.json, usage.clone());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut diag = std::io::stderr();
    let mut io = Streams {
        out: &mut out,
        diag: &mut diag,
        paint,
    };

    match Phase::detect(rest) {
        Phase::HelpRequested => guarded.help(&usage, &mut io),
        _ => guarded.execute(&ctx, rest, &mut io),
    }
}
