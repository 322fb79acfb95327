//! Deprecation wrapper around command handlers.
//!
//! `wrap` is applied exactly once per dispatch, around the innermost handler,
//! so the banner and the removal veto run before the handler gets a chance to
//! parse its arguments or fail on its own.

use crate::domain::errors::CommandRemovedError;
use crate::domain::models::{DeprecationPolicy, Lifecycle, LifecycleState, RenderedMessage};
use crate::registry::{CommandHandler, Context, Streams};
use crate::services::{lifecycle, render};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    HelpRequested,
    ListingRequested,
    ExecuteRequested,
}

impl Phase {
    /// Help wins over execution wherever the flag appears before `--`.
    pub fn detect(args: &[String]) -> Phase {
        let mut before_terminator = args.iter().take_while(|a| *a != "--");
        if before_terminator.any(|a| a == "--help" || a == "-h") {
            Phase::HelpRequested
        } else {
            Phase::ExecuteRequested
        }
    }
}

struct Active<'a> {
    policy: &'a DeprecationPolicy,
    lifecycle: Lifecycle,
    message: RenderedMessage,
}

/// A handler seen through its deprecation policy, evaluated against one
/// fixed `today`.
pub struct Guarded<'a> {
    inner: &'a dyn CommandHandler,
    active: Option<Active<'a>>,
}

pub fn wrap<'a>(
    inner: &'a dyn CommandHandler,
    policy: Option<&'a DeprecationPolicy>,
    today: NaiveDate,
) -> Guarded<'a> {
    let active = policy.map(|policy| {
        let lifecycle = lifecycle::calculate(policy, today);
        Active {
            policy,
            lifecycle,
            message: render::render(policy, lifecycle),
        }
    });
    Guarded { inner, active }
}

impl Guarded<'_> {
    pub fn lifecycle(&self) -> Option<Lifecycle> {
        self.active.as_ref().map(|a| a.lifecycle)
    }

    fn emit(&self, io: &mut Streams<'_>, text_of: fn(&RenderedMessage) -> &str) {
        let Some(active) = &self.active else {
            return;
        };
        let painted = io.paint.paint(text_of(&active.message), active.message.severity);
        let _ = io.diag.write_all(painted.as_bytes());
        let _ = io.diag.flush();
    }

    fn veto(&self) -> Option<CommandRemovedError> {
        let active = self.active.as_ref()?;
        if active.lifecycle.state == LifecycleState::Overdue && active.policy.enforce_removal {
            Some(CommandRemovedError {
                removal_date: active.policy.removal_date,
                days_ago: active.lifecycle.days_left.abs(),
                alternative: active.policy.alternative.clone(),
            })
        } else {
            None
        }
    }
}

impl CommandHandler for Guarded<'_> {
    fn about(&self) -> String {
        self.inner.about()
    }

    fn help(&self, usage: &str, io: &mut Streams<'_>) -> anyhow::Result<()> {
        tracing::debug!(phase = ?Phase::HelpRequested, lifecycle = ?self.lifecycle(), "dispatch");
        self.emit(io, |m| m.help.as_str());
        self.inner.help(usage, io)
    }

    fn execute(
        &self,
        ctx: &Context<'_>,
        args: &[String],
        io: &mut Streams<'_>,
    ) -> anyhow::Result<()> {
        tracing::debug!(phase = ?Phase::ExecuteRequested, lifecycle = ?self.lifecycle(), "dispatch");
        self.emit(io, |m| m.runtime.as_str());
        if let Some(removed) = self.veto() {
            return Err(removed.into());
        }
        self.inner.execute(ctx, args, io)
    }

    fn listing_tag(&self) -> Option<&'static str> {
        tracing::debug!(phase = ?Phase::ListingRequested, lifecycle = ?self.lifecycle(), "dispatch");
        self.active.as_ref().map(|a| a.message.listing_tag)
    }
}
