//! Draft search text reconciled with the committed [`FilterState`].
//!
//! The controller never owns the committed state. It keeps a local draft of
//! the search box, hands out a [`DebounceTicket`] for every edit, and turns
//! the newest ticket into a replacement state once the host's timer fires.
//! Hosts schedule the ticket with whatever single-shot timer they have and
//! must drop the previous timer when a new ticket arrives; stale tickets are
//! rejected here as well, so a late callback can never emit.

use std::time::Duration;

use mealbook_shared::FilterState;
use tracing::{
  debug,
  trace
};

use crate::filter;

pub const DEFAULT_DEBOUNCE: Duration =
  Duration::from_millis(300);

/// Handle for one scheduled debounce firing.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct DebounceTicket {
  generation: u64,
  delay:      Duration
}

impl DebounceTicket {
  pub fn delay(&self) -> Duration {
    self.delay
  }

  /// Delay clamped into the `u32` millisecond range browser timers take.
  pub fn delay_millis(&self) -> u32 {
    u32::try_from(
      self.delay.as_millis()
    )
    .unwrap_or(u32::MAX)
  }
}

#[derive(Debug, Clone)]
pub struct FilterController {
  draft:           String,
  observed_search: Option<String>,
  generation:      u64,
  pending:         Option<u64>,
  delay:           Duration
}

impl FilterController {
  pub fn new(
    committed: &FilterState,
    delay: Duration
  ) -> Self {
    Self {
      draft: committed
        .search
        .clone()
        .unwrap_or_default(),
      observed_search: committed
        .search
        .clone(),
      generation: 0,
      pending: None,
      delay
    }
  }

  pub fn draft(&self) -> &str {
    &self.draft
  }

  pub fn is_pending(&self) -> bool {
    self.pending.is_some()
  }

  /// Follows an externally changed search field. Returns `true` when the
  /// draft was overwritten; any pending commit is dropped without emitting.
  pub fn sync_committed(
    &mut self,
    committed: &FilterState
  ) -> bool {
    if committed.search
      == self.observed_search
    {
      return false;
    }

    self.observed_search =
      committed.search.clone();
    self.draft = committed
      .search
      .clone()
      .unwrap_or_default();
    if self.pending.take().is_some() {
      trace!(
        "pending search commit \
         superseded by external change"
      );
    }
    debug!(
      draft = %self.draft,
      "draft reset from committed \
       filters"
    );
    true
  }

  /// Replaces the draft and restarts the debounce window.
  pub fn edit_draft(
    &mut self,
    value: impl Into<String>
  ) -> DebounceTicket {
    self.draft = value.into();
    self.generation =
      self.generation.wrapping_add(1);
    self.pending = Some(self.generation);
    trace!(
      generation = self.generation,
      draft = %self.draft,
      "search draft edited"
    );
    DebounceTicket {
      generation: self.generation,
      delay:      self.delay
    }
  }

  /// Resolves an elapsed ticket against the current committed state.
  ///
  /// Returns the replacement state only for the newest live ticket, and only
  /// when the trimmed draft differs from the committed search.
  pub fn fire(
    &mut self,
    ticket: DebounceTicket,
    committed: &FilterState
  ) -> Option<FilterState> {
    if self.pending
      != Some(ticket.generation)
    {
      trace!(
        generation = ticket.generation,
        "ignoring stale debounce ticket"
      );
      return None;
    }
    self.pending = None;

    let trimmed = self.draft.trim();
    let current = committed
      .search
      .as_deref()
      .unwrap_or_default();
    if trimmed == current {
      return None;
    }

    let next =
      filter::with_search(committed, trimmed);
    debug!(
      search = ?next.search,
      "committing debounced search"
    );
    Some(next)
  }

  /// Drops any pending commit. Called when the owning view goes away.
  pub fn cancel(&mut self) {
    if self.pending.take().is_some() {
      debug!(
        "cancelled pending search commit"
      );
    }
  }
}
