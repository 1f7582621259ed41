//! Gates a parsed port must pass before it may be built.
//!
//! - the requested revision must match the recipe's
//! - a port that is not stable here needs confirmation (untested ports pass
//!   when untested builds are allowed)
//! - a recipe message is shown and needs confirmation
//!
//! Declining is an error like any other: the whole run stops.

use tracing::{info, warn};

use crate::error::{PortError, Result};
use crate::port::{ResolvedPort, Status};

/// Question asked before continuing past a gate.
pub const CONTINUE_QUESTION: &str = "Continue (y/n + enter)?";

/// Interactive confirmation channel.
pub trait Confirmer {
  /// Show informational text to the user.
  fn show(&self, text: &str);

  /// Ask a question and return the raw answer.
  fn ask(&self, question: &str) -> std::io::Result<String>;
}

/// Whether an answer accepts: its first character is `y` or `Y`.
pub fn is_affirmative(answer: &str) -> bool {
  answer
    .trim_start()
    .chars()
    .next()
    .is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
}

/// Global settings of the gates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatePolicy {
  /// Untested ports pass the status gate without confirmation.
  pub allow_untested: bool,
  /// Every confirmation is answered with yes.
  pub assume_yes: bool,
}

impl GatePolicy {
  /// Whether a port with `status` needs confirmation.
  pub fn requires_confirmation(&self, status: Status) -> bool {
    match status {
      Status::Stable => false,
      Status::Untested => !self.allow_untested,
      Status::Unsupported | Status::Broken => true,
    }
  }
}

/// Runs the gates of a port whose recipe has been parsed.
pub struct BuildGate<'a> {
  policy: GatePolicy,
  confirmer: &'a dyn Confirmer,
}

impl<'a> BuildGate<'a> {
  pub fn new(policy: GatePolicy, confirmer: &'a dyn Confirmer) -> Self {
    Self { policy, confirmer }
  }

  /// Check the revision, then the status gate, then the message gate.
  pub fn check(&self, port: &ResolvedPort, expected_revision: Option<&str>) -> Result<()> {
    check_revision(port, expected_revision)?;

    let status = port.status();
    if self.policy.requires_confirmation(status) {
      warn!(port = %port.id(), status = %status, "port is not stable on this architecture");
      self
        .confirmer
        .show(&format!("This port is {} on this architecture.", status));
      if !self.confirm() {
        return Err(PortError::UnsupportedStatusDeclined {
          port: port.id(),
          status,
        });
      }
    }

    if let Some(message) = port.message() {
      self.confirmer.show(message);
      if !self.confirm() {
        return Err(PortError::MessageDeclined { port: port.id() });
      }
    }

    Ok(())
  }

  fn confirm(&self) -> bool {
    if self.policy.assume_yes {
      return true;
    }

    match self.confirmer.ask(CONTINUE_QUESTION) {
      Ok(answer) if is_affirmative(&answer) => {
        info!("confirmed");
        true
      }
      Ok(_) => false,
      Err(e) => {
        warn!(error = %e, "failed to read confirmation, treating as decline");
        false
      }
    }
  }
}

/// Fail when a revision was requested and the parsed recipe has another one.
pub fn check_revision(port: &ResolvedPort, expected_revision: Option<&str>) -> Result<()> {
  let Some(expected) = expected_revision else {
    return Ok(());
  };

  match port.revision.as_deref() {
    Some(found) if found == expected => Ok(()),
    found => Err(PortError::RevisionMismatch {
      port: port.id(),
      expected: expected.to_string(),
      found: found.unwrap_or("none").to_string(),
    }),
  }
}
