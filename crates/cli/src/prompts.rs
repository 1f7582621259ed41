use std::io::{self, IsTerminal, Write};

use porter_lib::gate::Confirmer;

use crate::output::print_warning;

/// Confirmation on the controlling terminal.
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
  fn show(&self, text: &str) {
    print_warning(text);
  }

  fn ask(&self, question: &str) -> io::Result<String> {
    if !io::stdin().is_terminal() {
      let reason = "Cannot prompt for confirmation in non-interactive mode. Use --yes to proceed.";
      print_warning(reason);
      return Err(io::Error::other(reason));
    }

    write!(io::stderr(), "{} ", question)?;
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
  }
}
