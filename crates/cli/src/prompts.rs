use anyhow::{Result, bail};
use std::io::{self, IsTerminal, Write};

/// Ask for a package name until it looks like `vendor/name`.
pub fn package_name() -> Result<String> {
  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!("Cannot prompt for a package name in non-interactive mode. Pass --name vendor/name.");
  }

  loop {
    write!(io::stderr(), "Please enter the package name (vendor/name): ")?;
    io::stderr().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
      bail!("No package name given");
    }

    let input = input.trim();
    if input.contains('/') {
      return Ok(input.to_string());
    }
  }
}
