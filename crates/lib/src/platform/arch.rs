use std::fmt;
use std::str::FromStr;

/// Machine architectures a ports tree can be built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
  Arm,
  M68k,
  Ppc,
  X86,
  X86_64,
  X86Gcc2,
}

impl Architecture {
  /// Returns the lowercase identifier used by the package system
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Arm => "arm",
      Self::M68k => "m68k",
      Self::Ppc => "ppc",
      Self::X86 => "x86",
      Self::X86_64 => "x86_64",
      Self::X86Gcc2 => "x86_gcc2",
    }
  }

  /// Returns the native machine triple (e.g., "x86_64-unknown-haiku")
  pub fn triple(&self) -> &'static str {
    match self {
      Self::Arm => "arm-unknown-haiku",
      Self::M68k => "m68k-unknown-haiku",
      Self::Ppc => "powerpc-apple-haiku",
      Self::X86 | Self::X86Gcc2 => "i586-pc-haiku",
      Self::X86_64 => "x86_64-unknown-haiku",
    }
  }

  /// Returns a triple that names the same machine but differs textually from
  /// [`Architecture::triple`], so toolchains treat the build as a cross build.
  pub fn build_triple(&self) -> &'static str {
    match self {
      Self::Arm => "arm-unknown_build-haiku",
      Self::M68k => "m68k-unknown_build-haiku",
      Self::Ppc => "powerpc-apple_build-haiku",
      Self::X86 | Self::X86Gcc2 => "i586-pc_build-haiku",
      Self::X86_64 => "x86_64-unknown_build-haiku",
    }
  }
}

impl fmt::Display for Architecture {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Architecture {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "arm" => Ok(Self::Arm),
      "m68k" => Ok(Self::M68k),
      "ppc" => Ok(Self::Ppc),
      "x86" => Ok(Self::X86),
      "x86_64" => Ok(Self::X86_64),
      "x86_gcc2" => Ok(Self::X86Gcc2),
      other => Err(format!("unknown architecture '{}'", other)),
    }
  }
}

/// Maps an architecture name to its machine triples.
pub trait TripleLookup {
  /// Native triple for the architecture, `None` if the name is unknown.
  fn native_triple(&self, architecture: &str) -> Option<String>;

  /// Synthetic same-architecture "build" triple, `None` if the name is unknown.
  fn build_triple(&self, architecture: &str) -> Option<String>;
}

/// Triple table for the architectures in [`Architecture`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownTriples;

impl TripleLookup for KnownTriples {
  fn native_triple(&self, architecture: &str) -> Option<String> {
    architecture.parse::<Architecture>().ok().map(|a| a.triple().to_string())
  }

  fn build_triple(&self, architecture: &str) -> Option<String> {
    architecture
      .parse::<Architecture>()
      .ok()
      .map(|a| a.build_triple().to_string())
  }
}

/// Returns the triple with hyphens replaced, for contexts that forbid them
pub fn triple_as_name(triple: &str) -> String {
  triple.replace('-', "_")
}
