//! Engine configuration (standing values + environment overrides).
//!
//! Two knobs:
//! - `crc_init`: register seed, read when the first stage of a packet's
//!   first beat runs (default `0xFFFFFFFF`)
//! - `crc_enable`: `false` forwards beats in bypass mode; captured per beat
//!   when the beat is accepted, so a change only affects later beats
//!
//! With the `std` feature, `FCS_CRC_INIT` and `FCS_CRC_ENABLE` override the
//! defaults returned by [`get`]. Unparseable overrides are ignored.

use crate::{crc::CRC_INIT, error::Error};

/// Standing configuration of an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EngineConfig {
  /// Seed loaded into the running register at every packet start.
  pub crc_init: u32,
  /// Compute checksums (`true`) or forward in bypass mode (`false`).
  pub crc_enable: bool,
}

impl EngineConfig {
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      crc_init: CRC_INIT,
      crc_enable: true,
    }
  }

  /// Bypass configuration: data forwarded, checksum fields zero.
  #[inline]
  #[must_use]
  pub const fn bypass() -> Self {
    Self::new().with_crc_enable(false)
  }

  #[inline]
  #[must_use]
  pub const fn with_crc_init(mut self, crc_init: u32) -> Self {
    self.crc_init = crc_init;
    self
  }

  #[inline]
  #[must_use]
  pub const fn with_crc_enable(mut self, crc_enable: bool) -> Self {
    self.crc_enable = crc_enable;
    self
  }
}

impl Default for EngineConfig {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

/// Parse a seed given in decimal or `0x`-prefixed hex. Underscores are allowed.
///
/// ```
/// use fcs::config::parse_crc_init;
///
/// assert_eq!(parse_crc_init("0xFFFF_FFFF"), Ok(0xFFFF_FFFF));
/// assert_eq!(parse_crc_init("42"), Ok(42));
/// assert!(parse_crc_init("0x1_0000_0000").is_err());
/// ```
///
/// # Errors
///
/// [`Error::Empty`] for blank input, [`Error::SeedOverflow`] for values past
/// `u32::MAX`, [`Error::InvalidSeed`] for anything else.
pub fn parse_crc_init(value: &str) -> Result<u32, Error> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Error::Empty);
  }

  let (digits, radix) = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
    Some(hex) => (hex, 16),
    None => (value, 10),
  };

  let mut acc: u32 = 0;
  let mut seen = false;
  for c in digits.chars().filter(|&c| c != '_') {
    let mut buf = [0u8; 4];
    let digit = u32::from_str_radix(c.encode_utf8(&mut buf), radix).map_err(Error::InvalidSeed)?;
    acc = acc
      .checked_mul(radix)
      .and_then(|v| v.checked_add(digit))
      .ok_or(Error::SeedOverflow)?;
    seen = true;
  }

  if !seen {
    return Err(Error::Empty);
  }
  Ok(acc)
}

/// Parse a `crc_enable` flag.
///
/// ```
/// use fcs::config::parse_enable;
///
/// assert_eq!(parse_enable("on"), Ok(true));
/// assert_eq!(parse_enable("Bypass"), Ok(false));
/// assert!(parse_enable("maybe").is_err());
/// ```
///
/// # Errors
///
/// [`Error::Empty`] for blank input, [`Error::InvalidFlag`] otherwise.
pub fn parse_enable(value: &str) -> Result<bool, Error> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Error::Empty);
  }

  const ON: [&str; 6] = ["1", "true", "on", "yes", "enable", "compute"];
  const OFF: [&str; 6] = ["0", "false", "off", "no", "disable", "bypass"];

  if ON.iter().any(|s| value.eq_ignore_ascii_case(s)) {
    return Ok(true);
  }
  if OFF.iter().any(|s| value.eq_ignore_ascii_case(s)) {
    return Ok(false);
  }
  Err(Error::InvalidFlag)
}

#[derive(Clone, Copy, Debug, Default)]
struct Overrides {
  crc_init: Option<u32>,
  crc_enable: Option<bool>,
}

#[cfg(feature = "std")]
fn read_env_overrides() -> Overrides {
  fn read<T>(name: &'static str, parse: fn(&str) -> Result<T, Error>) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match parse(&value) {
      Ok(v) => Some(v),
      Err(Error::Empty) => None,
      Err(error) => {
        tracing::warn!(var = name, %error, "ignoring invalid override");
        None
      }
    }
  }

  Overrides {
    crc_init: read("FCS_CRC_INIT", parse_crc_init),
    crc_enable: read("FCS_CRC_ENABLE", parse_enable),
  }
}

#[cfg(feature = "std")]
fn overrides() -> Overrides {
  use std::sync::OnceLock;
  static OVERRIDES: OnceLock<Overrides> = OnceLock::new();
  *OVERRIDES.get_or_init(read_env_overrides)
}

#[cfg(not(feature = "std"))]
fn overrides() -> Overrides {
  Overrides::default()
}

#[inline]
#[must_use]
fn apply(base: EngineConfig, ov: Overrides) -> EngineConfig {
  let mut config = base;
  if let Some(v) = ov.crc_init {
    config.crc_init = v;
  }
  if let Some(v) = ov.crc_enable {
    config.crc_enable = v;
  }
  config
}

/// Default configuration with environment overrides applied.
///
/// Overrides are read once per process.
#[inline]
#[must_use]
pub fn get() -> EngineConfig {
  apply(EngineConfig::default(), overrides())
}
