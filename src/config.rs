use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// When a [`FaultInjector`](crate::fault::FaultInjector) should refuse to
/// construct an element.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultConfig {
    /// 1-based construction count at which the first failure happens.
    /// `None` never fails.
    #[serde(default)]
    pub fail_on: Option<usize>,

    /// Keep failing on every construction after the first failure.
    #[serde(default)]
    pub sticky: bool,
}

impl FaultConfig {
    pub fn new(fail_on: Option<usize>, sticky: bool) -> Self {
        Self { fail_on, sticky }
    }

    /// Fail the `k`-th construction only.
    pub fn fail_on(k: usize) -> Self {
        Self::new(Some(k), false)
    }

    /// Fail the `k`-th construction and all later ones.
    pub fn fail_from(k: usize) -> Self {
        Self::new(Some(k), true)
    }

    pub fn never() -> Self {
        Self::default()
    }

    /// Whether the construction numbered `count` (1-based) should fail.
    pub fn should_fail(&self, count: usize) -> bool {
        match self.fail_on {
            Some(k) if self.sticky => count >= k,
            Some(k) => count == k,
            None => false,
        }
    }
}

impl FromStr for FaultConfig {
    type Err = String;

    /// Accepts `never`, `<k>` or `<k>+`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("never") {
            return Ok(FaultConfig::never());
        }
        let (digits, sticky) = match s.strip_suffix('+') {
            Some(digits) => (digits, true),
            None => (s, false),
        };
        match digits.parse::<usize>() {
            Ok(0) => Err("Fault position is 1-based; 0 never matches".to_string()),
            Ok(k) => Ok(FaultConfig::new(Some(k), sticky)),
            Err(_) => Err(format!(
                "Unknown fault plan: {}. Expected `never`, `<k>` or `<k>+`",
                s
            )),
        }
    }
}
