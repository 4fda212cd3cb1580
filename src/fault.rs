//! Fault injection for exercising the failure paths of matrix construction.
//!
//! A [`FaultInjector`] is handed to a fixture explicitly instead of living in
//! a global. It counts every [`Tracked`] element it constructs, fails the
//! constructions its [`FaultConfig`] names, and keeps a live-instance count
//! so tests can check that nothing outlived a failed operation.
//!
//! The injector is single-threaded (`Rc` + `Cell`), matching the matrix's
//! single-owner model.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::config::FaultConfig;
use crate::math::ElementSource;

/// The failure produced by a [`FaultInjector`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("injected fault on construction #{count}")]
pub struct InjectedFault {
    pub count: usize,
}

#[derive(Debug)]
struct Ledger {
    config: FaultConfig,
    constructed: Cell<usize>,
    live: Cell<usize>,
    faults: Cell<usize>,
}

impl Ledger {
    fn construct(self: &Rc<Self>, value: i64) -> Result<Tracked, InjectedFault> {
        let count = self.constructed.get() + 1;
        self.constructed.set(count);
        if self.config.should_fail(count) {
            self.faults.set(self.faults.get() + 1);
            log::warn!("injecting fault on construction #{}", count);
            return Err(InjectedFault { count });
        }
        self.live.set(self.live.get() + 1);
        Ok(Tracked {
            value,
            ledger: Rc::clone(self),
        })
    }
}

/// Shared handle to a construction ledger. Clones observe the same counts.
#[derive(Debug, Clone)]
pub struct FaultInjector {
    ledger: Rc<Ledger>,
}

impl FaultInjector {
    pub fn new(config: FaultConfig) -> Self {
        Self {
            ledger: Rc::new(Ledger {
                config,
                constructed: Cell::new(0),
                live: Cell::new(0),
                faults: Cell::new(0),
            }),
        }
    }

    pub fn config(&self) -> FaultConfig {
        self.ledger.config
    }

    /// Construction attempts so far, failed ones included.
    pub fn constructed(&self) -> usize {
        self.ledger.constructed.get()
    }

    /// Elements constructed and not yet dropped.
    pub fn live(&self) -> usize {
        self.ledger.live.get()
    }

    /// Faults injected so far.
    pub fn faults(&self) -> usize {
        self.ledger.faults.get()
    }

    /// Construct one element holding `value`. Counts as a construction.
    pub fn make(&self, value: i64) -> anyhow::Result<Tracked> {
        Ok(self.ledger.construct(value)?)
    }
}

impl Default for FaultInjector {
    fn default() -> Self {
        Self::new(FaultConfig::default())
    }
}

impl ElementSource<Tracked> for FaultInjector {
    fn try_default(&mut self) -> anyhow::Result<Tracked> {
        self.make(0)
    }

    /// The copy is registered with this injector, whichever one built `value`.
    fn try_copy(&mut self, value: &Tracked) -> anyhow::Result<Tracked> {
        self.make(value.value)
    }
}

/// An integer element whose constructions go through a [`FaultInjector`].
pub struct Tracked {
    value: i64,
    ledger: Rc<Ledger>,
}

impl Tracked {
    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn set(&mut self, value: i64) {
        self.value = value;
    }
}

impl Clone for Tracked {
    /// # Panics
    ///
    /// Panics when the owning injector's plan fails this construction.
    fn clone(&self) -> Self {
        match self.ledger.construct(self.value) {
            Ok(tracked) => tracked,
            Err(fault) => panic!("{}", fault),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.ledger.live.set(self.ledger.live.get() - 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracked").field(&self.value).finish()
    }
}

impl fmt::Display for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
