//! Reentrancy counters for one engine instance.
//!
//! Each recursive subsystem increments its counter on entry and restores
//! it on exit. When a counter is at its limit the guarded work does not
//! run and the caller treats the result as a failure.

use std::fmt;

use crate::RecursionLimits;

/// A bounded kind of recursion.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Guard {
    UserConversion,
    Deduction,
    Probe,
    ClassCompletion,
}

impl Guard {
    const COUNT: usize = 4;

    const fn slot(self) -> usize {
        match self {
            Guard::UserConversion => 0,
            Guard::Deduction => 1,
            Guard::Probe => 2,
            Guard::ClassCompletion => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Guard::UserConversion => "user conversion",
            Guard::Deduction => "template deduction",
            Guard::Probe => "probe",
            Guard::ClassCompletion => "class completion",
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current depth of every guarded recursion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolutionContext {
    depths: [u32; Guard::COUNT],
    limits: RecursionLimits,
}

impl ResolutionContext {
    pub fn new(limits: RecursionLimits) -> Self {
        ResolutionContext {
            depths: [0; Guard::COUNT],
            limits,
        }
    }

    pub fn depth(&self, guard: Guard) -> u32 {
        self.depths[guard.slot()]
    }

    pub fn limit(&self, guard: Guard) -> u32 {
        match guard {
            Guard::UserConversion => self.limits.user_conversion,
            Guard::Deduction => self.limits.deduction,
            Guard::Probe => self.limits.probe,
            Guard::ClassCompletion => self.limits.class_completion,
        }
    }

    /// Take one level of `guard`. Returns `false` at the limit.
    pub fn try_enter(&mut self, guard: Guard) -> bool {
        let slot = guard.slot();
        if self.depths[slot] >= self.limit(guard) {
            return false;
        }
        self.depths[slot] += 1;
        true
    }

    /// Give back one level of `guard`.
    pub fn exit(&mut self, guard: Guard) {
        let slot = guard.slot();
        self.depths[slot] = self.depths[slot].saturating_sub(1);
    }

    /// No guarded recursion is in progress.
    pub fn is_idle(&self) -> bool {
        self.depths.iter().all(|&d| d == 0)
    }
}
