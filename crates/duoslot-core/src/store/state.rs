//! Per-key slot state machine.
//!
//! ```text
//!            start            commit
//! EmptyA ─────────▶ CorruptedBoth ─────▶ LatestB
//! LatestA ────────▶ WritingB ──────────▶ LatestB
//! LatestB ────────▶ WritingA ──────────▶ LatestA
//! StrandedB ──────▶ CorruptedBoth ─────▶ LatestB
//! ```
//!
//! A failed write stays in the state its start produced. At rest, `WritingX`
//! means slot X is incomplete while the other slot still serves reads, and
//! `CorruptedBoth` means no slot is complete.
//!
//! A write that fails only on the pointer flip leaves its target complete.
//! Before the first commit that is `StrandedB`: reads fall back to `B`, and
//! the next write targets `B` again because the pointer still defaults to `A`.

use serde::Serialize;

use super::slot::Slot;

/// Storage state of one logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotState {
    /// Never written; the latest pointer is absent and defaults to `A`.
    EmptyA,
    LatestA,
    WritingB,
    LatestB,
    WritingA,
    /// No complete slot. Reads miss.
    CorruptedBoth,
    /// Pointer absent but `B` complete. Reads fall back to `B`, which is also
    /// the next write's target.
    StrandedB,
}

impl SlotState {
    /// Derive the state from the raw latest pointer and complete flags.
    pub fn observe(pointer: Option<Slot>, flag_a: Option<&str>, flag_b: Option<&str>) -> Self {
        if pointer.is_none() && flag_a.is_none() && flag_b.is_none() {
            return Self::EmptyA;
        }

        let latest = pointer.unwrap_or(Slot::A);
        let flag = |slot: Slot| match slot {
            Slot::A => flag_a,
            Slot::B => flag_b,
        };
        let complete = |slot: Slot| flag(slot) == Some("true");

        let other = latest.opposite();
        match (complete(latest), complete(other)) {
            (true, _) if flag(other) == Some("false") => Self::writing(other),
            (true, _) => Self::latest(latest),
            (false, true) if pointer.is_none() => Self::StrandedB,
            // Pointed-to slot damaged; reads fall back to the other one.
            (false, true) => Self::writing(latest),
            (false, false) => Self::CorruptedBoth,
        }
    }

    fn latest(slot: Slot) -> Self {
        match slot {
            Slot::A => Self::LatestA,
            Slot::B => Self::LatestB,
        }
    }

    fn writing(slot: Slot) -> Self {
        match slot {
            Slot::A => Self::WritingA,
            Slot::B => Self::WritingB,
        }
    }

    /// Slot the next write goes to.
    pub fn target(self) -> Slot {
        match self {
            Self::EmptyA
            | Self::LatestA
            | Self::WritingB
            | Self::CorruptedBoth
            | Self::StrandedB => Slot::B,
            Self::LatestB | Self::WritingA => Slot::A,
        }
    }

    /// Slot a read is served from, if any holds a complete value.
    pub fn readable(self) -> Option<Slot> {
        match self {
            Self::LatestA | Self::WritingB => Some(Slot::A),
            Self::LatestB | Self::WritingA | Self::StrandedB => Some(Slot::B),
            Self::EmptyA | Self::CorruptedBoth => None,
        }
    }

    /// State once a write has marked its target incomplete.
    pub fn on_write_started(self) -> Self {
        match self {
            Self::EmptyA | Self::CorruptedBoth | Self::StrandedB => Self::CorruptedBoth,
            other => Self::writing(other.target()),
        }
    }

    /// State once the latest pointer has moved to the target.
    pub fn on_write_committed(self) -> Self {
        Self::latest(self.target())
    }

    /// State when a write completed its target slot but failed to move the
    /// latest pointer.
    ///
    /// With a pointer in place both slots end up complete and the pointer
    /// still wins. Without one, the target `B` becomes readable by fallback.
    pub fn on_pointer_write_failed(self) -> Self {
        match self {
            Self::EmptyA | Self::CorruptedBoth | Self::StrandedB => Self::StrandedB,
            Self::LatestA | Self::WritingB => Self::LatestA,
            Self::LatestB | Self::WritingA => Self::LatestB,
        }
    }
}

impl std::fmt::Display for SlotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::EmptyA => "EmptyA",
            Self::LatestA => "LatestA",
            Self::WritingB => "WritingB",
            Self::LatestB => "LatestB",
            Self::WritingA => "WritingA",
            Self::CorruptedBoth => "CorruptedBoth",
            Self::StrandedB => "StrandedB",
        };
        f.write_str(name)
    }
}
