use core::fmt;

use manyfmt::Fmt;

use flatland_base::util::ConciseDebug;

/// Format type for [`manyfmt::Fmt`] which provides an highly condensed, ideally constant-width
/// or constant-height, user-facing format for live-updating textual status messages.
///
/// This format does not follow Rust [`fmt::Debug`] syntax, and when implemented
/// for standard Rust types may have quirks. Values may have multiple lines.
#[expect(clippy::exhaustive_structs)]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct StatusText {
    /// Types of information to include or exclude.
    pub show: ShowStatus,
}

impl StatusText {
    /// Every flag.
    pub const ALL: Self = Self {
        show: ShowStatus::all(),
    };
}

bitflags::bitflags! {
    /// Different kinds of information which [`StatusText`] may include or exclude.
    #[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
    pub struct ShowStatus: u32 {
        /// Simulation; advancing time.
        const STEP = 1 << 0;
        /// Per-body state: poses and velocities.
        const BODIES = 1 << 1;
        /// Contacts found and how they were resolved.
        const CONTACTS = 1 << 2;
    }
}

impl ShowStatus {
    #[doc(hidden)] // just a substitute for const trait impl
    pub const DEFAULT: Self = Self::STEP.union(Self::CONTACTS);
}

impl Default for ShowStatus {
    /// The per-step summary without the per-body detail, which can be long.
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Fmt<StatusText> for core::time::Duration {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>, _: &StatusText) -> fmt::Result {
        <Self as Fmt<ConciseDebug>>::fmt(self, fmt, &ConciseDebug)
    }
}
