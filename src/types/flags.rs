use bitflags::bitflags;

/// API for object properties.
pub trait FlagIF {
    type FlagType;
    /// return true if the flag in on.
    fn is(&self, flag: Self::FlagType) -> bool;
    /// set the flag.
    fn set(&mut self, f: Self::FlagType, b: bool);
    /// toggle the flag off.
    fn turn_off(&mut self, flag: Self::FlagType);
    /// toggle the flag on.
    fn turn_on(&mut self, flag: Self::FlagType);
}

bitflags! {
    /// Misc flags used by [`Clause`](`crate::cdb::Clause`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagClause: u8 {
        /// a clause is a learnt one and is removable without any record.
        const REDUNDANT    = 0b0000_0001;
        /// a clause is logically deleted and waits for compaction.
        const DEAD         = 0b0000_0010;
        /// a clause should be used as a subsuming candidate.
        const SUBSUME      = 0b0000_0100;
        /// a clause should be used as a strengthening candidate.
        const STRENGTHEN   = 0b0000_1000;
        /// a clause is in a work queue.
        const ENQUEUED     = 0b0001_0000;
    }
}

bitflags! {
    /// Misc flags used by vars in [`AssignStack`](`crate::assign::AssignStack`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagVar: u8 {
        /// a var is eliminated and managed by the extension stack.
        const ELIMINATED   = 0b0000_0001;
        /// a var is protected from elimination, substitution and renumbering.
        const FROZEN       = 0b0000_0010;
        /// a var is replaced by its representative.
        const SUBSTITUTED  = 0b0000_0100;
        /// a var is enqueued for eliminator.
        const ENQUEUED     = 0b0000_1000;
        /// a var's occurrences changed since the last check.
        const TOUCHED      = 0b0001_0000;
    }
}

impl FlagVar {
    /// return `true` if a var can be removed from the formula.
    #[inline]
    pub fn is_removable(&self) -> bool {
        !self.intersects(FlagVar::ELIMINATED | FlagVar::FROZEN | FlagVar::SUBSTITUTED)
    }
}
