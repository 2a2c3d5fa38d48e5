use bitflags::bitflags;

bitflags! {
    /// Contexts in which a directive is legal.
    ///
    /// A command is accepted when its mask intersects the mask of the block being
    /// dispatched or contains [`CommandType::MAIN`]. Modules may define their own
    /// block bits above the named ones with [`CommandType::from_bits_retain`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CommandType: u32 {
        /// Top level of the document. Commands carrying this bit are legal everywhere.
        const MAIN = 1 << 0;
        /// Inside an `events { ... }` block.
        const EVENT = 1 << 1;

        const ANY = Self::MAIN.bits() | Self::EVENT.bits();
    }
}

bitflags! {
    /// Classifies a module for the dispatcher's optional module-type filter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModuleType: u32 {
        const CORE = 1 << 28;
        const EVENT = 1 << 29;
        /// Configuration-only modules are scanned regardless of the active filter.
        const CONFIG = 1 << 31;
    }
}

impl Default for CommandType {
    fn default() -> Self {
        Self::MAIN
    }
}

impl Default for ModuleType {
    fn default() -> Self {
        Self::CORE
    }
}

impl CommandType {
    /// Whether a command declared with `self` may be applied while `current` is active.
    #[must_use]
    pub const fn allowed_in(self, current: Self) -> bool {
        self.intersects(current) || self.intersects(Self::MAIN)
    }
}

impl ModuleType {
    /// Whether a module of this type is eligible under the given filter.
    #[must_use]
    pub fn eligible_under(self, filter: Option<Self>) -> bool {
        filter.is_none_or(|filter| self.contains(Self::CONFIG) || self.intersects(filter))
    }
}
