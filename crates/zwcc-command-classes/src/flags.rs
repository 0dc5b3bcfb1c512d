//! Refresh request flags.

/// Which categories of state a refresh should query.
///
/// Static state never changes after inclusion, session state is read once per
/// session, dynamic state changes at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RequestFlags(u8);

impl RequestFlags {
    /// No categories.
    pub const NONE: RequestFlags = RequestFlags(0);
    /// State fixed at inclusion.
    pub const STATIC: RequestFlags = RequestFlags(0x01);
    /// State read once per session.
    pub const SESSION: RequestFlags = RequestFlags(0x02);
    /// State that changes on its own.
    pub const DYNAMIC: RequestFlags = RequestFlags(0x04);
    /// Every category.
    pub const ALL: RequestFlags = RequestFlags(0x07);

    /// The raw bits.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Whether every category in `other` is requested.
    pub const fn contains(&self, other: RequestFlags) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Union of two flag sets.
    pub const fn union(self, other: RequestFlags) -> RequestFlags {
        RequestFlags(self.0 | other.0)
    }
}

impl std::ops::BitOr for RequestFlags {
    type Output = RequestFlags;

    fn bitor(self, rhs: RequestFlags) -> RequestFlags {
        self.union(rhs)
    }
}

impl std::fmt::Display for RequestFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = [
            (RequestFlags::STATIC, "static"),
            (RequestFlags::SESSION, "session"),
            (RequestFlags::DYNAMIC, "dynamic"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect();

        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join("|"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let flags = RequestFlags::SESSION | RequestFlags::DYNAMIC;
        assert!(flags.contains(RequestFlags::SESSION));
        assert!(flags.contains(RequestFlags::DYNAMIC));
        assert!(!flags.contains(RequestFlags::STATIC));
        assert!(!flags.contains(RequestFlags::NONE));
        assert!(RequestFlags::ALL.contains(flags));
    }

    #[test]
    fn test_display() {
        assert_eq!(RequestFlags::NONE.to_string(), "none");
        assert_eq!((RequestFlags::STATIC | RequestFlags::DYNAMIC).to_string(), "static|dynamic");
    }
}
