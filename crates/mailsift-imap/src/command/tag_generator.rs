//! Command tags.

/// Hands out `A0000`, `A0001`, ... for one connection. Completion lines
/// are matched to commands by these tags.
#[derive(Debug, Clone)]
pub struct TagGenerator {
    prefix: char,
    next: u32,
}

impl TagGenerator {
    /// Starts at zero with the given prefix.
    #[must_use]
    pub const fn new(prefix: char) -> Self {
        Self { prefix, next: 0 }
    }

    /// Returns a fresh tag. At least four digits; wraps after `u32::MAX`.
    pub fn next_tag(&mut self) -> String {
        let tag = format!("{}{:04}", self.prefix, self.next);
        self.next = self.next.wrapping_add(1);
        tag
    }
}

impl Default for TagGenerator {
    fn default() -> Self {
        Self::new('A')
    }
}
