//! File metadata value types.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use time::OffsetDateTime;

/// DOS attribute bitmask as reported by the client.
///
/// The client renders attributes as an unordered letter cluster (`AH`,
/// `DR`, ...); [`from_attribute_letters`](Self::from_attribute_letters) and
/// [`attribute_letters`](Self::attribute_letters) convert between the two
/// representations and round-trip regardless of letter order.
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct FileMode(u32);

impl FileMode {
    /// No attributes set.
    pub const NORMAL: Self = Self(0);
    /// The entry is read-only.
    pub const READONLY: Self = Self(1);
    /// The entry is hidden.
    pub const HIDDEN: Self = Self(1 << 1);
    /// The entry carries the system attribute.
    pub const SYSTEM: Self = Self(1 << 2);
    /// The entry is a directory.
    pub const DIRECTORY: Self = Self(1 << 3);
    /// The entry carries the archive attribute.
    pub const ARCHIVE: Self = Self(1 << 4);

    /// Letter mapping in the client's rendering order.
    const LETTERS: [(char, Self); 5] = [
        ('R', Self::READONLY),
        ('H', Self::HIDDEN),
        ('S', Self::SYSTEM),
        ('D', Self::DIRECTORY),
        ('A', Self::ARCHIVE),
    ];

    /// True when every attribute in `other` is also set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when no attribute is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Decodes a letter cluster such as `AH` or `D`.
    ///
    /// `N` (normal) contributes no bits. Letter order is irrelevant.
    /// Returns `None` when the cluster contains a letter this layer does
    /// not know, so callers can decide whether to skip or fail.
    #[must_use]
    pub fn from_attribute_letters(cluster: &str) -> Option<Self> {
        let mut mode = Self::NORMAL;
        for letter in cluster.chars() {
            if letter == 'N' {
                continue;
            }
            let (_, bit) = Self::LETTERS.iter().find(|(l, _)| *l == letter)?;
            mode |= *bit;
        }
        Some(mode)
    }

    /// Encodes the mode as an uppercase letter cluster, `N` when empty.
    #[must_use]
    pub fn attribute_letters(self) -> String {
        if self.is_empty() {
            return "N".to_owned();
        }
        Self::LETTERS
            .iter()
            .filter(|(_, bit)| self.contains(*bit))
            .map(|(letter, _)| *letter)
            .collect()
    }
}

impl BitOr for FileMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FileMode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileMode({})", self.attribute_letters())
    }
}

/// Metadata for one entry on the share.
///
/// Produced by parsing a directory listing or an `allinfo` response;
/// immutable once built.
#[derive(Clone, Debug)]
pub struct FileInfo {
    path: String,
    name: String,
    size: u64,
    mtime: OffsetDateTime,
    mode: FileMode,
}

impl FileInfo {
    /// Assembles a metadata record.
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        size: u64,
        mtime: OffsetDateTime,
        mode: FileMode,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            size,
            mtime,
            mode,
        }
    }

    /// Returns the share-relative path of the entry.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the final path component.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the size in bytes. Zero for directories.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the last-write time in the share's timezone.
    #[must_use]
    pub const fn mtime(&self) -> OffsetDateTime {
        self.mtime
    }

    /// Returns the attribute bitmask.
    #[must_use]
    pub const fn mode(&self) -> FileMode {
        self.mode
    }

    /// True when the directory attribute is set, regardless of the size
    /// column's content.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        self.mode.contains(FileMode::DIRECTORY)
    }

    /// True when the entry is hidden.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.mode.contains(FileMode::HIDDEN)
    }

    /// True when the entry is read-only.
    #[must_use]
    pub const fn is_readonly(&self) -> bool {
        self.mode.contains(FileMode::READONLY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use time::macros::datetime;

    #[test]
    fn decodes_cluster_independent_of_order() {
        let forward = FileMode::from_attribute_letters("AH").unwrap();
        let reversed = FileMode::from_attribute_letters("HA").unwrap();
        assert_eq!(forward, reversed);
        assert!(forward.contains(FileMode::ARCHIVE));
        assert!(forward.contains(FileMode::HIDDEN));
        assert!(!forward.contains(FileMode::READONLY));
    }

    #[test]
    fn normal_decodes_to_empty_mode() {
        let mode = FileMode::from_attribute_letters("N").unwrap();
        assert!(mode.is_empty());
        assert_eq!(mode.attribute_letters(), "N");
    }

    #[test]
    fn unknown_letter_is_rejected() {
        assert_eq!(FileMode::from_attribute_letters("AX"), None);
    }

    #[test]
    fn empty_cluster_is_normal() {
        let mode = FileMode::from_attribute_letters("").unwrap();
        assert!(mode.is_empty());
    }

    #[test]
    fn directory_flag_drives_kind() {
        let info = FileInfo::new(
            "docs/sub",
            "sub",
            0,
            datetime!(2024-01-01 10:11:12 UTC),
            FileMode::DIRECTORY,
        );
        assert!(info.is_directory());
        assert_eq!(info.size(), 0);
    }

    proptest! {
        #[test]
        fn attribute_letters_round_trip(
            readonly in any::<bool>(),
            hidden in any::<bool>(),
            system in any::<bool>(),
            directory in any::<bool>(),
            archive in any::<bool>(),
        ) {
            let mut mode = FileMode::NORMAL;
            if readonly { mode |= FileMode::READONLY; }
            if hidden { mode |= FileMode::HIDDEN; }
            if system { mode |= FileMode::SYSTEM; }
            if directory { mode |= FileMode::DIRECTORY; }
            if archive { mode |= FileMode::ARCHIVE; }

            let letters = mode.attribute_letters();
            prop_assert_eq!(FileMode::from_attribute_letters(&letters), Some(mode));

            // Order must not matter either.
            let reversed: String = letters.chars().rev().collect();
            prop_assert_eq!(FileMode::from_attribute_letters(&reversed), Some(mode));
        }
    }
}
