//! Open flags

use bitflags::bitflags;

bitflags! {
    /// Flags accepted by `open`/`open_asset`
    ///
    /// `CREATE` without `EXCL` opens-or-creates; `CREATE | EXCL` requires
    /// the file not to exist. `TRUNC` empties an existing file at open
    /// time. `APPEND` defaults the write position to the current file
    /// size when the caller gives none.
    ///
    /// The access-mode bits (`READ`, `WRITE`, `READ_WRITE`) are recorded
    /// on the handle but not enforced on read/write.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u32 {
        /// Open for reading
        const READ = 0x01;
        /// Open for writing
        const WRITE = 0x02;
        /// Open for reading and writing
        const READ_WRITE = 0x04;
        /// Writes default to the end of the file
        const APPEND = 0x08;
        /// Create the file if it does not exist
        const CREATE = 0x10;
        /// With `CREATE`: fail if the file already exists
        const EXCL = 0x20;
        /// Empty an existing file at open time
        const TRUNC = 0x40;
    }
}

impl Default for OpenFlags {
    fn default() -> Self {
        OpenFlags::READ
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_distinct_bits() {
        let all = [
            OpenFlags::READ,
            OpenFlags::WRITE,
            OpenFlags::READ_WRITE,
            OpenFlags::APPEND,
            OpenFlags::CREATE,
            OpenFlags::EXCL,
            OpenFlags::TRUNC,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!((*a & *b).is_empty());
            }
        }
    }

    #[test]
    fn test_default_is_read() {
        assert_eq!(OpenFlags::default(), OpenFlags::READ);
    }

    #[test]
    fn test_create_excl_combination() {
        let flags = OpenFlags::CREATE | OpenFlags::EXCL;
        assert!(flags.contains(OpenFlags::CREATE));
        assert!(flags.contains(OpenFlags::EXCL));
        assert!(!flags.contains(OpenFlags::TRUNC));
    }
}
