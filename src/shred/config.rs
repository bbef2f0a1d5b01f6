use std::path::PathBuf;

use crate::fs::FileType;
use crate::shred::ArgumentError;

/// The default length of the working buffer, 4MiB.
pub const DEFAULT_BUFFER_LENGTH: usize = 1 << 22;
pub const DEFAULT_FD_LIMIT: usize = 1024;
pub const DEFAULT_SOURCE: &str = "/dev/urandom";

/// Which entries are removed once they have been shredded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnlinkLevel {
    /// Leave every entry in place.
    #[default]
    None,
    /// Remove everything except block and character devices.
    SkipSpecial,
    /// Remove everything.
    All,
}

impl UnlinkLevel {
    /// Maps the number of times the unlink flag was given to a level.
    pub const fn from_count(count: u8) -> UnlinkLevel {
        match count {
            0 => UnlinkLevel::None,
            1 => UnlinkLevel::SkipSpecial,
            _ => UnlinkLevel::All,
        }
    }

    /// Whether an entry of `kind` is removed under this level.
    pub const fn applies_to(&self, kind: FileType) -> bool {
        match self {
            UnlinkLevel::None => false,
            UnlinkLevel::SkipSpecial => !kind.is_device(),
            UnlinkLevel::All => true,
        }
    }
}

/// The settings of a shredding run. Built once with the setters below and validated by
/// [`ShredConfig::validate`] before a [`Shredder`](crate::shred::Shredder) accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShredConfig {
    pub buffer_length: usize,
    pub rounds: u32,
    pub input_offset: i64,
    pub output_offset: i64,
    pub output_count: Option<u64>,
    pub fd_limit: usize,
    pub follow_symlinks: bool,
    pub cross_mounts: bool,
    pub unlink: UnlinkLevel,
    pub source: PathBuf,
}

impl ShredConfig {
    pub fn new() -> ShredConfig {
        ShredConfig::default()
    }

    pub const fn buffer_length(&mut self, value: usize) -> &mut Self {
        self.buffer_length = value;
        self
    }

    pub const fn rounds(&mut self, value: u32) -> &mut Self {
        self.rounds = value;
        self
    }

    /// Seeks the entropy source to `value` once, before the first pass.
    pub const fn input_offset(&mut self, value: i64) -> &mut Self {
        self.input_offset = value;
        self
    }

    /// Seeks every target to `value` before every round.
    pub const fn output_offset(&mut self, value: i64) -> &mut Self {
        self.output_offset = value;
        self
    }

    /// Overrides the measured size of every target.
    pub const fn output_count(&mut self, value: Option<u64>) -> &mut Self {
        self.output_count = value;
        self
    }

    pub const fn fd_limit(&mut self, value: usize) -> &mut Self {
        self.fd_limit = value;
        self
    }

    pub const fn follow_symlinks(&mut self, value: bool) -> &mut Self {
        self.follow_symlinks = value;
        self
    }

    pub const fn cross_mounts(&mut self, value: bool) -> &mut Self {
        self.cross_mounts = value;
        self
    }

    pub const fn unlink(&mut self, value: UnlinkLevel) -> &mut Self {
        self.unlink = value;
        self
    }

    pub fn source<P: Into<PathBuf>>(&mut self, value: P) -> &mut Self {
        self.source = value.into();
        self
    }

    pub fn validate(&self) -> Result<(), ArgumentError> {
        if self.buffer_length == 0 {
            Err(ArgumentError::new("buffer length must be positive"))?
        }
        if self.fd_limit == 0 {
            Err(ArgumentError::new("descriptor limit must be positive"))?
        }
        Ok(())
    }
}

impl Default for ShredConfig {
    fn default() -> Self {
        Self {
            buffer_length: DEFAULT_BUFFER_LENGTH,
            rounds: 1,
            input_offset: 0,
            output_offset: 0,
            output_count: None,
            fd_limit: DEFAULT_FD_LIMIT,
            follow_symlinks: false,
            cross_mounts: false,
            unlink: UnlinkLevel::None,
            source: PathBuf::from(DEFAULT_SOURCE),
        }
    }
}
