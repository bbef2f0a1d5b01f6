//! Command line arguments of the `fshred` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::shred::{DEFAULT_BUFFER_LENGTH, DEFAULT_FD_LIMIT, DEFAULT_SOURCE, ShredConfig, UnlinkLevel};

/// Overwrite files, devices and whole directory trees, then optionally remove them
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fshred",
    version,
    after_help = "EXAMPLES:\n    \
        fshred -r 3 -u secrets/\n    \
        fshred -s /dev/zero -uu /dev/sdx1\n    \
        fshred -s seed.bin -c 1048576 new.bin"
)]
pub struct CliArgs {
    /// Length of the working buffer in bytes
    #[arg(short = 'b', long, default_value_t = DEFAULT_BUFFER_LENGTH, value_parser = positive, value_name = "N")]
    pub buffer_length: usize,

    /// Overwrite exactly N bytes of every target instead of its size
    #[arg(short = 'c', long, value_name = "N")]
    pub count: Option<u64>,

    /// Most directory streams held open while walking a tree
    #[arg(short = 'f', long, default_value_t = DEFAULT_FD_LIMIT, value_parser = positive, value_name = "N")]
    pub fd_limit: usize,

    /// Seek the entropy source to N once, before anything is written
    #[arg(short = 'i', long, default_value_t = 0, allow_negative_numbers = true, value_name = "N")]
    pub input_offset: i64,

    /// Follow symbolic links
    #[arg(short = 'l', long)]
    pub follow_symlinks: bool,

    /// Cross file system boundaries
    #[arg(short = 'm', long)]
    pub cross_mounts: bool,

    /// Seek every target to N before every round
    #[arg(short = 'o', long, default_value_t = 0, allow_negative_numbers = true, value_name = "N")]
    pub output_offset: i64,

    /// Number of overwrite rounds
    #[arg(short = 'r', long, default_value_t = 1, value_name = "N")]
    pub rounds: u32,

    /// Where overwrite bytes are read from
    #[arg(short = 's', long, default_value = DEFAULT_SOURCE, value_name = "PATH")]
    pub source: PathBuf,

    /// Remove entries once shredded; twice to remove block and character devices too
    #[arg(short = 'u', long, action = ArgAction::Count)]
    pub unlink: u8,

    /// Log more, twice for every chunk written
    #[arg(short = 'v', long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Files, devices or directories to shred; directories are shredded recursively
    #[arg(value_name = "TARGET", required = true)]
    pub targets: Vec<PathBuf>,
}

impl CliArgs {
    pub fn to_config(&self) -> ShredConfig {
        let mut config = ShredConfig::new();
        config
            .buffer_length(self.buffer_length)
            .rounds(self.rounds)
            .input_offset(self.input_offset)
            .output_offset(self.output_offset)
            .output_count(self.count)
            .fd_limit(self.fd_limit)
            .follow_symlinks(self.follow_symlinks)
            .cross_mounts(self.cross_mounts)
            .unlink(UnlinkLevel::from_count(self.unlink))
            .source(&self.source);
        config
    }

    /// The default log filter for the verbosity asked for, used unless `RUST_LOG` is set.
    pub const fn log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "fshred=warn",
            (false, 0) => "fshred=info",
            (false, 1) => "fshred=debug",
            (false, _) => "fshred=trace",
        }
    }
}

fn positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be greater than 0".to_owned()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
