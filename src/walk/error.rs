use derive_more::{Display, Error, IsVariant};

use crate::fs::OsError;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error, IsVariant)]
pub enum WalkError {
    #[display("cannot stat entry: {_0}")]
    Stat(OsError),
    #[display("cannot open directory: {_0}")]
    OpenDirectory(OsError),
    #[display("cannot read directory: {_0}")]
    ReadDirectory(OsError),
}
