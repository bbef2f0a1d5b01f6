use crate::fs::FileType;
use crate::walk::Target;

/// Decides whether an entry found by the shredder is considered at all. Rejected entries are
/// counted as skipped and left untouched.
pub trait TargetFilter {
    fn accepts(&self, target: &Target) -> bool;
}

impl<F: Fn(&Target) -> bool> TargetFilter for F {
    fn accepts(&self, target: &Target) -> bool {
        self(target)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl TargetFilter for AcceptAll {
    fn accepts(&self, _target: &Target) -> bool {
        true
    }
}

/// Rejects FIFOs and sockets. Opening a FIFO for writing blocks until a reader shows up, and
/// sockets can't be opened at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipUnwritable;

impl TargetFilter for SkipUnwritable {
    fn accepts(&self, target: &Target) -> bool {
        !matches!(target.kind, FileType::Fifo | FileType::Socket)
    }
}
