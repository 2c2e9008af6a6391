mod atomic;

pub use atomic::{AtomicClosure, ClosureError, ClosureKind};
