//! Panic containment at foreign-code boundaries.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::ResolverError;

/// Runs foreign construction code, turning a panic into
/// [`ResolverError::ConstructionPanicked`].
///
/// The closure is the last thing that runs before the caller returns, so no
/// resolver state is observed half-updated after an unwind.
pub(crate) fn catch_construction<T, F>(service: &'static str, f: F) -> Result<T, ResolverError>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        ResolverError::ConstructionPanicked {
            service,
            message: panic_message(payload.as_ref()),
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
