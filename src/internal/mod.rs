//! Internal implementation details.

pub(crate) mod unwind;

pub(crate) use unwind::catch_construction;
