#![forbid(unsafe_code)]

//! # vitrine-gate
//!
//! Admission control for expensive jobs: a process-wide counter bounded by a
//! configured maximum, with immediate rejection when the bound is reached.
//! There is no queue; excess load is pushed back to the caller, not delayed.
//!
//! A successful [`AdmissionGate::try_admit`] returns an [`AdmissionPermit`]
//! that releases its slot on drop, so the release is reachable from every
//! exit path of a job, including early error returns.

mod gate;

pub use gate::{AdmissionGate, AdmissionPermit};
