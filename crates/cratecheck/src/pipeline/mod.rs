//! Inspection pipeline glue.
//!
//! Wires the stages in `crate::detector` together for one image:
//! resize -> grayscale -> segment -> per-slot evaluate -> aggregate -> annotate.

mod result;
mod run;

pub use result::Inspection;

pub(crate) use run::inspect;
