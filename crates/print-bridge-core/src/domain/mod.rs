//! Domain entities for the print bridge.
//!
//! Pure data types with no I/O.  Printer descriptors and print results are
//! ephemeral: they are rebuilt from the backend's current state on every
//! request and never cached.

/// Print job requests and the custom-print validation rule.
pub mod job;

/// Printer descriptors as reported by a backend.
pub mod printer;

/// The outcome of a submitted print job.
pub mod result;

/// The fixed test page payload.
pub mod test_page;
