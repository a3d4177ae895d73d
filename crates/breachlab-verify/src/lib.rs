//! Setup verification for the lab.
//!
//! Runs six checks against a checkout and reports a single pass/fail
//! verdict: toolchain version, locked dependencies, project files,
//! directories, seeded database, and the seven vulnerability signatures
//! that must remain present in the handler source.

pub mod checks;
pub mod report;
pub mod signatures;

pub use checks::{DatabaseStatus, run};
pub use report::{StageResult, VerifyReport};
pub use signatures::{PRIMARY_SOURCE, VulnSignature, load as load_signatures};
