//! Embedded vulnerability signature table.
//!
//! The table is compiled into the binary so the scan works without
//! external files. Each entry is a literal substring that must occur in
//! the primary source file; if a refactor moves or rewords a sink, the
//! corresponding pattern here has to move with it.

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

/// The file the signature scan reads, relative to the repository root.
/// All seven planted patterns live there.
pub const PRIMARY_SOURCE: &str = "crates/breachlab-server/src/sinks.rs";

const SIGNATURES_JSON: &str = include_str!("../signatures.json");

/// One planted vulnerability, identified by the source text that proves
/// it is still present.
#[derive(Debug, Clone, Deserialize)]
pub struct VulnSignature {
    /// Stable number used in `VULN #{id}` output.
    pub id: u8,
    /// Display name, e.g. "SQL Injection".
    pub name: String,
    /// Literal substring expected in the primary source file.
    pub pattern: String,
}

/// Parse the embedded signature table.
pub fn load() -> Result<Vec<VulnSignature>> {
    let signatures: Vec<VulnSignature> =
        serde_json::from_str(SIGNATURES_JSON).context("Failed to parse embedded signature table")?;
    ensure!(
        signatures.len() == 7,
        "signature table should list 7 vulnerabilities, found {}",
        signatures.len()
    );
    Ok(signatures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_the_seven_vulnerabilities() {
        let signatures = load().unwrap();
        let ids: Vec<u8> = signatures.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);

        let names: Vec<&str> = signatures.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Hardcoded Secret Key",
                "SSTI",
                "SQL Injection",
                "Path Traversal",
                "Insecure Deserialization",
                "Command Injection",
                "Debug Mode",
            ]
        );
    }

    #[test]
    fn test_patterns_are_nonempty_literals() {
        for signature in load().unwrap() {
            assert!(!signature.pattern.trim().is_empty(), "VULN #{}", signature.id);
        }
    }
}
