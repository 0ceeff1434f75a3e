//! Amino acid reference tables.
//!
//! Both tables are plain values so a [`crate::Predictor`] can be built with
//! substituted tables in tests or for alternative classifier settings.

use crate::error::{Result, SimbaError};
use pdbtbx::*;
use std::collections::HashMap;

/// Reference maximum exposed areas (Å²) of the 20 standard residues, matching the
/// NACCESS-style classifier used for the accessibility calculation.
const MAX_AREAS: [(&str, f64); 20] = [
    ("ALA", 107.95),
    ("CYS", 134.28),
    ("ASP", 140.39),
    ("GLU", 172.25),
    ("PHE", 199.48),
    ("GLY", 80.1),
    ("HIS", 182.88),
    ("ILE", 175.12),
    ("LYS", 200.81),
    ("LEU", 178.63),
    ("MET", 194.15),
    ("ASN", 143.94),
    ("PRO", 136.13),
    ("GLN", 178.5),
    ("ARG", 238.76),
    ("SER", 116.5),
    ("THR", 139.27),
    ("VAL", 151.44),
    ("TRP", 249.36),
    ("TYR", 212.76),
];

const ONE_LETTER_CODES: [(&str, char); 20] = [
    ("ALA", 'A'),
    ("CYS", 'C'),
    ("ASP", 'D'),
    ("GLU", 'E'),
    ("PHE", 'F'),
    ("GLY", 'G'),
    ("HIS", 'H'),
    ("ILE", 'I'),
    ("LYS", 'K'),
    ("LEU", 'L'),
    ("MET", 'M'),
    ("ASN", 'N'),
    ("PRO", 'P'),
    ("GLN", 'Q'),
    ("ARG", 'R'),
    ("SER", 'S'),
    ("THR", 'T'),
    ("VAL", 'V'),
    ("TRP", 'W'),
    ("TYR", 'Y'),
];

/// Residue type → reference maximum exposed area.
#[derive(Debug, Clone)]
pub struct AccessibilityStandards {
    areas: HashMap<String, f64>,
}

impl AccessibilityStandards {
    /// Table from residue type → maximum exposed area (Å²).
    pub fn new(areas: HashMap<String, f64>) -> Self {
        Self { areas }
    }

    /// Reference area for a three-letter residue type.
    pub fn max_area(&self, residue_type: &str) -> Result<f64> {
        self.areas
            .get(residue_type)
            .copied()
            .ok_or_else(|| SimbaError::LookupFailure {
                table: "accessibility standards",
                residue_type: residue_type.to_string(),
            })
    }
}

impl Default for AccessibilityStandards {
    fn default() -> Self {
        Self::new(
            MAX_AREAS
                .iter()
                .map(|(resn, area)| (resn.to_string(), *area))
                .collect(),
        )
    }
}

/// Three-letter → one-letter amino acid codes.
#[derive(Debug, Clone)]
pub struct AminoAcidCodes {
    codes: HashMap<String, char>,
}

impl AminoAcidCodes {
    /// Table from three-letter residue type → one-letter code.
    pub fn new(codes: HashMap<String, char>) -> Self {
        Self { codes }
    }

    /// One-letter code for a three-letter residue type.
    pub fn one_letter(&self, residue_type: &str) -> Result<char> {
        self.codes
            .get(residue_type)
            .copied()
            .ok_or_else(|| SimbaError::LookupFailure {
                table: "amino acid code",
                residue_type: residue_type.to_string(),
            })
    }
}

impl Default for AminoAcidCodes {
    fn default() -> Self {
        Self::new(
            ONE_LETTER_CODES
                .iter()
                .map(|(resn, code)| (resn.to_string(), *code))
                .collect(),
        )
    }
}

/// Name helpers for [`pdbtbx::Residue`].
pub trait ResidueExt {
    /// Residue name with surrounding whitespace removed.
    fn resn(&self) -> Option<&str>;

    /// Whether the residue name has the three characters of an amino acid.
    /// Nucleotides use one or two characters and are skipped.
    fn is_amino_acid_like(&self) -> bool;
}

impl ResidueExt for Residue {
    fn resn(&self) -> Option<&str> {
        self.name().map(str::trim).filter(|name| !name.is_empty())
    }

    fn is_amino_acid_like(&self) -> bool {
        self.resn().is_some_and(|name| name.len() == 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_area_values() {
        let standards = AccessibilityStandards::default();
        assert!((standards.max_area("ALA").unwrap() - 107.95).abs() < 1e-9);
        assert!((standards.max_area("TYR").unwrap() - 212.76).abs() < 1e-9);

        for (resn, _) in ONE_LETTER_CODES.iter() {
            let area = standards.max_area(resn).unwrap();
            assert!(area > 0.0, "Max area for {resn} should be positive");
        }

        // Larger residues should have larger reference areas
        assert!(standards.max_area("TRP").unwrap() > standards.max_area("GLY").unwrap());
    }

    #[test]
    fn test_unknown_residue_is_lookup_failure() {
        let standards = AccessibilityStandards::default();
        match standards.max_area("MSE") {
            Err(SimbaError::LookupFailure { residue_type, .. }) => assert_eq!(residue_type, "MSE"),
            other => panic!("Expected lookup failure, found {other:?}"),
        }

        let codes = AminoAcidCodes::default();
        assert_eq!(codes.one_letter("TRP").unwrap(), 'W');
        assert!(codes.one_letter("UNK").is_err());
    }

    #[test]
    fn test_substituted_tables() {
        let codes = AminoAcidCodes::new(HashMap::from([("MSE".to_string(), 'M')]));
        assert_eq!(codes.one_letter("MSE").unwrap(), 'M');
        assert!(codes.one_letter("MET").is_err());
    }
}
