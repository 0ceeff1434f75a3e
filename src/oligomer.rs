//! Homo-oligomer detection.
//!
//! Two strategies exist. [`classify`] compares wild-type codes residue by residue
//! and tolerates chains of different length (missing density). The legacy
//! [`classify_by_sequence`] compares whole chain sequences and reports chains with
//! unresolved termini as different.

use crate::accessibility::ResidueAccessibility;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Chain composition of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OligomerClassification {
    /// More than one chain is present
    pub multi_chain: bool,
    /// All chains agree on the wild-type residue at every position
    pub homogeneous: bool,
}

impl OligomerClassification {
    /// Several chains with identical wild-type residues.
    pub fn is_homo_oligomer(&self) -> bool {
        self.multi_chain && self.homogeneous
    }
}

impl fmt::Display for OligomerClassification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.multi_chain, self.homogeneous) {
            (true, true) => write!(f, "homooligomer"),
            (true, false) => write!(f, "heterooligomer"),
            (false, _) => write!(f, "monomer"),
        }
    }
}

/// How chains are compared when deciding whether a structure is a homo-oligomer.
#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum HomogeneityMethod {
    /// Compare wild-type codes at each residue number
    #[default]
    Residue,
    /// Compare complete chain sequences
    Sequence,
}

impl fmt::Display for HomogeneityMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HomogeneityMethod::Residue => write!(f, "residue"),
            HomogeneityMethod::Sequence => write!(f, "sequence"),
        }
    }
}

/// Classify a structure from its per-residue accessibility rows.
pub fn classify(rows: &[ResidueAccessibility]) -> OligomerClassification {
    let chains: HashSet<&str> = rows.iter().map(|row| row.chain.as_str()).collect();

    let mut wild_by_number: HashMap<&str, HashSet<char>> = HashMap::new();
    for row in rows {
        wild_by_number
            .entry(row.number.as_str())
            .or_default()
            .insert(row.wild);
    }

    OligomerClassification {
        multi_chain: chains.len() > 1,
        homogeneous: wild_by_number.values().all(|codes| codes.len() == 1),
    }
}

/// Classify a structure from whole chain sequences (chain ID → sequence).
///
/// Chains with empty sequences are ignored.
pub fn classify_by_sequence(sequences: &BTreeMap<String, String>) -> OligomerClassification {
    let non_empty: Vec<&String> = sequences.values().filter(|seq| !seq.is_empty()).collect();
    let distinct: HashSet<&String> = non_empty.iter().copied().collect();

    OligomerClassification {
        multi_chain: non_empty.len() > 1,
        homogeneous: distinct.len() == 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(chain: &str, serial: isize, wild: char) -> ResidueAccessibility {
        ResidueAccessibility::new(chain, serial, "", wild, 0.5)
    }

    #[test]
    fn test_single_chain() {
        let rows = vec![row("A", 1, 'G'), row("A", 2, 'A')];
        let class = classify(&rows);
        assert!(!class.multi_chain);
        assert!(class.homogeneous);
        assert!(!class.is_homo_oligomer());
        assert_eq!(class.to_string(), "monomer");
    }

    #[test]
    fn test_homodimer_with_missing_density() {
        // Chain B lacks residue 3 but agrees everywhere it is resolved
        let rows = vec![
            row("A", 1, 'G'),
            row("A", 2, 'A'),
            row("A", 3, 'S'),
            row("B", 1, 'G'),
            row("B", 2, 'A'),
        ];
        let class = classify(&rows);
        assert!(class.is_homo_oligomer());
        assert_eq!(class.to_string(), "homooligomer");
    }

    #[test]
    fn test_heterodimer() {
        let rows = vec![row("A", 1, 'G'), row("A", 2, 'A'), row("B", 1, 'A')];
        let class = classify(&rows);
        assert!(class.multi_chain);
        assert!(!class.homogeneous);
        assert_eq!(class.to_string(), "heterooligomer");
    }

    #[test]
    fn test_chain_order_does_not_matter() {
        let rows = vec![
            row("A", 1, 'G'),
            row("B", 1, 'G'),
            row("C", 1, 'V'),
            row("A", 2, 'K'),
            row("C", 2, 'K'),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();
        let mut by_chain = rows.clone();
        by_chain.sort_by(|a, b| b.chain.cmp(&a.chain));

        let expected = classify(&rows);
        assert_eq!(classify(&reversed), expected);
        assert_eq!(classify(&by_chain), expected);
        assert!(!expected.homogeneous);
    }

    #[test]
    fn test_insertion_codes_are_separate_positions() {
        let rows = vec![
            ResidueAccessibility::new("A", 52, "", 'S', 0.1),
            ResidueAccessibility::new("A", 52, "A", 'T', 0.1),
            ResidueAccessibility::new("B", 52, "", 'S', 0.1),
            ResidueAccessibility::new("B", 52, "A", 'T', 0.1),
        ];
        assert!(classify(&rows).is_homo_oligomer());
    }

    #[test]
    fn test_sequence_strategy() {
        let homo = BTreeMap::from([
            ("A".to_string(), "MKV".to_string()),
            ("B".to_string(), "MKV".to_string()),
            ("C".to_string(), String::new()),
        ]);
        assert!(classify_by_sequence(&homo).is_homo_oligomer());

        // Differing lengths count as different chains for the sequence strategy
        let truncated = BTreeMap::from([
            ("A".to_string(), "MKV".to_string()),
            ("B".to_string(), "MK".to_string()),
        ]);
        let class = classify_by_sequence(&truncated);
        assert!(class.multi_chain);
        assert!(!class.homogeneous);

        let single = BTreeMap::from([("A".to_string(), "MKV".to_string())]);
        assert!(!classify_by_sequence(&single).multi_chain);
    }
}
