//! PDB header records: COMPND, SOURCE and SEQRES.
//!
//! pdbtbx only keeps atomic records, so the molecule and sequence metadata are read
//! from the raw file. mmCIF files have none of these records and give an empty
//! header.

use crate::error::Result;
use crate::residues::AminoAcidCodes;
use std::collections::BTreeMap;
use std::path::Path;

/// Key/value specifications per MOL_ID, keys lowercased.
pub type MoleculeSpecs = BTreeMap<String, BTreeMap<String, String>>;

/// Metadata from the header records of a PDB file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureHeader {
    /// COMPND specifications
    pub compound: MoleculeSpecs,
    /// SOURCE specifications
    pub source: MoleculeSpecs,
    /// Chain ID → residue names from SEQRES
    pub seqres: BTreeMap<String, Vec<String>>,
}

/// Text of a continued record (columns 11-80).
fn record_text(line: &str) -> &str {
    line.get(10..).unwrap_or("").trim_end()
}

fn parse_specifications(text: &str) -> MoleculeSpecs {
    let mut molecules = MoleculeSpecs::new();
    let mut current: Option<String> = None;

    for spec in text.split(';') {
        let Some((key, value)) = spec.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.split_whitespace().collect::<Vec<_>>().join(" ");

        if key == "mol_id" {
            molecules.entry(value.clone()).or_default();
            current = Some(value);
        } else if let Some(mol_id) = &current {
            molecules
                .entry(mol_id.clone())
                .or_default()
                .insert(key, value);
        }
    }
    molecules
}

impl StructureHeader {
    /// Parse COMPND, SOURCE and SEQRES records from the text of a PDB file.
    ///
    /// Files without these records (such as mmCIF) give an empty header.
    pub fn parse(content: &str) -> Self {
        let mut compound = String::new();
        let mut source = String::new();
        let mut seqres: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for line in content.lines() {
            match line.get(..6).unwrap_or(line) {
                "COMPND" => {
                    compound.push(' ');
                    compound.push_str(record_text(line));
                }
                "SOURCE" => {
                    source.push(' ');
                    source.push_str(record_text(line));
                }
                "SEQRES" => {
                    let chain = line.get(11..12).unwrap_or("").trim().to_string();
                    let residues = line.get(19..).unwrap_or("").split_whitespace();
                    seqres
                        .entry(chain)
                        .or_default()
                        .extend(residues.map(str::to_string));
                }
                // Header records precede the coordinates
                "ATOM  " | "HETATM" | "MODEL " => break,
                _ => {}
            }
        }

        Self {
            compound: parse_specifications(&compound),
            source: parse_specifications(&source),
            seqres,
        }
    }

    /// Read and parse the header of a structure file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Gene name of each chain: the first comma-separated token of the GENE field
    /// of the chain's molecule. Chains without a gene are absent.
    pub fn genes_by_chain(&self) -> BTreeMap<String, String> {
        let mut genes = BTreeMap::new();
        for (mol_id, spec) in &self.compound {
            let Some(chains) = spec.get("chain") else {
                continue;
            };
            let Some(gene) = self
                .source
                .get(mol_id)
                .and_then(|source| source.get("gene"))
                .and_then(|gene| gene.split(',').next())
                .map(str::trim)
            else {
                continue;
            };

            for chain in chains.split(',').map(str::trim).filter(|c| !c.is_empty()) {
                genes.insert(chain.to_string(), gene.to_string());
            }
        }
        genes
    }

    /// One-letter SEQRES sequence of each chain; unknown residues become `X`.
    pub fn sequences(&self, codes: &AminoAcidCodes) -> BTreeMap<String, String> {
        self.seqres
            .iter()
            .map(|(chain, residues)| {
                let seq = residues
                    .iter()
                    .map(|resn| codes.one_letter(resn).unwrap_or('X'))
                    .collect();
                (chain.clone(), seq)
            })
            .collect()
    }
}
