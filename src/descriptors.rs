//! Hydrophobicity and volume difference descriptors for amino acid substitutions.
//!
//! The table is keyed by wild-type code and lists every mutant that can be scored.
//! Volume differences are stored in Å³ and scaled by 1/100 when loaded.

use crate::error::{Result, SimbaError};
use polars::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Descriptor table compiled into the binary.
const BUNDLED_TABLE: &str = include_str!("../resources/hvdiff_table.json");

/// Descriptors of one substitution. `vdiff` is already scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptorEntry {
    /// One-letter code of the mutant
    pub mutated: char,
    /// Hydrophobicity difference, mutant minus wild type
    pub hdiff: f64,
    /// Volume difference in units of 100 Å³
    pub vdiff: f64,
}

#[derive(Debug, Deserialize)]
struct MutantRecord {
    #[serde(rename = "Mutated")]
    mutated: String,
    #[serde(rename = "Hdiff")]
    hdiff: f64,
    #[serde(rename = "Vdiff")]
    vdiff: f64,
}

/// Accepted JSON layouts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTable {
    /// Column-oriented table: each column maps a row key to a value
    Columns {
        #[serde(rename = "Wild")]
        wild: BTreeMap<String, String>,
        #[serde(rename = "Mutated")]
        mutated: BTreeMap<String, String>,
        #[serde(rename = "Hdiff")]
        hdiff: BTreeMap<String, f64>,
        #[serde(rename = "Vdiff")]
        vdiff: BTreeMap<String, f64>,
    },
    /// Column-oriented table with one list per column
    Lists {
        #[serde(rename = "Wild")]
        wild: Vec<String>,
        #[serde(rename = "Mutated")]
        mutated: Vec<String>,
        #[serde(rename = "Hdiff")]
        hdiff: Vec<f64>,
        #[serde(rename = "Vdiff")]
        vdiff: Vec<f64>,
    },
    /// Wild-type code → list of mutants
    Grouped(BTreeMap<String, Vec<MutantRecord>>),
}

fn single_code(code: &str) -> Result<char> {
    let mut chars = code.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c.to_ascii_uppercase()),
        _ => Err(SimbaError::Descriptor(format!(
            "expected a one-letter amino acid code, found {code:?}"
        ))),
    }
}

/// Static lookup of (wild type, mutant) → descriptors.
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    entries: BTreeMap<char, Vec<DescriptorEntry>>,
}

impl DescriptorTable {
    /// Build a table from raw entries: wild-type code → (mutant, Hdiff, raw Vdiff).
    pub fn from_raw<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = (char, Vec<(char, f64, f64)>)>,
    {
        let entries = raw
            .into_iter()
            .map(|(wild, mutants)| {
                let mutants = mutants
                    .into_iter()
                    .map(|(mutated, hdiff, vdiff)| DescriptorEntry {
                        mutated,
                        hdiff,
                        vdiff: vdiff / 100.0,
                    })
                    .collect();
                (wild, mutants)
            })
            .collect();
        Self { entries }
    }

    /// Parse a table from JSON in either the grouped or the column-oriented layout.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut raw: BTreeMap<char, Vec<(char, f64, f64)>> = BTreeMap::new();

        match serde_json::from_str::<RawTable>(json)? {
            RawTable::Grouped(groups) => {
                for (wild, mutants) in groups {
                    let wild = single_code(&wild)?;
                    let list = raw.entry(wild).or_default();
                    for m in mutants {
                        list.push((single_code(&m.mutated)?, m.hdiff, m.vdiff));
                    }
                }
            }
            RawTable::Columns {
                wild,
                mutated,
                hdiff,
                vdiff,
            } => {
                for (key, wild_code) in wild {
                    let missing =
                        |column: &str| SimbaError::Descriptor(format!("row {key} has no {column}"));
                    let mutated_code = mutated.get(&key).ok_or_else(|| missing("Mutated"))?;
                    let h = *hdiff.get(&key).ok_or_else(|| missing("Hdiff"))?;
                    let v = *vdiff.get(&key).ok_or_else(|| missing("Vdiff"))?;
                    raw.entry(single_code(&wild_code)?).or_default().push((
                        single_code(mutated_code)?,
                        h,
                        v,
                    ));
                }
            }
            RawTable::Lists {
                wild,
                mutated,
                hdiff,
                vdiff,
            } => {
                let rows = wild.len();
                if [mutated.len(), hdiff.len(), vdiff.len()] != [rows; 3] {
                    return Err(SimbaError::Descriptor(format!(
                        "columns differ in length: Wild {rows}, Mutated {}, Hdiff {}, Vdiff {}",
                        mutated.len(),
                        hdiff.len(),
                        vdiff.len()
                    )));
                }
                for (((wild_code, mutated_code), h), v) in
                    wild.iter().zip(&mutated).zip(hdiff).zip(vdiff)
                {
                    raw.entry(single_code(wild_code)?)
                        .or_default()
                        .push((single_code(mutated_code)?, h, v));
                }
            }
        }

        let table = Self::from_raw(raw);
        debug!(
            "Loaded {} substitutions for {} wild-type residues",
            table.len(),
            table.entries.len()
        );
        Ok(table)
    }

    /// Read a table from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The descriptor table shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_TABLE)
    }

    /// All substitutions defined for a wild-type residue.
    pub fn mutants(&self, wild: char) -> &[DescriptorEntry] {
        self.entries.get(&wild).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of (wild type, mutant) pairs.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether no substitution is defined.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Long-format table with columns Wild, Mutated, Hdiff, Vdiff.
    pub fn to_df(&self) -> PolarsResult<DataFrame> {
        let rows: Vec<(char, &DescriptorEntry)> = self
            .entries
            .iter()
            .flat_map(|(wild, mutants)| mutants.iter().map(move |m| (*wild, m)))
            .collect();

        df!(
            "Wild" => rows.iter().map(|(w, _)| w.to_string()).collect::<Vec<String>>(),
            "Mutated" => rows.iter().map(|(_, m)| m.mutated.to_string()).collect::<Vec<String>>(),
            "Hdiff" => rows.iter().map(|(_, m)| m.hdiff).collect::<Vec<f64>>(),
            "Vdiff" => rows.iter().map(|(_, m)| m.vdiff).collect::<Vec<f64>>(),
        )
    }
}

/// Attach descriptors to every residue row: one output row per defined mutant.
///
/// Rows whose wild type has no entries produce no output.
pub fn join_descriptors(residues: LazyFrame, table: &DescriptorTable) -> Result<LazyFrame> {
    Ok(residues.join(
        table.to_df()?.lazy(),
        [col("Wild")],
        [col("Wild")],
        JoinArgs::new(JoinType::Inner),
    ))
}
