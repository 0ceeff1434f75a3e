//! Per-residue solvent accessibility.
//!
//! Atom areas come from rust-sasa and are summed per residue. Relative solvent
//! accessibility (RSA) divides that total by the reference area of the residue type.

use crate::error::{Result, SimbaError};
use crate::residues::{AccessibilityStandards, AminoAcidCodes, ResidueExt};
use crate::settings::SasaSettings;
use pdbtbx::*;
use polars::prelude::*;
use rust_sasa::calculate_sasa_internal;
use rust_sasa::Atom as SASAAtom;
use tracing::{debug, trace};

/// Total exposed area of one residue.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueArea {
    /// Chain ID
    pub chain: String,
    /// Residue name as found in the structure, e.g. `ALA`
    pub residue_type: String,
    /// Residue serial number
    pub serial: isize,
    /// Insertion code, empty if absent
    pub insertion: String,
    /// Exposed area in Å²
    pub total: f64,
}

impl ResidueArea {
    /// Residue number including the insertion code, e.g. `52A`.
    pub fn residue_number(&self) -> String {
        format!("{}{}", self.serial, self.insertion)
    }
}

/// Relative solvent accessibility of one residue.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueAccessibility {
    /// Chain ID
    pub chain: String,
    /// Residue number including the insertion code
    pub number: String,
    /// Residue serial number, used for ordering
    pub serial: isize,
    /// Insertion code, empty if absent
    pub insertion: String,
    /// One-letter wild-type code
    pub wild: char,
    /// Exposed area over the reference area of the residue type
    pub rsa: f64,
}

impl ResidueAccessibility {
    /// Row for a residue; the residue number is derived from `serial` and `insertion`.
    pub fn new(chain: &str, serial: isize, insertion: &str, wild: char, rsa: f64) -> Self {
        Self {
            chain: chain.to_string(),
            number: format!("{serial}{insertion}"),
            serial,
            insertion: insertion.to_string(),
            wild,
            rsa,
        }
    }
}

/// Atoms of a residue used for the surface calculation: shared atoms plus the
/// first alternate location, without hydrogens.
fn surface_atoms(residue: &Residue) -> Vec<&Atom> {
    let first_altloc = residue
        .conformers()
        .find_map(|conformer| conformer.alternative_location());

    residue
        .conformers()
        .filter(|conformer| {
            let altloc = conformer.alternative_location();
            altloc.is_none() || altloc == first_altloc
        })
        .flat_map(|conformer| conformer.atoms())
        .filter(|atom| atom.element() != Some(&Element::H))
        .collect()
}

/// Calculate the exposed area of every residue in the selected model.
pub fn get_residue_areas(pdb: &PDB, settings: &SasaSettings) -> Result<Vec<ResidueArea>> {
    let model = pdb.model(settings.model_num).ok_or_else(|| {
        SimbaError::Structure(format!(
            "model {} not found ({} model(s) in file)",
            settings.model_num,
            pdb.model_count()
        ))
    })?;

    let mut residues: Vec<ResidueArea> = Vec::new();
    let mut atoms: Vec<SASAAtom> = Vec::new();
    // Index into `residues` for every entry of `atoms`
    let mut owners: Vec<usize> = Vec::new();

    for chain in model.chains() {
        for residue in chain.residues() {
            let Some(resn) = residue.resn() else {
                continue;
            };
            let residue_atoms = surface_atoms(residue);
            if residue_atoms.is_empty() {
                continue;
            }

            let owner = residues.len();
            residues.push(ResidueArea {
                chain: chain.id().to_string(),
                residue_type: resn.to_uppercase(),
                serial: residue.serial_number(),
                insertion: residue.insertion_code().unwrap_or("").to_string(),
                total: 0.0,
            });

            for atom in residue_atoms {
                let radius = atom
                    .element()
                    .and_then(|element| element.atomic_radius().van_der_waals)
                    .ok_or_else(|| {
                        SimbaError::Structure(format!(
                            "no van der Waals radius for atom {} ({})",
                            atom.serial_number(),
                            atom.name()
                        ))
                    })?;
                let (x, y, z) = atom.pos();
                atoms.push(SASAAtom {
                    position: nalgebra::Point3::new(x as f32, y as f32, z as f32),
                    radius: radius as f32,
                    id: atoms.len(),
                    parent_id: None,
                });
                owners.push(owner);
            }
        }
    }
    debug!(
        "Computing SASA for {} atoms in {} residues",
        atoms.len(),
        residues.len()
    );

    let atom_sasa = calculate_sasa_internal(
        &atoms,
        Some(settings.probe_radius),
        Some(settings.n_points),
    );
    for (owner, area) in owners.iter().zip(atom_sasa) {
        residues[*owner].total += area as f64;
    }

    Ok(residues)
}

/// Convert residue areas to relative solvent accessibility.
///
/// Residues whose names are not three characters long (nucleotides) are skipped.
/// Any other residue type must be present in both tables.
pub fn extract_rsa(
    areas: &[ResidueArea],
    standards: &AccessibilityStandards,
    codes: &AminoAcidCodes,
) -> Result<Vec<ResidueAccessibility>> {
    areas
        .iter()
        .filter(|area| area.residue_type.len() == 3)
        .map(|area| {
            let wild = codes.one_letter(&area.residue_type)?;
            let rsa = area.total / standards.max_area(&area.residue_type)?;
            trace!(
                "{}:{}{} RSA {rsa:.3}",
                area.chain,
                area.residue_type,
                area.residue_number()
            );
            Ok(ResidueAccessibility {
                chain: area.chain.clone(),
                number: area.residue_number(),
                serial: area.serial,
                insertion: area.insertion.clone(),
                wild,
                rsa,
            })
        })
        .collect()
}

/// Build the residue table used by the prediction pipeline.
///
/// Columns: Chain, Number, Wild, RSA, plus the `resi` and `insertion` sort keys.
pub fn rsa_to_df(rows: &[ResidueAccessibility]) -> PolarsResult<DataFrame> {
    df!(
        "Chain" => rows.iter().map(|x| x.chain.to_owned()).collect::<Vec<String>>(),
        "Number" => rows.iter().map(|x| x.number.to_owned()).collect::<Vec<String>>(),
        "resi" => rows.iter().map(|x| x.serial as i64).collect::<Vec<i64>>(),
        "insertion" => rows.iter().map(|x| x.insertion.to_owned()).collect::<Vec<String>>(),
        "Wild" => rows.iter().map(|x| x.wild.to_string()).collect::<Vec<String>>(),
        "RSA" => rows.iter().map(|x| x.rsa).collect::<Vec<f64>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(chain: &str, residue_type: &str, serial: isize, total: f64) -> ResidueArea {
        ResidueArea {
            chain: chain.to_string(),
            residue_type: residue_type.to_string(),
            serial,
            insertion: String::new(),
            total,
        }
    }

    #[test]
    fn test_rsa_is_area_over_standard() {
        let areas = vec![area("A", "ALA", 1, 107.95 / 2.0), area("A", "GLY", 2, 0.0)];
        let rows = extract_rsa(
            &areas,
            &AccessibilityStandards::default(),
            &AminoAcidCodes::default(),
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].wild, 'A');
        assert!((rows[0].rsa - 0.5).abs() < 1e-12);
        assert_eq!(rows[1].wild, 'G');
        assert_eq!(rows[1].rsa, 0.0);
    }

    #[test]
    fn test_nucleotides_are_skipped() {
        let areas = vec![
            area("A", "DA", 1, 120.0),
            area("A", "U", 2, 90.0),
            area("B", "TRP", 3, 10.0),
        ];
        let rows = extract_rsa(
            &areas,
            &AccessibilityStandards::default(),
            &AminoAcidCodes::default(),
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].chain, "B");
        assert_eq!(rows[0].number, "3");
    }

    #[test]
    fn test_unknown_residue_type_aborts() {
        let areas = vec![area("A", "ALA", 1, 50.0), area("A", "UNK", 2, 50.0)];
        let result = extract_rsa(
            &areas,
            &AccessibilityStandards::default(),
            &AminoAcidCodes::default(),
        );
        assert!(matches!(result, Err(SimbaError::LookupFailure { .. })));
    }

    #[test]
    fn test_residue_number_keeps_insertion_code() {
        let mut with_insertion = area("H", "SER", 52, 1.0);
        with_insertion.insertion = "A".to_string();
        assert_eq!(with_insertion.residue_number(), "52A");

        let row = ResidueAccessibility::new("H", 100, "B", 'S', 0.2);
        assert_eq!(row.number, "100B");
    }

    #[test]
    fn test_probe_radius_is_forwarded() {
        let root = env!("CARGO_MANIFEST_DIR");
        let path = format!("{}/{}", root, "test-data/monomer.pdb");
        let (pdb, _) = crate::utils::load_model(&path).unwrap();

        let total = |probe_radius: f32| -> f64 {
            let settings = SasaSettings {
                probe_radius,
                ..Default::default()
            };
            get_residue_areas(&pdb, &settings)
                .unwrap()
                .iter()
                .map(|area| area.total)
                .sum()
        };
        // An isolated peptide exposes more surface to a larger probe
        assert!(total(3.0) > total(1.4));
    }

    #[test]
    fn test_rsa_to_df_columns() {
        let rows = vec![ResidueAccessibility::new("A", 5, "", 'G', 0.5)];
        let df = rsa_to_df(&rows).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(
            df.get_column_names_str(),
            vec!["Chain", "Number", "resi", "insertion", "Wild", "RSA"]
        );
    }
}
