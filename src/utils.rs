use crate::error::{Result, SimbaError};
use pdbtbx::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Open an atomic data file with [`pdbtbx::ReadOptions`] and remove hetero atoms.
///
/// Waters, ligands and modified residues in HETATM records are not part of the
/// accessibility calculation.
pub fn load_model(input_file: &str) -> Result<(PDB, Vec<PDBError>)> {
    let (mut pdb, errors) = pdbtbx::ReadOptions::default()
        .set_only_atomic_coords(true)
        .set_level(pdbtbx::StrictnessLevel::Loose)
        .read(input_file)
        .map_err(|errors| {
            SimbaError::Structure(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

    pdb.remove_atoms_by(|atom| atom.hetero());

    Ok((pdb, errors))
}

/// Log parser warnings at a level matching their severity.
pub fn log_pdb_warnings(warnings: &[PDBError]) {
    warnings.iter().for_each(|e| match e.level() {
        pdbtbx::ErrorLevel::BreakingError => error!("{e}"),
        pdbtbx::ErrorLevel::InvalidatingError => error!("{e}"),
        _ => warn!("{e}"),
    });
}

/// Resolve the output path: a directory gets `filename` appended, and the
/// extension always matches `file_type`.
pub fn output_file(output: &Path, filename: &str, file_type: DataFrameFileType) -> PathBuf {
    match output.is_dir() {
        true => output.join(filename),
        false => output.to_path_buf(),
    }
    .with_extension(file_type.to_string())
}

/// Write a DataFrame to a file of the given type.
pub fn write_df_to_file(
    df: &mut DataFrame,
    file_path: &Path,
    file_type: DataFrameFileType,
) -> Result<()> {
    let file_suffix = file_type.to_string();
    let mut file = std::fs::File::create(file_path.with_extension(file_suffix))?;
    match file_type {
        DataFrameFileType::Csv => {
            CsvWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Json => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::Json)
                .finish(df)?;
        }
        DataFrameFileType::NDJson => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::JsonLines)
                .finish(df)?;
        }
    }
    Ok(())
}

/// File format for writing DataFrames.
#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum DataFrameFileType {
    /// Comma-separated values
    Csv,
    /// Parquet columnar storage
    Parquet,
    /// Standard JSON
    Json,
    /// Newline-delimited JSON
    NDJson,
}

impl std::fmt::Display for DataFrameFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataFrameFileType::Csv => write!(f, "csv"),
            DataFrameFileType::Parquet => write!(f, "parquet"),
            DataFrameFileType::Json => write!(f, "json"),
            DataFrameFileType::NDJson => write!(f, "ndjson"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_model_drops_nothing_from_protein() {
        let root = env!("CARGO_MANIFEST_DIR");
        let path = format!("{}/{}", root, "test-data/homodimer.pdb");

        let (pdb, _) = load_model(&path).unwrap();
        assert_eq!(pdb.chain_count(), 2);
        assert_eq!(pdb.residue_count(), 6);
        assert_eq!(pdb.atom_count(), 30);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let root = env!("CARGO_MANIFEST_DIR");
        let path = format!("{}/{}", root, "test-data/does-not-exist.pdb");
        assert!(matches!(load_model(&path), Err(SimbaError::Structure(_))));
    }

    #[test]
    fn test_output_file_extension() {
        let dir = tempfile::tempdir().unwrap();
        let in_dir = output_file(dir.path(), "SimBa-IB_1ABC", DataFrameFileType::Csv);
        assert_eq!(in_dir, dir.path().join("SimBa-IB_1ABC.csv"));

        let explicit = output_file(
            &dir.path().join("results.csv"),
            "ignored",
            DataFrameFileType::Parquet,
        );
        assert_eq!(explicit, dir.path().join("results.parquet"));
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut df = df!("Chain" => ["A", "B"], "RSA" => [0.25, 0.5]).unwrap();
        let path = dir.path().join("out");
        write_df_to_file(&mut df, &path, DataFrameFileType::Csv).unwrap();

        let written = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert_eq!(written.lines().next(), Some("Chain,RSA"));
        assert_eq!(written.lines().count(), 3);
    }
}
