#![warn(missing_docs)]

//! # SimBa2
//!
//! Predicts protein stability changes (ddG) upon point mutation from a 3D structure.
//!
//! For every amino acid residue the relative solvent accessibility (RSA) is computed
//! from the structure. Each residue is joined with the hydrophobicity (Hdiff) and
//! volume (Vdiff) differences of all possible substitutions, and two linear models,
//! SimBa-IB and SimBa-SYM, give the predicted ddG. For homo-oligomers the RSA is
//! also averaged across chains and the predictions are repeated with the mean.
//!
//! Results are returned as Polars DataFrames.
//!
//! # Example
//!
//! ```no_run
//! use simba2::{simba2_predict, DescriptorTable, ModelVersion, PredictOptions, Predictor};
//! use std::path::Path;
//!
//! let predictor = Predictor::new(DescriptorTable::bundled().unwrap(), ModelVersion::Simba2);
//! let prediction = simba2_predict(
//!     "1ubq",
//!     Path::new("path/to/pdb1ubq.ent"),
//!     &predictor,
//!     &PredictOptions::default(),
//! )
//! .unwrap();
//! let ib = prediction.ib_view().unwrap();
//! println!("{} SimBa-IB predictions", ib.height());
//! ```

mod accessibility;
mod aggregate;
mod assemble;
mod chains;
mod descriptors;
mod error;
mod header;
mod model;
mod oligomer;
mod predict;
mod residues;
mod retrieve;
mod settings;
mod utils;

// Re-export key public types
pub use accessibility::{
    extract_rsa, get_residue_areas, rsa_to_df, ResidueAccessibility, ResidueArea,
};
pub use aggregate::mean_rsa;
pub use assemble::{
    assemble, predictor_view, SimbaModel, DDG_IB, DDG_IB_MEAN, DDG_SYM, DDG_SYM_MEAN,
};
pub use chains::{model_sequences, ChainExt};
pub use descriptors::{join_descriptors, DescriptorEntry, DescriptorTable};
pub use error::{Result, SimbaError};
pub use header::StructureHeader;
pub use model::{Coefficients, ModelVersion};
pub use oligomer::{classify, classify_by_sequence, HomogeneityMethod, OligomerClassification};
pub use predict::{simba2_predict, Prediction, Predictor};
pub use residues::{AccessibilityStandards, AminoAcidCodes, ResidueExt};
pub use retrieve::{download_pdb, exists_pdb, retrieve_pdb, RetrievedStructure, RCSB_DOWNLOAD_URL};
pub use settings::{PredictOptions, SasaSettings, N_POINTS, PROBE_RADIUS};
pub use utils::{load_model, log_pdb_warnings, output_file, write_df_to_file, DataFrameFileType};
