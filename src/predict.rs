//! The prediction pipeline.
//!
//! accessibility → oligomer classification → (mean RSA) → descriptor join →
//! SimBa-IB/SYM → assembled table.

use crate::accessibility::{extract_rsa, get_residue_areas, rsa_to_df, ResidueAccessibility};
use crate::aggregate::mean_rsa;
use crate::assemble::{
    assemble, predictor_view, SimbaModel, DDG_IB, DDG_IB_MEAN, DDG_SYM, DDG_SYM_MEAN,
};
use crate::chains::model_sequences;
use crate::descriptors::{join_descriptors, DescriptorTable};
use crate::error::{Result, SimbaError};
use crate::header::StructureHeader;
use crate::model::{Coefficients, ModelVersion};
use crate::oligomer::{classify, classify_by_sequence, HomogeneityMethod, OligomerClassification};
use crate::residues::{AccessibilityStandards, AminoAcidCodes};
use crate::settings::{PredictOptions, SasaSettings};
use crate::utils::{load_model, log_pdb_warnings};
use pdbtbx::PDB;
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Predictions for one structure.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Structure identifier, uppercased
    pub name: String,
    /// Chain composition used to decide on the `_mean` columns
    pub classification: OligomerClassification,
    /// Number of amino acid chains
    pub n_chains: usize,
    /// Full, unrounded table including `_mean` columns for homo-oligomers
    pub table: DataFrame,
}

impl Prediction {
    /// Rounded output table for one predictor.
    pub fn view(&self, model: SimbaModel) -> Result<DataFrame> {
        predictor_view(
            &self.table,
            model,
            self.classification.is_homo_oligomer(),
        )
    }

    /// Rounded SimBa-IB table.
    pub fn ib_view(&self) -> Result<DataFrame> {
        self.view(SimbaModel::Ib)
    }

    /// Rounded SimBa-SYM table.
    pub fn sym_view(&self) -> Result<DataFrame> {
        self.view(SimbaModel::Sym)
    }
}

/// Holds the lookup tables and coefficients used for a run.
#[derive(Debug, Clone)]
pub struct Predictor {
    standards: AccessibilityStandards,
    codes: AminoAcidCodes,
    descriptors: DescriptorTable,
    coefficients: Coefficients,
}

impl Predictor {
    /// Predictor with the standard residue tables.
    pub fn new(descriptors: DescriptorTable, version: ModelVersion) -> Self {
        Self::with_tables(
            AccessibilityStandards::default(),
            AminoAcidCodes::default(),
            descriptors,
            version.coefficients(),
        )
    }

    /// Predictor with custom residue tables and coefficients.
    pub fn with_tables(
        standards: AccessibilityStandards,
        codes: AminoAcidCodes,
        descriptors: DescriptorTable,
        coefficients: Coefficients,
    ) -> Self {
        Self {
            standards,
            codes,
            descriptors,
            coefficients,
        }
    }

    /// Three-letter to one-letter code table in use.
    pub fn codes(&self) -> &AminoAcidCodes {
        &self.codes
    }

    /// Relative solvent accessibility of every amino acid residue.
    pub fn accessibility(
        &self,
        pdb: &PDB,
        settings: &SasaSettings,
    ) -> Result<Vec<ResidueAccessibility>> {
        let areas = get_residue_areas(pdb, settings)?;
        extract_rsa(&areas, &self.standards, &self.codes)
    }

    /// Per-mutation predictions for a set of residues, before assembly.
    ///
    /// Homo-oligomers additionally get `RSA_mean` and the `_mean` ddG columns.
    pub fn predict_residues(
        &self,
        rows: &[ResidueAccessibility],
        classification: OligomerClassification,
    ) -> Result<DataFrame> {
        let homo = classification.is_homo_oligomer();
        let coef = &self.coefficients;

        let unscored = rows
            .iter()
            .filter(|row| self.descriptors.mutants(row.wild).is_empty())
            .count();
        if unscored > 0 {
            debug!("{unscored} residue(s) have no descriptors and are not scored");
        }

        let mut residues = rsa_to_df(rows)?.lazy();
        if homo {
            residues = mean_rsa(residues);
        }

        let mut lf = join_descriptors(residues, &self.descriptors)?.with_columns([
            coef.ib_expr("RSA").alias(DDG_IB),
            coef.sym_expr("RSA").alias(DDG_SYM),
        ]);
        if homo {
            lf = lf.with_columns([
                coef.ib_expr("RSA_mean").alias(DDG_IB_MEAN),
                coef.sym_expr("RSA_mean").alias(DDG_SYM_MEAN),
            ]);
        }

        Ok(lf.collect()?)
    }

    fn classify(
        &self,
        rows: &[ResidueAccessibility],
        pdb: &PDB,
        header: &StructureHeader,
        method: HomogeneityMethod,
        model_num: usize,
    ) -> OligomerClassification {
        let by_residue = classify(rows);
        let sequences = match header.seqres.is_empty() {
            true => model_sequences(pdb, &self.codes, model_num),
            false => header.sequences(&self.codes),
        };
        let by_sequence = classify_by_sequence(&sequences);
        if by_residue != by_sequence {
            debug!(
                "Homogeneity methods disagree: residue-wise {by_residue}, sequence-wise {by_sequence}"
            );
        }

        match method {
            HomogeneityMethod::Residue => by_residue,
            HomogeneityMethod::Sequence => by_sequence,
        }
    }

    /// Run the full pipeline on a parsed structure.
    pub fn predict_structure(
        &self,
        name: &str,
        pdb: &PDB,
        header: &StructureHeader,
        options: &PredictOptions,
    ) -> Result<Prediction> {
        let rows = self.accessibility(pdb, &options.sasa)?;
        let n_chains = rows
            .iter()
            .map(|row| row.chain.as_str())
            .collect::<HashSet<_>>()
            .len();
        let classification = self.classify(
            &rows,
            pdb,
            header,
            options.homogeneity,
            options.sasa.model_num,
        );
        debug!(
            "{} residues in {n_chains} chain(s), classified as {classification}",
            rows.len()
        );

        let predictions = self.predict_residues(&rows, classification)?;
        let genes = options.genes.then(|| header.genes_by_chain());
        let table = assemble(predictions, name, genes.as_ref())?;

        Ok(Prediction {
            name: name.to_uppercase(),
            classification,
            n_chains,
            table,
        })
    }
}

/// Load a structure file and predict ddG for every substitution of every residue.
pub fn simba2_predict(
    name: &str,
    pdb_path: &Path,
    predictor: &Predictor,
    options: &PredictOptions,
) -> Result<Prediction> {
    let input_file = pdb_path
        .to_str()
        .ok_or_else(|| SimbaError::Structure(format!("invalid path {}", pdb_path.display())))?;

    let (pdb, pdb_warnings) = load_model(input_file)?;
    log_pdb_warnings(&pdb_warnings);
    let header = StructureHeader::from_path(pdb_path)?;

    let prediction = predictor.predict_structure(name, &pdb, &header, options)?;
    info!(
        "The structure contains {} amino acid chain(s).",
        prediction.n_chains
    );
    Ok(prediction)
}
