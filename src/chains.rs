use crate::residues::{AminoAcidCodes, ResidueExt};
use pdbtbx::*;
use std::collections::BTreeMap;

/// Sequence helpers for [`pdbtbx::Chain`].
pub trait ChainExt {
    /// One-letter sequence of the observed residues; unknown residues become `X`.
    fn pdb_seq(&self, codes: &AminoAcidCodes) -> String;
}

impl ChainExt for Chain {
    fn pdb_seq(&self, codes: &AminoAcidCodes) -> String {
        self.residues()
            .filter(|res| res.is_amino_acid_like())
            .filter_map(|res| res.resn())
            .map(|resn| codes.one_letter(&resn.to_uppercase()).unwrap_or('X'))
            .collect()
    }
}

/// Observed sequences of every chain in model `model_num` (0 is the first model).
pub fn model_sequences(
    pdb: &PDB,
    codes: &AminoAcidCodes,
    model_num: usize,
) -> BTreeMap<String, String> {
    pdb.model(model_num)
        .map(|model| {
            model
                .chains()
                .map(|chain| (chain.id().to_string(), chain.pdb_seq(codes)))
                .collect()
        })
        .unwrap_or_default()
}
