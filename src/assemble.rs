//! Final result table: structure identifier, optional gene names, ordering and the
//! two per-predictor views.

use crate::error::Result;
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// SimBa-IB prediction column
pub const DDG_IB: &str = "ddG_SimBa_IB";
/// SimBa-SYM prediction column
pub const DDG_SYM: &str = "ddG_SimBa_SYM";
/// SimBa-IB prediction from the chain-averaged RSA
pub const DDG_IB_MEAN: &str = "ddG_SimBa_IB_mean";
/// SimBa-SYM prediction from the chain-averaged RSA
pub const DDG_SYM_MEAN: &str = "ddG_SimBa_SYM_mean";

/// Which predictor a result view reports (IB or SYM).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimbaModel {
    /// SimBa-IB
    Ib,
    /// SimBa-SYM
    Sym,
}

impl SimbaModel {
    /// Prefix of the output file name.
    pub fn label(&self) -> &'static str {
        match self {
            SimbaModel::Ib => "SimBa-IB",
            SimbaModel::Sym => "SimBa-SYM",
        }
    }

    fn columns(&self) -> (&'static str, &'static str) {
        match self {
            SimbaModel::Ib => (DDG_IB, DDG_IB_MEAN),
            SimbaModel::Sym => (DDG_SYM, DDG_SYM_MEAN),
        }
    }
}

/// Split an ID into alternating text and digit runs.
fn natural_chunks(id: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for (i, c) in id.char_indices().skip(1) {
        let prev = id[..i].chars().next_back().is_some_and(|p| p.is_ascii_digit());
        if prev != c.is_ascii_digit() {
            chunks.push(&id[start..i]);
            start = i;
        }
    }
    if start < id.len() {
        chunks.push(&id[start..]);
    }
    chunks
}

/// Natural ordering of chain IDs, so `A9` < `A10`.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    for (x, y) in natural_chunks(a).into_iter().zip(natural_chunks(b)) {
        let both_numeric = x.starts_with(|c: char| c.is_ascii_digit())
            && y.starts_with(|c: char| c.is_ascii_digit());
        let order = match both_numeric {
            true => {
                let (x, y) = (x.trim_start_matches('0'), y.trim_start_matches('0'));
                x.len().cmp(&y.len()).then_with(|| x.cmp(y))
            }
            false => x.cmp(y),
        };
        if order != Ordering::Equal {
            return order;
        }
    }
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Rank of every chain ID in natural order.
fn chain_ranks(predictions: &DataFrame) -> PolarsResult<DataFrame> {
    let chains: BTreeSet<&str> = predictions
        .column("Chain")?
        .str()?
        .into_iter()
        .flatten()
        .collect();
    let mut chains: Vec<&str> = chains.into_iter().collect();
    chains.sort_by(|a, b| natural_cmp(a, b));

    df!(
        "Chain" => chains.iter().map(|c| c.to_string()).collect::<Vec<String>>(),
        "chain_rank" => (0..chains.len() as u32).collect::<Vec<u32>>(),
    )
}

/// Prepend the `PDB` column, optionally join gene names, and sort by chain,
/// residue number and mutant.
///
/// Chains and residue numbers sort naturally. Insertion codes follow the plain
/// number, so `9` < `10` < `10A`. The sort keys are dropped from the result, which
/// has the columns `PDB`, `Gene` (if requested), `Chain`, `Number`, `Wild`, `RSA`,
/// `RSA_mean` (homo-oligomers), `Mutated`, `Vdiff`, `Hdiff` and the ddG predictions.
pub fn assemble(
    predictions: DataFrame,
    name: &str,
    genes: Option<&BTreeMap<String, String>>,
) -> Result<DataFrame> {
    let has_mean = predictions.column("RSA_mean").is_ok();
    let ranks = chain_ranks(&predictions)?;

    let mut columns = vec![col("PDB")];
    let mut lf = predictions
        .lazy()
        .with_column(lit(name.to_uppercase()).alias("PDB"))
        .join(
            ranks.lazy(),
            [col("Chain")],
            [col("Chain")],
            JoinArgs::new(JoinType::Left),
        );

    if let Some(genes) = genes {
        let genes_df = df!(
            "Chain" => genes.keys().cloned().collect::<Vec<String>>(),
            "Gene" => genes.values().cloned().collect::<Vec<String>>(),
        )?;
        lf = lf
            .join(
                genes_df.lazy(),
                [col("Chain")],
                [col("Chain")],
                JoinArgs::new(JoinType::Left),
            )
            .with_column(col("Gene").fill_null(lit("")));
        columns.push(col("Gene"));
    }

    columns.extend([col("Chain"), col("Number"), col("Wild"), col("RSA")]);
    if has_mean {
        columns.push(col("RSA_mean"));
    }
    columns.extend([col("Mutated"), col("Vdiff"), col("Hdiff"), col(DDG_IB), col(DDG_SYM)]);
    if has_mean {
        columns.extend([col(DDG_IB_MEAN), col(DDG_SYM_MEAN)]);
    }

    Ok(lf
        .sort(
            ["chain_rank", "resi", "insertion", "Mutated"],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .select(columns)
        .collect()?)
}

/// Output view for one predictor, rounded for reporting.
///
/// For homo-oligomers the chain-averaged columns are reported under the plain
/// `RSA` and ddG names.
pub fn predictor_view(table: &DataFrame, model: SimbaModel, homo: bool) -> Result<DataFrame> {
    let (ddg, ddg_mean) = model.columns();
    let (rsa_source, ddg_source) = match homo {
        true => ("RSA_mean", ddg_mean),
        false => ("RSA", ddg),
    };

    let mut columns = vec![col("PDB")];
    if table.column("Gene").is_ok() {
        columns.push(col("Gene"));
    }
    columns.extend([
        col("Chain"),
        col("Number"),
        col("Wild"),
        col(rsa_source).round(3).alias("RSA"),
        col("Mutated"),
        col("Vdiff").round(2),
        col("Hdiff"),
        col(ddg_source).round(1).alias(ddg),
    ]);

    Ok(table.clone().lazy().select(columns).collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictions() -> DataFrame {
        df!(
            "Chain" => ["B", "A", "A", "A", "A"],
            "Number" => ["1", "10", "9", "2", "10A"],
            "resi" => [1i64, 10, 9, 2, 10],
            "insertion" => ["", "", "", "", "A"],
            "Wild" => ["G", "A", "A", "A", "S"],
            "RSA" => [0.12345, 0.5, 0.5, 0.5, 0.1],
            "Mutated" => ["A", "V", "G", "G", "A"],
            "Vdiff" => [0.285, -0.285, -0.285, -0.285, -0.004],
            "Hdiff" => [-0.65, 0.65, 0.65, 0.65, 0.04],
            "ddG_SimBa_IB" => [-0.66, -1.04, -1.04, -1.04, -0.6],
            "ddG_SimBa_SYM" => [0.01, 0.02, 0.03, 0.04, 0.05],
        )
        .unwrap()
    }

    fn strings(df: &DataFrame, column: &str) -> Vec<String> {
        df.column(column)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|s| s.unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn test_natural_residue_order() {
        let table = assemble(predictions(), "1abc", None).unwrap();
        assert_eq!(strings(&table, "Chain"), ["A", "A", "A", "A", "B"]);
        assert_eq!(strings(&table, "Number"), ["2", "9", "10", "10A", "1"]);
        assert_eq!(strings(&table, "PDB"), vec!["1ABC"; 5]);
        assert!(table.column("Gene").is_err());
    }

    #[test]
    fn test_assembled_columns_lead_with_identifier() {
        let table = assemble(predictions(), "1abc", None).unwrap();
        assert_eq!(
            table.get_column_names_str(),
            vec![
                "PDB", "Chain", "Number", "Wild", "RSA", "Mutated", "Vdiff", "Hdiff", DDG_IB,
                DDG_SYM
            ]
        );

        let genes = BTreeMap::from([("A".to_string(), "LYZ".to_string())]);
        let with_genes = assemble(predictions(), "1abc", Some(&genes)).unwrap();
        assert_eq!(with_genes.get_column_names_str()[..3], ["PDB", "Gene", "Chain"]);
    }

    #[test]
    fn test_mean_columns_follow_their_source() {
        let mut df = predictions();
        df.with_column(Column::new("RSA_mean".into(), [0.3; 5])).unwrap();
        df.with_column(Column::new(DDG_IB_MEAN.into(), [0.1; 5])).unwrap();
        df.with_column(Column::new(DDG_SYM_MEAN.into(), [0.2; 5])).unwrap();

        let table = assemble(df, "1abc", None).unwrap();
        assert_eq!(
            table.get_column_names_str(),
            vec![
                "PDB",
                "Chain",
                "Number",
                "Wild",
                "RSA",
                "RSA_mean",
                "Mutated",
                "Vdiff",
                "Hdiff",
                DDG_IB,
                DDG_SYM,
                DDG_IB_MEAN,
                DDG_SYM_MEAN
            ]
        );
    }

    #[test]
    fn test_chains_sort_naturally() {
        let df = df!(
            "Chain" => ["A10", "B", "A9", "A"],
            "Number" => ["1", "1", "1", "1"],
            "resi" => [1i64, 1, 1, 1],
            "insertion" => ["", "", "", ""],
            "Wild" => ["G", "G", "G", "G"],
            "RSA" => [0.1, 0.2, 0.3, 0.4],
            "Mutated" => ["A", "A", "A", "A"],
            "Vdiff" => [0.28, 0.28, 0.28, 0.28],
            "Hdiff" => [-0.65, -0.65, -0.65, -0.65],
            "ddG_SimBa_IB" => [0.0, 0.0, 0.0, 0.0],
            "ddG_SimBa_SYM" => [0.0, 0.0, 0.0, 0.0],
        )
        .unwrap();
        let table = assemble(df, "1abc", None).unwrap();
        assert_eq!(strings(&table, "Chain"), ["A", "A9", "A10", "B"]);
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("A9", "A10"), Ordering::Less);
        assert_eq!(natural_cmp("10", "9"), Ordering::Greater);
        assert_eq!(natural_cmp("A", "A1"), Ordering::Less);
        assert_eq!(natural_cmp("AB", "B"), Ordering::Less);
        assert_eq!(natural_cmp("C", "C"), Ordering::Equal);
    }

    #[test]
    fn test_gene_annotation_defaults_to_empty() {
        let genes = BTreeMap::from([("A".to_string(), "LYZ".to_string())]);
        let table = assemble(predictions(), "1abc", Some(&genes)).unwrap();
        assert_eq!(strings(&table, "Gene"), ["LYZ", "LYZ", "LYZ", "LYZ", ""]);
    }

    #[test]
    fn test_views_drop_the_other_predictor() {
        let table = assemble(predictions(), "1abc", None).unwrap();

        let ib = predictor_view(&table, SimbaModel::Ib, false).unwrap();
        assert_eq!(
            ib.get_column_names_str(),
            vec!["PDB", "Chain", "Number", "Wild", "RSA", "Mutated", "Vdiff", "Hdiff", DDG_IB]
        );
        let sym = predictor_view(&table, SimbaModel::Sym, false).unwrap();
        assert!(sym.column(DDG_IB).is_err());
        assert!(sym.column(DDG_SYM).is_ok());

        // Chain B, residue 1 is the last row
        let rsa = ib.column("RSA").unwrap().f64().unwrap().get(4).unwrap();
        assert!((rsa - 0.123).abs() < 1e-9);
        let ddg = ib.column(DDG_IB).unwrap().f64().unwrap().get(4).unwrap();
        assert!((ddg - (-0.7)).abs() < 1e-9);
    }
}
