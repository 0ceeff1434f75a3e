use polars::prelude::*;

/// Attach the mean RSA across chains at each residue number as `RSA_mean`.
///
/// The mean is broadcast back onto every row with that number, so the row count
/// is unchanged.
pub fn mean_rsa(residues: LazyFrame) -> LazyFrame {
    let chain_mean = residues
        .clone()
        .group_by([col("Number")])
        .agg([col("RSA").mean().alias("RSA_mean")]);

    residues.join(
        chain_mean,
        [col("Number")],
        [col("Number")],
        JoinArgs::new(JoinType::Left),
    )
}
