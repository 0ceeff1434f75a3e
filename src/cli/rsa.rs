use clap::Parser;
use polars::prelude::*;
use simba2::{
    extract_rsa, get_residue_areas, load_model, log_pdb_warnings, output_file, rsa_to_df,
    write_df_to_file, AccessibilityStandards, AminoAcidCodes, DataFrameFileType, SasaSettings,
    SimbaError,
};
use std::path::PathBuf;
use tracing::{debug, error, info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Calculate relative solvent accessibility (RSA) for each residue")]
pub(crate) struct Args {
    /// Path to the PDB or mmCIF file to be analyzed
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory or file
    #[arg(short, long)]
    output: PathBuf,

    /// Name of the output file
    #[arg(short = 'f', long = "filename", default_value_t = String::from("relative_sasa"))]
    filename: String,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// Model number to analyze (default: 0, the first model)
    #[arg(short = 'm', long = "model", default_value_t = 0)]
    model_num: usize,

    /// Probe radius r (smaller r detects more surface details and reports a larger surface)
    #[arg(short = 'r', long = "probe-radius", default_value_t = simba2::PROBE_RADIUS)]
    probe_radius: f32,

    /// Number of points on the sphere for sampling
    #[arg(short = 'n', long = "num-points", default_value_t = simba2::N_POINTS)]
    n_points: usize,

    /// Number of threads to use for parallel processing
    #[arg(short = 'j', long = "num-threads", default_value_t = 1)]
    num_threads: usize,
}

pub(crate) fn run(args: &Args) -> Result<(), SimbaError> {
    trace!("{args:?}");

    // Create Rayon thread pool
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(args.num_threads)
        .build_global()
    {
        warn!("{e}");
    }
    debug!("Using {} thread(s)", rayon::current_num_threads());

    // Load file as complex structure
    let input_file = args.input.to_string_lossy();
    let (pdb, pdb_warnings) = load_model(&input_file)?;
    log_pdb_warnings(&pdb_warnings);

    let settings = SasaSettings {
        probe_radius: args.probe_radius,
        n_points: args.n_points,
        model_num: args.model_num,
        ..Default::default()
    };
    let areas = get_residue_areas(&pdb, &settings)?;
    let rows = extract_rsa(
        &areas,
        &AccessibilityStandards::default(),
        &AminoAcidCodes::default(),
    )?;

    if rows.is_empty() {
        error!("No amino acid residues found in the input file. Please check the model number.");
        return Ok(());
    }

    let mut df_rsa = rsa_to_df(&rows)?
        .lazy()
        .select([
            col("Chain"),
            col("Number"),
            col("Wild"),
            col("RSA").round(3),
        ])
        .collect()?;
    debug!("Relative solvent accessibility\n{df_rsa}");

    // Prepare output directory
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let output_file = output_file(&args.output, &args.filename, args.output_format);

    // Save results to file
    write_df_to_file(&mut df_rsa, &output_file, args.output_format)?;
    info!("Results saved to {}", output_file.display());

    Ok(())
}
