use clap::Parser;
use simba2::{
    retrieve_pdb, simba2_predict, write_df_to_file, DataFrameFileType, DescriptorTable,
    HomogeneityMethod, ModelVersion, PredictOptions, Predictor, RetrievedStructure, SasaSettings,
    SimbaError, SimbaModel,
};
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Predicts ddG with SimBa-IB and SimBa-SYM")]
pub(crate) struct Args {
    /// PDB identifier, used for downloading and in output file names
    pdbname: String,

    /// Alternative directory to save the downloaded PDB file in (default: current directory)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Path to an existing PDB or mmCIF file (instead of downloading from RCSB)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Keep the downloaded PDB file
    #[arg(short, long, default_value_t = false)]
    keep: bool,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// JSON file with Hdiff and Vdiff descriptors (default: bundled table)
    #[arg(long)]
    descriptors: Option<PathBuf>,

    /// Add a Gene column from the COMPND and SOURCE header records
    #[arg(short, long, default_value_t = false)]
    genes: bool,

    /// How chains are compared when detecting homo-oligomers
    #[arg(long, default_value_t = HomogeneityMethod::Residue)]
    homogeneity: HomogeneityMethod,

    /// Coefficient set of the SimBa models
    #[arg(long = "model-version", default_value_t = ModelVersion::Simba2)]
    model_version: ModelVersion,

    /// Model number to analyze (default: 0, the first model)
    #[arg(short = 'm', long = "model", default_value_t = 0)]
    model_num: usize,

    /// Probe radius r (smaller r detects more surface details and reports a larger surface)
    #[arg(short = 'r', long = "probe-radius", default_value_t = simba2::PROBE_RADIUS)]
    probe_radius: f32,

    /// Number of points on the sphere for sampling
    #[arg(short = 'n', long = "num-points", default_value_t = simba2::N_POINTS)]
    n_points: usize,

    /// Number of threads to use for the surface calculation
    #[arg(short = 'j', long = "num-threads", default_value_t = 1)]
    num_threads: usize,
}

/// Keep or remove a file downloaded in this run.
///
/// A failed removal is only logged so it cannot mask the outcome of the prediction.
fn clean_up_download(structure: &RetrievedStructure, keep: bool, pdbname: &str) {
    if !structure.downloaded {
        return;
    }
    match keep {
        true => info!(
            "PDB {} saved at {}",
            pdbname.to_uppercase(),
            structure.path.display()
        ),
        false => {
            if let Err(e) = std::fs::remove_file(&structure.path) {
                warn!("Failed to remove {}: {e}", structure.path.display());
            }
        }
    }
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

    // Download the PDB or use the provided file
    let structure = match &args.file {
        Some(file) => RetrievedStructure {
            path: file.clone(),
            downloaded: false,
        },
        None => {
            let pdb_dir = match &args.dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()?,
            };
            retrieve_pdb(&args.pdbname, &pdb_dir)?
        }
    };
    debug!("Using input file {}", structure.path.display());

    let descriptors = match &args.descriptors {
        Some(path) => DescriptorTable::from_path(path)?,
        None => DescriptorTable::bundled()?,
    };
    let predictor = Predictor::new(descriptors, args.model_version);
    let options = PredictOptions {
        sasa: SasaSettings {
            probe_radius: args.probe_radius,
            n_points: args.n_points,
            model_num: args.model_num,
            ..Default::default()
        },
        homogeneity: args.homogeneity,
        genes: args.genes,
    };

    let prediction = simba2_predict(&args.pdbname, &structure.path, &predictor, &options);
    clean_up_download(&structure, args.keep, &args.pdbname);
    let prediction = prediction?;

    let class = prediction.classification;
    if class.is_homo_oligomer() {
        info!("The structure is a homooligomer.");
    } else if class.multi_chain {
        info!("The structure is a heterooligomer.");
    }

    // Prepare output directory
    let output_dir = match &args.output {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    std::fs::create_dir_all(&output_dir)?;

    for model in [SimbaModel::Ib, SimbaModel::Sym] {
        let mut df = prediction.view(model)?;
        let output_file = output_dir.join(format!(
            "{}_{}.{}",
            model.label(),
            prediction.name,
            args.output_format
        ));
        write_df_to_file(&mut df, &output_file, args.output_format)?;
        info!(
            "{} rows saved to {}",
            df.height(),
            output_file.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downloaded(path: PathBuf) -> RetrievedStructure {
        RetrievedStructure {
            path,
            downloaded: true,
        }
    }

    #[test]
    fn test_downloaded_file_is_removed_unless_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdb1abc.ent");

        std::fs::write(&path, "END\n").unwrap();
        clean_up_download(&downloaded(path.clone()), true, "1abc");
        assert!(path.exists());

        clean_up_download(&downloaded(path.clone()), false, "1abc");
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_removal_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("pdb1abc.ent");
        clean_up_download(&downloaded(missing.clone()), false, "1abc");
        assert!(!missing.exists());
    }

    #[test]
    fn test_local_file_is_never_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.pdb");
        std::fs::write(&path, "END\n").unwrap();

        let local = RetrievedStructure {
            path: path.clone(),
            downloaded: false,
        };
        clean_up_download(&local, false, "1abc");
        assert!(path.exists());
    }
}
