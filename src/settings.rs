//! Run settings shared by the library and the command-line interface.

use crate::oligomer::HomogeneityMethod;

/// Default probe radius in Å (radius of a water molecule)
pub const PROBE_RADIUS: f32 = 1.4;
/// Default number of sphere points per atom
pub const N_POINTS: usize = 100;

/// Solvent accessibility settings.
#[derive(Clone, Debug)]
pub struct SasaSettings {
    /// Probe radius in Å
    pub probe_radius: f32,
    /// Number of points on the sphere for sampling
    pub n_points: usize,
    /// Index of the model to analyze (0 is the first model)
    pub model_num: usize,
}

impl Default for SasaSettings {
    fn default() -> Self {
        Self {
            probe_radius: PROBE_RADIUS,
            n_points: N_POINTS,
            model_num: 0,
        }
    }
}

/// Options for a prediction run.
#[derive(Clone, Debug, Default)]
pub struct PredictOptions {
    /// Surface calculation settings
    pub sasa: SasaSettings,
    /// How chains are compared when detecting homo-oligomers
    pub homogeneity: HomogeneityMethod,
    /// Annotate rows with the gene name of their chain
    pub genes: bool,
}
