//! SimBa-IB and SimBa-SYM linear models.
//!
//! ```text
//! ddG_IB  = b0 + b1*RSA + b2*Vdiff + b3*Hdiff + b4*RSA*Vdiff + b5*RSA*Hdiff
//! ddG_SYM =      c1*Vdiff + c2*Hdiff + c3*RSA*Vdiff + c4*RSA*Hdiff
//! ```
//!
//! Vdiff is the volume difference in units of 100 Å³. Each [`ModelVersion`] maps
//! to exactly one [`Coefficients`] value; a run never mixes versions.

use polars::prelude::*;
use std::fmt;

/// Published model versions.
#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum ModelVersion {
    /// SimBa2 coefficients
    #[default]
    Simba2,
}

impl ModelVersion {
    /// Linear model coefficients of this version.
    pub fn coefficients(&self) -> Coefficients {
        match self {
            ModelVersion::Simba2 => Coefficients {
                ib: [-0.692, 0.905, 1.425, -0.365, -1.494, 0.625],
                sym: [1.642, -0.421, -1.867, 0.737],
            },
        }
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelVersion::Simba2 => write!(f, "simba2"),
        }
    }
}

/// Regression coefficients of both predictors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// b0..b5: intercept, RSA, Vdiff, Hdiff, RSA*Vdiff, RSA*Hdiff
    pub ib: [f64; 6],
    /// c1..c4: Vdiff, Hdiff, RSA*Vdiff, RSA*Hdiff
    pub sym: [f64; 4],
}

impl Coefficients {
    /// SimBa-IB prediction for a single substitution.
    pub fn ib(&self, rsa: f64, vdiff: f64, hdiff: f64) -> f64 {
        let [b0, b1, b2, b3, b4, b5] = self.ib;
        b0 + b1 * rsa + b2 * vdiff + b3 * hdiff + b4 * rsa * vdiff + b5 * rsa * hdiff
    }

    /// SimBa-SYM prediction for a single substitution.
    pub fn sym(&self, rsa: f64, vdiff: f64, hdiff: f64) -> f64 {
        let [c1, c2, c3, c4] = self.sym;
        c1 * vdiff + c2 * hdiff + c3 * rsa * vdiff + c4 * rsa * hdiff
    }

    /// [`Coefficients::ib`] as a column expression over `rsa`, `Vdiff` and `Hdiff`.
    pub fn ib_expr(&self, rsa: &str) -> Expr {
        let [b0, b1, b2, b3, b4, b5] = self.ib;
        lit(b0)
            + lit(b1) * col(rsa)
            + lit(b2) * col("Vdiff")
            + lit(b3) * col("Hdiff")
            + lit(b4) * col(rsa) * col("Vdiff")
            + lit(b5) * col(rsa) * col("Hdiff")
    }

    /// [`Coefficients::sym`] as a column expression over `rsa`, `Vdiff` and `Hdiff`.
    pub fn sym_expr(&self, rsa: &str) -> Expr {
        let [c1, c2, c3, c4] = self.sym;
        lit(c1) * col("Vdiff")
            + lit(c2) * col("Hdiff")
            + lit(c3) * col(rsa) * col("Vdiff")
            + lit(c4) * col(rsa) * col("Hdiff")
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        ModelVersion::default().coefficients()
    }
}
