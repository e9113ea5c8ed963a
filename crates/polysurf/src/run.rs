//! The two-pass fitting protocol: fit around the initial guess, then refit
//! around the stationary point found by the first fit.

use serde::Serialize;

use crate::{
    Bias, Characterization, Config, Dataset, Dvec, Error, Fitter, Newton,
    Residuals, Surface, fc::Fc, fc::force_constants,
};

/// The results of fitting a [Dataset] once.
#[derive(Clone, Debug, Serialize)]
pub struct Pass {
    /// the bias subtracted from the data before fitting
    pub bias: Bias,
    pub coeffs: Dvec,
    pub residuals: Residuals,
    pub fcs: Vec<Fc>,
    /// the stationary point and its energy, relative to `bias`. This is the
    /// long line used as the bias of the next pass
    pub stationary: Bias,
    pub characterization: Characterization,
}

/// Runs the fitting passes with the settings from a [Config].
#[derive(Clone, Debug, Default)]
pub struct Runner {
    pub config: Config,
}

impl Runner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// subtract `bias` from `data` and fit it, find the stationary point of the
    /// fitted surface, characterize it, and compute the force constants.
    /// returns the pass and the biased data for use in a following pass
    pub fn pass(
        &self,
        data: &Dataset,
        bias: &Bias,
    ) -> Result<(Pass, Dataset), Error> {
        log::debug!("biasing {} points by {bias}", data.energies.len());
        let data = data.bias(bias)?;
        let fit = Fitter::from(&self.config).fit(
            &data.disps,
            &data.energies,
            &data.exponents,
        )?;
        let residuals = fit.residuals(&data.energies);
        let fcs = force_constants(&fit.coeffs, &data.exponents);
        let surface = Surface::new(&data.exponents, fit.coeffs)?;
        let x = Newton::from(&self.config).solve(&surface)?;
        let characterization = surface.characterize(&x);
        let energy = surface.eval(&x);
        log::debug!(
            "found {} with energy {energy:.12} at {:.10}",
            characterization.kind,
            x.transpose()
        );
        let pass = Pass {
            bias: bias.clone(),
            coeffs: surface.coeffs,
            residuals,
            fcs,
            stationary: Bias { disp: x, energy },
            characterization,
        };
        Ok((pass, data))
    }

    /// Run the first pass with the bias from `data`, or no bias if it has
    /// none. Unless `data` is already at a stationary point, or `once` is set,
    /// run exactly one more pass with the stationary point of the first as its
    /// bias. The last pass returned is the authoritative one.
    pub fn run(&self, data: &Dataset) -> Result<Vec<Pass>, Error> {
        let bias = data
            .bias
            .clone()
            .unwrap_or_else(|| Bias::zeros(data.nvbl()));
        let (first, biased) = self.pass(data, &bias)?;
        if data.is_stationary() || self.config.once {
            return Ok(vec![first]);
        }
        let (second, _) = self.pass(&biased, &first.stationary)?;
        Ok(vec![first, second])
    }
}
