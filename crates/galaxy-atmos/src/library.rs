//! Sub-libraries and the routed [`AtmosphereLibrary`].

use std::sync::Arc;

use galaxy_core::{DataError, InterpolationError, StellarState};
use indexmap::IndexMap;
use thiserror::Error;
use tracing::warn;

use crate::blend::BlendRule;
use crate::grid::{AtmosphereGrid, Spectrum};

/// Grids of one atmosphere family at several metallicities.
#[derive(Clone, Debug)]
pub struct SubLibrary {
    name: String,
    grids: Vec<AtmosphereGrid>,
}

impl SubLibrary {
    /// Build a sub-library; grids are sorted by metallicity.
    pub fn new(name: impl Into<String>, mut grids: Vec<AtmosphereGrid>) -> Result<Self, DataError> {
        let name = name.into();
        if grids.is_empty() {
            return Err(DataError::EmptyTable {
                table: format!("atmosphere sub-library '{name}'"),
            });
        }
        grids.sort_by(|a, b| a.metallicity().total_cmp(&b.metallicity()));
        Ok(Self { name, grids })
    }

    /// Sub-library name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grids in increasing metallicity.
    pub fn grids(&self) -> &[AtmosphereGrid] {
        &self.grids
    }

    /// Index of the grid nearest to `z` in `log Z`, and whether it is an
    /// exact match. Metallicity is never interpolated.
    pub fn nearest_index(&self, z: f64) -> (usize, bool) {
        let target = z.log10();
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for (i, g) in self.grids.iter().enumerate() {
            let d = (g.metallicity().log10() - target).abs();
            if d < best_d {
                best = i;
                best_d = d;
            }
        }
        (best, self.grids[best].metallicity() == z)
    }

    /// The grid nearest to `z`.
    pub fn nearest(&self, z: f64) -> &AtmosphereGrid {
        &self.grids[self.nearest_index(z).0]
    }
}

/// A blend rule referenced a sub-library that is not loaded.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("atmosphere sub-library '{name}' is not loaded")]
pub struct UnknownSubLibrary {
    /// The missing name.
    pub name: String,
}

/// Named sub-libraries plus the [`BlendRule`] that routes stars to them.
///
/// Sub-libraries are `Arc`-shared, so re-routing with
/// [`with_rule`](Self::with_rule) does not copy flux tables.
#[derive(Clone, Debug)]
pub struct AtmosphereLibrary {
    sublibraries: IndexMap<String, Arc<SubLibrary>>,
    rule: BlendRule,
}

impl AtmosphereLibrary {
    /// Assemble a library, checking that every name in `rule` is present.
    pub fn new(sublibraries: Vec<SubLibrary>, rule: BlendRule) -> Result<Self, UnknownSubLibrary> {
        let sublibraries = sublibraries
            .into_iter()
            .map(|s| (s.name().to_owned(), Arc::new(s)))
            .collect();
        Self {
            sublibraries,
            rule: BlendRule::single(String::new()),
        }
        .with_rule(rule)
    }

    /// Same sub-libraries, different routing.
    pub fn with_rule(&self, rule: BlendRule) -> Result<Self, UnknownSubLibrary> {
        if let Some(name) = rule
            .libraries()
            .find(|name| !self.sublibraries.contains_key(*name))
        {
            return Err(UnknownSubLibrary {
                name: name.to_owned(),
            });
        }
        Ok(Self {
            sublibraries: self.sublibraries.clone(),
            rule,
        })
    }

    /// The active routing rule.
    pub fn rule(&self) -> &BlendRule {
        &self.rule
    }

    /// Whether a sub-library of this name is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.sublibraries.contains_key(name)
    }

    /// Look up a sub-library and its position.
    pub fn sublibrary(&self, name: &str) -> Option<(usize, &Arc<SubLibrary>)> {
        self.sublibraries
            .get_full(name)
            .map(|(index, _, lib)| (index, lib))
    }

    /// Sub-libraries in registration order.
    pub fn sublibraries(&self) -> impl Iterator<Item = &Arc<SubLibrary>> {
        self.sublibraries.values()
    }

    /// Log a warning for every routed sub-library that lacks an exact
    /// metallicity match for `z`. Returns the number of inexact matches.
    pub fn check_metallicity(&self, z: f64) -> usize {
        let mut inexact = 0;
        for name in self.rule.libraries() {
            let Some((_, lib)) = self.sublibrary(name) else {
                continue;
            };
            let (index, exact) = lib.nearest_index(z);
            if !exact {
                inexact += 1;
                warn!(
                    library = name,
                    requested = z,
                    using = lib.grids()[index].metallicity(),
                    "no atmosphere grid at requested metallicity, using nearest"
                );
            }
        }
        inexact
    }

    /// Surface flux of a non-Wolf–Rayet star at `(teff, log_g)` and
    /// metallicity `z`.
    ///
    /// Uses the nearest tabulated metallicity (no interpolation in `Z`,
    /// logged when inexact), then bilinear interpolation in
    /// `(log Teff, log g)` with `log g` clamped to the row's nodes.
    pub fn spectrum(&self, teff: f64, log_g: f64, z: f64) -> Result<Spectrum, InterpolationError> {
        let grid = self.grid_for(self.rule.route_teff(teff), z)?;
        grid.spectrum(teff, log_g)
    }

    /// Surface flux for a stellar state, routed by phase and Teff.
    pub fn spectrum_for(&self, state: &StellarState, z: f64) -> Result<Spectrum, InterpolationError> {
        let grid = self.grid_for(self.rule.route(state), z)?;
        grid.spectrum(state.teff(), state.log_g())
    }

    fn grid_for(&self, name: &str, z: f64) -> Result<&AtmosphereGrid, InterpolationError> {
        let (_, lib) = self
            .sublibrary(name)
            .ok_or_else(|| InterpolationError::EmptyGrid {
                what: format!("atmosphere sub-library '{name}'"),
            })?;
        let (index, exact) = lib.nearest_index(z);
        let grid = &lib.grids()[index];
        if !exact {
            warn!(
                library = name,
                requested = z,
                using = grid.metallicity(),
                "no atmosphere grid at requested metallicity, using nearest"
            );
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackbody::blackbody_grid;
    use crate::blend::{AtmosphereModel, BlendRule};

    fn sub(name: &str, zs: &[f64]) -> SubLibrary {
        let wl: Arc<[f64]> = Arc::from(vec![1000.0, 5000.0, 10000.0]);
        let grids = zs
            .iter()
            .map(|&z| blackbody_grid(name, z, Arc::clone(&wl), &[3000.0, 50_000.0], &[0.0, 5.0]).unwrap())
            .collect();
        SubLibrary::new(name, grids).unwrap()
    }

    #[test]
    fn nearest_metallicity_in_log() {
        let lib = sub("lejeune", &[0.02, 0.001, 0.004]);
        assert_eq!(lib.grids()[0].metallicity(), 0.001);
        assert_eq!(lib.nearest(0.0025).metallicity(), 0.004);
        assert_eq!(lib.nearest(0.0015).metallicity(), 0.001);
        assert_eq!(lib.nearest_index(0.02), (2, true));
        assert!(!lib.nearest_index(0.014).1);
    }

    #[test]
    fn unknown_rule_library_is_rejected() {
        let err = AtmosphereLibrary::new(
            vec![sub("lejeune", &[0.02])],
            AtmosphereModel::LejeuneHillier.rule(),
        )
        .unwrap_err();
        assert_eq!(err.name, "hillier");
    }

    #[test]
    fn with_rule_shares_sublibraries() {
        let lib = AtmosphereLibrary::new(
            vec![sub("lejeune", &[0.02]), sub("hillier", &[0.02])],
            BlendRule::single("lejeune"),
        )
        .unwrap();
        let routed = lib.with_rule(AtmosphereModel::LejeuneHillier.rule()).unwrap();
        let (_, a) = lib.sublibrary("hillier").unwrap();
        let (_, b) = routed.sublibrary("hillier").unwrap();
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn counts_inexact_metallicities() {
        let lib = AtmosphereLibrary::new(
            vec![sub("lejeune", &[0.02]), sub("hillier", &[0.014])],
            AtmosphereModel::LejeuneHillier.rule(),
        )
        .unwrap();
        assert_eq!(lib.check_metallicity(0.014), 1);
        assert_eq!(lib.spectrum(5000.0, 4.0, 0.014).unwrap().flux.len(), 3);
    }
}
