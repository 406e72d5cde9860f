//! Element-resolved mass return from winds and supernovae.

use galaxy_core::{EvolutionaryPhase, ProductError, ProductKind, RemnantKind};
use galaxy_product::{
    ElementMasses, Inputs, OutputSeries, Product, ProductSeries, StepContext, YieldsRow,
};

/// Remnant left by a core-collapse supernova, M☉.
pub const NEUTRON_STAR_MASS: f64 = 1.4;

/// Solar metal fraction the wind compositions are scaled from.
const SOLAR_Z: f64 = 0.02;

// ── Supernova yield table ──────────────────────────────────────────

/// Mass fractions of the supernova ejecta, tabulated by initial mass.
///
/// Fractions are interpolated linearly in mass and held constant beyond
/// the ends of the table.
#[derive(Clone, Debug, PartialEq)]
pub struct YieldTable {
    masses: Vec<f64>,
    fractions: Vec<ElementMasses>,
}

impl Default for YieldTable {
    fn default() -> Self {
        let masses = vec![15.0, 20.0, 25.0, 40.0, 60.0];
        let h = [0.7, 0.6, 0.5, 0.4, 0.3];
        let he = [0.28, 0.38, 0.48, 0.58, 0.68];
        let c = [0.001, 0.002, 0.003, 0.004, 0.005];
        let n = [0.001, 0.002, 0.003, 0.004, 0.005];
        let o = [0.008, 0.007, 0.006, 0.005, 0.004];
        let fractions = (0..masses.len())
            .map(|i| ElementMasses {
                h: h[i],
                he: he[i],
                c: c[i],
                n: n[i],
                o: o[i],
            })
            .collect();
        Self { masses, fractions }
    }
}

impl YieldTable {
    /// Build a table; `masses` must be strictly increasing and match
    /// `fractions` in length.
    pub fn new(masses: Vec<f64>, fractions: Vec<ElementMasses>) -> Result<Self, ProductError> {
        if masses.is_empty() || masses.len() != fractions.len() {
            return Err(ProductError::ExecutionFailed {
                reason: "yield table needs one fraction row per mass".into(),
            });
        }
        if masses.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ProductError::ExecutionFailed {
                reason: "yield table masses must be strictly increasing".into(),
            });
        }
        Ok(Self { masses, fractions })
    }

    /// Ejecta mass fractions for a star of initial mass `mass`.
    pub fn fractions(&self, mass: f64) -> ElementMasses {
        let n = self.masses.len();
        if mass <= self.masses[0] {
            return self.fractions[0];
        }
        if mass >= self.masses[n - 1] {
            return self.fractions[n - 1];
        }
        let j = self.masses.partition_point(|&m| m <= mass);
        let (m0, m1) = (self.masses[j - 1], self.masses[j]);
        let f = (mass - m0) / (m1 - m0);
        self.fractions[j - 1].scaled(1.0 - f) + self.fractions[j].scaled(f)
    }
}

// ── Wind composition ───────────────────────────────────────────────

/// Surface mass fractions of a wind from a star in `phase` at metallicity
/// `z`.
///
/// Hydrogen-rich phases carry the initial composition with metals scaled
/// from solar. WN winds show CNO-processed material, WC winds
/// helium-burning products.
pub fn wind_composition(phase: EvolutionaryPhase, z: f64) -> ElementMasses {
    let s = z / SOLAR_Z;
    match phase {
        EvolutionaryPhase::WolfRayetWn => ElementMasses {
            h: 0.1,
            he: 0.88 - 0.016 * s,
            c: 0.0005 * s,
            n: 0.015 * s,
            o: 0.0005 * s,
        },
        EvolutionaryPhase::WolfRayetWc => ElementMasses {
            h: 0.0,
            he: 0.55,
            c: 0.35,
            n: 0.0,
            o: 0.10,
        },
        _ => ElementMasses {
            h: 0.70,
            he: 0.30 - 0.014 * s,
            c: 0.003 * s,
            n: 0.001 * s,
            o: 0.010 * s,
        },
    }
}

// ── Product ────────────────────────────────────────────────────────

/// Mass return per element.
///
/// Wind ejection comes from the tracks' mass-loss rates. Supernova ejecta
/// are the initial mass minus a neutron-star remnant, split by the
/// [`YieldTable`]. Direct black-hole collapses and white-dwarf formation
/// return nothing beyond what the winds already carried away.
#[derive(Debug)]
pub struct YieldsProduct {
    table: YieldTable,
    cumulative: ElementMasses,
    series: OutputSeries<YieldsRow>,
}

impl Default for YieldsProduct {
    fn default() -> Self {
        Self::new(YieldTable::default())
    }
}

impl YieldsProduct {
    /// Use `table` for supernova ejecta.
    pub fn new(table: YieldTable) -> Self {
        Self {
            table,
            cumulative: ElementMasses::default(),
            series: OutputSeries::new(),
        }
    }
}

impl Product for YieldsProduct {
    fn name(&self) -> &str {
        "yields"
    }

    fn kind(&self) -> ProductKind {
        ProductKind::Yields
    }

    fn reads(&self) -> Inputs {
        Inputs::SNAPSHOT
    }

    fn observe(&mut self, ctx: &StepContext<'_>) -> Result<(), ProductError> {
        let snapshot = ctx.snapshot();
        let dt = ctx.dt();
        if dt <= 0.0 {
            return Err(ProductError::ExecutionFailed {
                reason: format!("step width {dt} is not positive"),
            });
        }

        let mut wind = ElementMasses::default();
        for entry in &snapshot.entries {
            let rate = entry.weight * entry.state.mdot();
            wind += wind_composition(entry.state.phase, ctx.metallicity()).scaled(rate);
        }

        let mut ejected = ElementMasses::default();
        for event in snapshot
            .events
            .iter()
            .filter(|e| e.kind == RemnantKind::Supernova)
        {
            // Wind losses were already returned while the stars lived.
            let mass = (event.mean_final_mass() - NEUTRON_STAR_MASS).max(0.0) * event.count;
            ejected += self.table.fractions(event.mean_mass()).scaled(mass);
        }
        let supernova = ejected.scaled(1.0 / dt);

        self.cumulative += wind.scaled(dt) + ejected;
        self.series.push(
            ctx.time(),
            YieldsRow {
                wind,
                supernova,
                cumulative: self.cumulative,
            },
        )?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ProductSeries {
        ProductSeries::Yields(self.series)
    }
}
