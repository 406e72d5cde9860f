//! Per-step performance metrics for the population engine.
//!
//! [`StepMetrics`] captures timing and population size for a single step,
//! for profiling long runs and spotting slow products.

use serde::Serialize;

/// Timing and size metrics collected during a single step.
///
/// All durations are in microseconds. The engine fills these fields after
/// each `step()` call; callers read them from the most recent step.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Time spent building the population snapshot, in microseconds.
    pub population_us: u64,
    /// Time spent synthesizing the spectrum, in microseconds. Zero when no
    /// product reads the spectrum.
    pub synthesis_us: u64,
    /// Per-product observation times: `(name, microseconds)`.
    pub product_us: Vec<(String, u64)>,
    /// Number of weighted entries in the snapshot.
    pub living_entries: usize,
    /// Number of remnant events in the snapshot.
    pub remnant_events: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.population_us, 0);
        assert_eq!(m.synthesis_us, 0);
        assert!(m.product_us.is_empty());
        assert_eq!(m.living_entries, 0);
        assert_eq!(m.remnant_events, 0);
    }

    #[test]
    fn metrics_fields_accessible() {
        let m = StepMetrics {
            total_us: 100,
            population_us: 40,
            synthesis_us: 30,
            product_us: vec![("quanta".to_string(), 12), ("snr".to_string(), 3)],
            living_entries: 180,
            remnant_events: 2,
        };
        assert_eq!(m.total_us, 100);
        assert_eq!(m.population_us, 40);
        assert_eq!(m.synthesis_us, 30);
        assert_eq!(m.product_us.len(), 2);
        assert_eq!(m.product_us[0].0, "quanta");
        assert_eq!(m.product_us[1].1, 3);
        assert_eq!(m.living_entries, 180);
        assert_eq!(m.remnant_events, 2);
    }
}
