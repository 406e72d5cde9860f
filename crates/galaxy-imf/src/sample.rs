//! Stochastic draws from an [`Imf`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::imf::Imf;
use crate::power;

impl Imf {
    /// Draw `n` stellar masses.
    ///
    /// A segment is chosen with probability proportional to its share of
    /// the star count, then a mass is drawn inside it by inverting the
    /// segment's cumulative distribution.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let cumulative = self.segment_cdf();
        let mut masses = Vec::with_capacity(n);
        for _ in 0..n {
            let pick: f64 = rng.random();
            let index = cumulative
                .partition_point(|&c| c <= pick)
                .min(cumulative.len() - 1);
            let segment = &self.segments()[index];
            let u: f64 = rng.random();
            masses.push(power::inverse(
                segment.mass_lo,
                segment.mass_hi,
                1.0 - segment.exponent,
                u,
            ));
        }
        masses
    }

    /// [`sample`](Self::sample) with a `ChaCha8Rng` seeded from `seed`.
    ///
    /// The same seed always yields the same masses.
    pub fn sample_seeded(&self, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.sample(n, &mut rng)
    }

    /// Cumulative star-count share of each segment; the last entry is 1.
    fn segment_cdf(&self) -> Vec<f64> {
        let (lo, hi) = (self.mass_lo(), self.mass_hi());
        let counts: Vec<f64> = (0..self.segments().len())
            .map(|i| self.segment_number(i, lo, hi))
            .collect();
        let total: f64 = counts.iter().sum();
        let mut running = 0.0;
        counts
            .into_iter()
            .map(|c| {
                running += c / total;
                running
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::imf::Imf;

    #[test]
    fn samples_stay_in_range() {
        let imf = Imf::kroupa(0.1, 100.0).unwrap();
        let masses = imf.sample_seeded(5_000, 7);
        assert_eq!(masses.len(), 5_000);
        assert!(masses.iter().all(|&m| (0.1..=100.0).contains(&m)));
    }

    #[test]
    fn same_seed_same_draws() {
        let imf = Imf::salpeter(1.0, 100.0).unwrap();
        assert_eq!(imf.sample_seeded(100, 42), imf.sample_seeded(100, 42));
        assert_ne!(imf.sample_seeded(100, 42), imf.sample_seeded(100, 43));
    }

    #[test]
    fn empirical_fraction_tracks_analytic() {
        let imf = Imf::kroupa(0.1, 100.0).unwrap();
        let n = 200_000;
        let masses = imf.sample_seeded(n, 2024);
        let above = masses.iter().filter(|&&m| m > 1.0).count() as f64 / n as f64;
        let want = imf.number_fraction(1.0, 100.0);
        assert!((above - want).abs() < 0.01, "{above} vs {want}");
    }
}
