// Bounded random variation applied on top of the impact multiplier.
//
// The random source is always passed in. Production code hands over a
// `StdRng`; tests use a seeded `StdRng` or `rand::rngs::mock::StepRng`.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// How far a value may drift from its base: `base +/- base * (1 - factor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spread {
    /// +/- 10%
    Minor,
    /// +/- 30%
    Medium,
    /// +/- 50%
    Major,
}

impl Spread {
    pub fn factor(self) -> f64 {
        match self {
            Spread::Minor => 0.9,
            Spread::Medium => 0.7,
            Spread::Major => 0.5,
        }
    }
}

/// Uniform sample in `[low, high)`.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + rng.gen::<f64>() * (high - low)
}

/// Uniform sample in `[base - d, base + d)` with `d = base * (1 - spread)`.
pub fn random_variation<R: Rng + ?Sized>(rng: &mut R, base: f64, spread: Spread) -> f64 {
    let range = base * (1.0 - spread.factor());
    base - range + rng.gen::<f64>() * (range * 2.0)
}

/// Session random source: a fixed seed for reproducible runs, or entropy when
/// the seed is 0.
pub fn session_rng(seed: u64) -> StdRng {
    if seed == 0 {
        StdRng::from_entropy()
    } else {
        StdRng::seed_from_u64(seed)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use rand::rngs::mock::StepRng;

    /// Always samples 0.5, so every variation lands exactly on its base.
    pub fn midpoint() -> StepRng {
        StepRng::new(1 << 63, 0)
    }

    /// Always samples 0.0, the low edge of every range.
    pub fn low_edge() -> StepRng {
        StepRng::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{low_edge, midpoint};
    use super::*;

    #[test]
    fn midpoint_sample_returns_base() {
        let mut rng = midpoint();
        assert!((random_variation(&mut rng, 1.0, Spread::Medium) - 1.0).abs() < 1e-12);
        assert!((random_variation(&mut rng, 1.5, Spread::Minor) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn low_edge_hits_spread_bound() {
        let mut rng = low_edge();
        assert!((random_variation(&mut rng, 1.0, Spread::Minor) - 0.9).abs() < 1e-12);
        assert!((random_variation(&mut rng, 1.0, Spread::Medium) - 0.7).abs() < 1e-12);
        assert!((random_variation(&mut rng, 2.0, Spread::Major) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn samples_stay_within_spread() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_variation(&mut rng, 1.0, Spread::Medium);
            assert!((0.7..1.3).contains(&v));
            let u = uniform(&mut rng, -0.1, 0.1);
            assert!((-0.1..0.1).contains(&u));
        }
    }

    #[test]
    fn seeded_session_is_reproducible() {
        let mut a = session_rng(42);
        let mut b = session_rng(42);
        for _ in 0..5 {
            assert_eq!(a.gen::<f64>(), b.gen::<f64>());
        }
    }
}
