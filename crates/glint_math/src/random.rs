//! Random sampling primitives.
//!
//! Every sampler takes the generator explicitly. Renders hand each work unit
//! its own seeded generator, so there is no shared random state to contend on.
//!
//! The rejection loops below have no retry cap. Each try is accepted with a
//! fixed probability (about 0.52 for the sphere, 0.79 for the disk), so they
//! terminate with probability one.

use rand::{Rng, RngCore};

use crate::Vec3;

/// Squared lengths at or below this are rejected so normalizing cannot
/// underflow to a non-finite vector.
const MIN_SAMPLE_LENGTH_SQUARED: f64 = 1e-160;

/// Uniform `f64` in `[0, 1)`.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform `f64` in `[-1, 1)`.
#[inline]
fn gen_signed(rng: &mut dyn RngCore) -> f64 {
    gen_f64(rng) * 2.0 - 1.0
}

/// Uniformly distributed unit vector.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_signed(rng), gen_signed(rng), gen_signed(rng));
        let len_sq = p.length_squared();
        if MIN_SAMPLE_LENGTH_SQUARED < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Uniform point inside the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_signed(rng), gen_signed(rng), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform point in the square `[-0.5, 0.5) x [-0.5, 0.5)`, z = 0.
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5, 0.0)
}
