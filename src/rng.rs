//! Seeded randomness. Stateless hashes place terrain and wind on the lattice;
//! [`Rng`] feeds the per-spring flora jitter, which must replay exactly for a
//! given seed.

const PCG_MULT: u64 = 6_364_136_223_846_793_005;

/// 64-bit avalanche mix (murmur3 finalizer).
#[inline]
pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    x ^= x >> 33;
    x = x.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    x ^ (x >> 33)
}

/// Independent 32-bit stream seed for one consumer of a scene seed.
#[inline]
pub fn derive_seed(seed: u64, salt: u64) -> u32 {
    (mix64(seed ^ salt.rotate_left(17)) >> 32) as u32
}

/// Hash of lattice cell `(ix, iz)` under `seed`.
#[inline]
pub fn lattice_hash(ix: i32, iz: i32, seed: u32) -> u32 {
    let cell = ((ix as u32 as u64) << 32) | iz as u32 as u64;
    (mix64(cell ^ (seed as u64).wrapping_mul(PCG_MULT)) >> 32) as u32
}

/// PCG32 (XSH-RR). One draw per spring axis per step, so it stays small.
#[derive(Clone, Debug)]
pub struct Rng {
    state: u64,
    inc: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        let mut rng = Self {
            state: 0,
            inc: (seed << 1) | 1,
        };
        rng.next_u32();
        rng.state = rng.state.wrapping_add(mix64(seed));
        rng.next_u32();
        rng
    }

    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = old.wrapping_mul(PCG_MULT).wrapping_add(self.inc);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        xorshifted.rotate_right((old >> 59) as u32)
    }

    /// Uniform in `[0, 1)`, 24 bits of mantissa.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// Uniform in `[0, max)`. `max` must fit in 32 bits.
    pub fn range_usize(&mut self, max: usize) -> usize {
        ((self.next_u32() as u64 * max as u64) >> 32) as usize
    }
}
