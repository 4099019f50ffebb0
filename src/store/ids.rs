//! Record identifier generation
//!
//! Generated ids are four 4-hex-digit segments laid out as
//! `SSSSSSSS-SSSS-SSSS-`. The trailing hyphen is part of the format.
//!
//! Ids are random, not checked for uniqueness. A collision with an existing
//! id in the same category routes the new item to the update path.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

/// Source of identifiers for records created without one
pub trait IdGenerator: Send + Sync {
    /// Produce the next identifier
    fn generate(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Random hex-segment identifiers (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct HexSegmentIds;

impl HexSegmentIds {
    /// One segment: a value in `[0x10000, 0x20000)` in base 16, leading digit dropped
    fn segment<R: Rng>(rng: &mut R) -> String {
        let value: u32 = rng.gen_range(0x10000..0x20000);
        let hex = format!("{:x}", value);
        hex[1..].to_string()
    }
}

impl IdGenerator for HexSegmentIds {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let a = Self::segment(&mut rng);
        let b = Self::segment(&mut rng);
        let c = Self::segment(&mut rng);
        let d = Self::segment(&mut rng);
        format!("{}{}-{}-{}-", a, b, c, d)
    }
}

/// Deterministic counter-backed identifiers in the same layout
///
/// The counter fills the first two segments, so ids are unique for the
/// first 2^32 generations.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Start counting from zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `start`
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{:08x}-0000-0000-", n & 0xffff_ffff)
    }
}
