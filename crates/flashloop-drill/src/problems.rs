use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

/// One `a × b` flash card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Problem {
    pub a: u32,
    pub b: u32,
}

impl Problem {
    pub const fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    pub fn product(self) -> u64 {
        self.a as u64 * self.b as u64
    }

    pub fn is_correct(self, answer: u32) -> bool {
        self.product() == answer as u64
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \u{00D7} {}", self.a, self.b)
    }
}

/// Draws `count` distinct problems from `first × second`.
///
/// Every pair of the cartesian product is equally likely; when the product
/// has fewer than `count` pairs, all of them are returned in shuffled order.
pub fn generate<R>(first: &[u32], second: &[u32], count: usize, rng: &mut R) -> Vec<Problem>
where
    R: Rng + ?Sized,
{
    let mut pairs: Vec<Problem> = first
        .iter()
        .flat_map(|&a| second.iter().map(move |&b| Problem::new(a, b)))
        .collect();

    if pairs.len() < count {
        log::warn!(
            "only {} distinct problems available, {} requested",
            pairs.len(),
            count
        );
    }

    pairs.shuffle(rng);
    pairs.truncate(count);
    pairs
}
