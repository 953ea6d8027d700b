use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};

use crate::Problem;

// upper bound for the length of generated rows
const MAX_ROW_LEN: usize = 5;

// Problem generation works by planting a solution:
// the universe is shuffled and cut into random chunks, each chunk becomes a row.
// Distractor rows are random subsets that may or may not combine into
// further solutions. Finally all rows are shuffled so the planted ones
// don't sit at predictable positions.
impl Problem {
    /// Generates a random problem that has at least one exact cover.
    ///
    /// The planted cover is mixed with `distractors` additional random rows.
    pub fn generate<R: Rng + ?Sized>(
        universe_size: usize,
        distractors: usize,
        rng: &mut R,
    ) -> Problem {
        let mut elements: Vec<usize> = (0..universe_size).collect();
        elements.shuffle(rng);

        let mut rows = Vec::with_capacity(universe_size + distractors);
        let mut rest = &elements[..];
        while !rest.is_empty() {
            let len = rng.gen_range(1..=rest.len().min(MAX_ROW_LEN));
            let (row, tail) = rest.split_at(len);
            rows.push(row.to_vec());
            rest = tail;
        }
        rows.extend(random_rows(universe_size, distractors, rng));
        rows.shuffle(rng);

        Problem::from_rows(universe_size, rows)
    }

    /// Same as [`Problem::generate`] with a deterministic rng seeded with `seed`
    pub fn generate_seeded(universe_size: usize, distractors: usize, seed: u64) -> Problem {
        let mut rng = StdRng::seed_from_u64(seed);
        Problem::generate(universe_size, distractors, &mut rng)
    }

    /// Generates `n_rows` random rows without any guarantee that an exact cover exists.
    pub fn generate_random<R: Rng + ?Sized>(
        universe_size: usize,
        n_rows: usize,
        rng: &mut R,
    ) -> Problem {
        Problem::from_rows(universe_size, random_rows(universe_size, n_rows, rng))
    }
}

fn random_rows<R: Rng + ?Sized>(
    universe_size: usize,
    n_rows: usize,
    rng: &mut R,
) -> Vec<Vec<usize>> {
    if universe_size == 0 {
        return vec![Vec::new(); n_rows];
    }
    (0..n_rows)
        .map(|_| {
            let len = rng.gen_range(1..=universe_size.min(MAX_ROW_LEN));
            index::sample(&mut *rng, universe_size, len).into_vec()
        })
        .collect()
}
