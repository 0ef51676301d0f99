use rand::Rng;

use crate::models::Question;

/// Picks one question uniformly at random among `candidates` whose id is not
/// in `previous`. Returns `None` once every candidate has been served.
pub fn pick_question<R>(candidates: Vec<Question>, previous: &[i32], rng: &mut R) -> Option<Question>
where
    R: Rng + ?Sized,
{
    let mut remaining: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();

    if remaining.is_empty() {
        return None;
    }
    let index = rng.random_range(0..remaining.len());
    Some(remaining.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn question(id: i32, category: i32) -> Question {
        Question {
            id,
            question: format!("question {id}"),
            answer: format!("answer {id}"),
            category,
            difficulty: 1,
        }
    }

    #[test]
    fn never_repeats_previous_questions() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool: Vec<Question> = (1..=5).map(|id| question(id, 1)).collect();
        let mut previous = Vec::new();

        for _ in 0..5 {
            let picked = pick_question(pool.clone(), &previous, &mut rng).unwrap();
            assert!(!previous.contains(&picked.id));
            previous.push(picked.id);
        }

        assert_eq!(pick_question(pool, &previous, &mut rng), None);
    }

    #[test]
    fn empty_pool_yields_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_question(Vec::new(), &[], &mut rng), None);
    }

    #[test]
    fn every_candidate_can_be_drawn() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool: Vec<Question> = (1..=4).map(|id| question(id, 2)).collect();
        let seen: HashSet<i32> = (0..200)
            .filter_map(|_| pick_question(pool.clone(), &[2], &mut rng))
            .map(|q| q.id)
            .collect();
        assert_eq!(seen, HashSet::from([1, 3, 4]));
    }

    proptest! {
        #[test]
        fn pick_is_a_candidate_outside_previous(
            ids in proptest::collection::hash_set(1i32..200, 0..30),
            previous in proptest::collection::vec(1i32..200, 0..30),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let pool: Vec<Question> = ids.iter().map(|&id| question(id, 1)).collect();
            let open = ids.iter().any(|id| !previous.contains(id));

            match pick_question(pool, &previous, &mut rng) {
                Some(q) => {
                    prop_assert!(ids.contains(&q.id));
                    prop_assert!(!previous.contains(&q.id));
                }
                None => prop_assert!(!open),
            }
        }
    }
}
