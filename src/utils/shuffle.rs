use crate::error::{Error, Result};
use rand::Rng;

/// Returns a fresh Fisher-Yates permutation of `items`. The input slice is
/// never mutated; callers hand the same canonical data to many requests.
pub fn shuffled<T, R>(items: &[T], rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}

/// Shuffles an option list and remaps the correct-answer index so it keeps
/// pointing at the same option text. Rejects an out-of-range index instead
/// of producing a silently wrong mapping.
pub fn shuffle_options<R>(
    options: &[String],
    correct_answer: i32,
    rng: &mut R,
) -> Result<(Vec<String>, i32)>
where
    R: Rng + ?Sized,
{
    let correct = usize::try_from(correct_answer).ok().filter(|c| *c < options.len());
    let Some(correct) = correct else {
        return Err(Error::Internal(format!(
            "correct answer index {} out of range for {} options",
            correct_answer,
            options.len()
        )));
    };

    let indexed: Vec<(usize, String)> = options.iter().cloned().enumerate().collect();
    let permuted = shuffled(&indexed, rng);

    let new_index = permuted
        .iter()
        .position(|(original, _)| *original == correct)
        .ok_or_else(|| {
            Error::Internal("correct answer lost while shuffling options".to_string())
        })?;

    let options = permuted.into_iter().map(|(_, option)| option).collect();
    Ok((options, new_index as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn shuffled_preserves_multiset() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = vec![3, 1, 4, 1, 5, 9, 2, 6];
        let mut output = shuffled(&input, &mut rng);
        output.sort();
        let mut expected = input.clone();
        expected.sort();
        assert_eq!(output, expected);
    }

    #[test]
    fn shuffled_does_not_mutate_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = vec!["a", "b", "c", "d"];
        let before = input.clone();
        let _ = shuffled(&input, &mut rng);
        assert_eq!(input, before);
    }

    #[test]
    fn shuffled_handles_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: Vec<i32> = vec![];
        assert!(shuffled(&empty, &mut rng).is_empty());
        assert_eq!(shuffled(&[42], &mut rng), vec![42]);
    }

    #[test]
    fn shuffle_options_remaps_correct_index() {
        let options = opts(&["X", "Y", "Z"]);
        for seed in 0..1000 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (shuffled_opts, new_index) =
                shuffle_options(&options, 2, &mut rng).expect("valid index");
            assert_eq!(shuffled_opts[new_index as usize], "Z");
        }
    }

    #[test]
    fn shuffle_options_rejects_out_of_range_index() {
        let options = opts(&["a", "b"]);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(shuffle_options(&options, 2, &mut rng).is_err());
        assert!(shuffle_options(&options, -1, &mut rng).is_err());
    }

    #[test]
    fn shuffle_options_preserves_option_multiset() {
        let options = opts(&["red", "green", "blue", "green"]);
        let mut rng = StdRng::seed_from_u64(11);
        let (mut shuffled_opts, _) = shuffle_options(&options, 0, &mut rng).unwrap();
        shuffled_opts.sort();
        let mut expected = options.clone();
        expected.sort();
        assert_eq!(shuffled_opts, expected);
    }
}
