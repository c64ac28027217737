/// Marks the entries of `sources` that form a longest strictly increasing
/// subsequence. `None` entries never take part.
///
/// Runs in `O(n log n)`.
pub(crate) fn stable_positions(sources: &[Option<usize>]) -> Vec<bool> {
    // indices into `sources` of the smallest tail of each run length
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; sources.len()];

    for (i, source) in sources.iter().enumerate() {
        let Some(value) = *source else {
            continue;
        };
        let pos = tails.partition_point(|&t| sources[t].is_some_and(|v| v < value));
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }

    let mut stay = vec![false; sources.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        stay[i] = true;
        cursor = prev[i];
    }
    stay
}

#[cfg(test)]
mod tests {
    use super::stable_positions;

    fn kept(sources: &[Option<usize>]) -> Vec<usize> {
        stable_positions(sources)
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
            .collect()
    }

    #[test]
    fn rotation_keeps_the_long_run() {
        assert_eq!(kept(&[Some(2), Some(0), Some(1)]), [1, 2]);
    }

    #[test]
    fn sorted_input_keeps_everything() {
        assert_eq!(kept(&[Some(0), Some(1), Some(2), Some(3)]), [0, 1, 2, 3]);
    }

    #[test]
    fn fresh_entries_are_skipped() {
        assert_eq!(kept(&[None, Some(3), None, Some(1), Some(2)]), [3, 4]);
    }

    #[test]
    fn reversed_keeps_one() {
        assert_eq!(kept(&[Some(2), Some(1), Some(0)]).len(), 1);
        assert!(kept(&[]).is_empty());
    }
}
