
/// Returns the Levenshtein distance between two byte sequences using a
/// single-row dynamic programming sweep (rows are the length of `b`).
/// # Arguments
/// * `a` - the first sequence
/// * `b` - the second sequence
pub fn edit_distance(a: &[u8], b: &[u8]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // costs[j] holds the distance from a[..i] to b[..j] as we sweep
    let mut costs: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut prev_diag = costs[0];
        costs[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev_diag + usize::from(ca != cb);
            prev_diag = costs[j + 1];
            costs[j + 1] = substitution
                .min(prev_diag + 1) // skip a character in a
                .min(costs[j] + 1); // skip a character in b
        }
    }

    costs[b.len()]
}
