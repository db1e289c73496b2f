#![no_main]

use libfuzzer_sys::fuzz_target;
use querysift::{like_matches, score, FuzzySearch, SearchParser};

fuzz_target!(|input: (&str, &str)| {
    let (value, search) = input;
    // Limit sizes to keep backtracking cheap
    if value.len() > 512 || search.len() > 128 {
        return;
    }

    let pattern = FuzzySearch.parse(search);
    let _ = like_matches(value, &pattern);
    let _ = score(&[Some(value), None], search);

    // Every value matches the pattern built from itself
    assert!(like_matches(value, &FuzzySearch.parse(value)));
});
