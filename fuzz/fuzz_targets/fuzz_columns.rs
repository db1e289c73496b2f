#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use querysift::{ColumnDecl, Columns};

#[derive(Arbitrary, Debug)]
enum Decl {
    Positional(String),
    Keyed { key: String, column: String },
}

fuzz_target!(|input: (Vec<Decl>, Vec<String>)| {
    let (decls, keys) = input;
    let columns = Columns::new(
        decls
            .into_iter()
            .take(64)
            .map(|decl| match decl {
                Decl::Positional(spec) => ColumnDecl::Positional(spec),
                Decl::Keyed { key, column } => ColumnDecl::Keyed { key, column },
            })
            .collect(),
    );

    assert_eq!(columns.keys().len(), columns.selects().len());
    assert_eq!(columns.keys().len(), columns.actual().len());

    for key in keys.iter().take(64) {
        let first = columns.find(key);
        assert_eq!(columns.find(key), first);
    }
});
