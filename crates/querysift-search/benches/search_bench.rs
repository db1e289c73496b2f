use criterion::{black_box, criterion_group, criterion_main, Criterion};
use querysift_core::{Columns, SelectQuery};
use querysift_search::{score_expression, FuzzySearch, Search, SearchParser};

fn post_columns() -> Columns {
    Columns::new(vec![
        "posts.title".into(),
        "description".into(),
        ("author_name", "authors.name").into(),
        "authors.age as author_age".into(),
    ])
}

fn bench_fuzzy_pattern(c: &mut Criterion) {
    c.bench_function("fuzzy_pattern", |b| {
        b.iter(|| FuzzySearch.parse(black_box("My Daily Posts, volume 12!")))
    });
}

fn bench_score_expression(c: &mut Criterion) {
    let columns = ["posts.title", "description", "authors.name"];
    c.bench_function("score_expression", |b| {
        b.iter(|| score_expression(black_box(&columns), black_box("daily posts")))
    });
}

fn bench_search(c: &mut Criterion) {
    let search = Search::new(post_columns());
    c.bench_function("search_where_sorted", |b| {
        b.iter(|| {
            let mut query = SelectQuery::new("posts");
            search.search(&mut query, black_box("daily")).map(|q| q.to_sql())
        })
    });
}

fn bench_find(c: &mut Criterion) {
    let columns = post_columns();
    c.bench_function("columns_find_cached", |b| {
        b.iter(|| columns.find(black_box("title")))
    });
    c.bench_function("columns_find_keyed", |b| {
        b.iter(|| columns.find(black_box("author_name")))
    });
}

criterion_group!(
    benches,
    bench_fuzzy_pattern,
    bench_score_expression,
    bench_search,
    bench_find
);
criterion_main!(benches);
