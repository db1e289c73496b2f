#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use querysift::{
    Columns, GridQuery, OrderDirection, PageLimitOffset, SearchOperator, SelectQuery,
};

#[derive(Arbitrary, Debug)]
enum GridOp {
    SelectColumns,
    Search(String),
    OrderBy { key: String, desc: bool },
    Paginate { per_page: u16, page: u16 },
    Having(bool),
    SortByRelevance(bool),
}

fuzz_target!(|ops: Vec<GridOp>| {
    let mut grid = GridQuery::new(Columns::new(vec![
        "posts.title".into(),
        ("author_name", "authors.name").into(),
        "authors.age as author_age".into(),
    ]))
    .with_query(SelectQuery::new("posts"));

    for op in ops.iter().take(32) {
        let _ = match op {
            GridOp::SelectColumns => grid.select_columns().map(|_| ()),
            GridOp::Search(input) => grid.search(input).map(|_| ()),
            GridOp::OrderBy { key, desc } => {
                let direction = if *desc {
                    OrderDirection::Desc
                } else {
                    OrderDirection::Asc
                };
                grid.order_by(key, direction).map(|_| ())
            }
            GridOp::Paginate { per_page, page } => grid
                .paginate(PageLimitOffset::new(*per_page as usize, *page as usize))
                .map(|_| ()),
            GridOp::Having(having) => {
                let operator = if *having {
                    SearchOperator::Having
                } else {
                    SearchOperator::Where
                };
                grid.set_operator(operator);
                Ok(())
            }
            GridOp::SortByRelevance(sort) => {
                grid.sort_by_relevance(*sort);
                Ok(())
            }
        };
    }

    if let Some(query) = grid.query() {
        let _ = query.to_sql();
    }
});
