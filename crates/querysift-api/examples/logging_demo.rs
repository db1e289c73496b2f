use querysift::logging::LogConfig;
use querysift::{Columns, GridQuery, PageLimitOffset, SelectQuery};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Trace level shows the generated relevance expressions too
    let _guard = LogConfig::trace().init()?;

    println!("=== QuerySift Logging Demo ===\n");

    let mut grid = GridQuery::new(Columns::make([
        "posts.title",
        "authors.name as author_name",
    ]))
    .with_query(SelectQuery::new("posts"));

    // Each step emits debug events
    grid.select_columns()?
        .search("ab")?
        .paginate(PageLimitOffset::new(10, 1))?;

    // Nothing to compare, the search is skipped and logged
    let mut empty: GridQuery<SelectQuery> =
        GridQuery::new(Columns::default()).with_query(SelectQuery::new("posts"));
    empty.search("ab")?;

    if let Some(query) = grid.query() {
        println!("\n{}", query);
    }

    println!("\n=== Demo Complete ===");
    println!("Check the logs above to see tracing output!");

    Ok(())
}
