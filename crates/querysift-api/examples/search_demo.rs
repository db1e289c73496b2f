/// Search Demo
///
/// Builds searched and relevance-ordered queries for a posts listing
use querysift::{
    score, OrderDirection, Search, SearchJoin, SearchOperator, Searchable, SearchableConfig,
    SelectQuery,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== QuerySift Search Demo ===\n");

    let posts = Searchable::with_config(
        "posts",
        SearchableConfig::default()
            .with_columns([
                "posts.title",
                "posts.description",
                "authors.name as author_name",
            ])
            .with_sortable_columns(["posts.created_at"])
            .with_join(SearchJoin::new("authors", "authors.id", "posts.author_id")),
    );

    println!("1. Fuzzy search with relevance ordering");
    let mut query = SelectQuery::new("posts");
    posts.search(&mut query, "My Daily Posts")?;
    println!("{}\n", query);

    println!("2. Sorting by a user-supplied key");
    let mut query = SelectQuery::new("posts");
    posts.search(&mut query, "dp")?;
    posts.order_by_column(&mut query, "created_at", OrderDirection::Desc)?;
    println!("{}\n", query);

    println!("3. Rejected sort keys");
    for key in ["password", "title; DROP TABLE posts"] {
        let mut query = SelectQuery::new("posts");
        match posts.order_by_column(&mut query, key, OrderDirection::Asc) {
            Ok(_) => println!("  {:?} accepted", key),
            Err(e) => println!("  {:?} rejected: {}", key, e),
        }
    }

    println!("\n4. Searching aggregated aliases with HAVING");
    let search = Search::from_expressions(["author_name", "post_count"])
        .with_operator(SearchOperator::Having)
        .with_sort_by_relevance(false);
    let mut query = SelectQuery::new("authors");
    query.group_by("authors.id");
    search.search(&mut query, "jo")?;
    println!("{}\n", query);

    println!("5. Relevance scores computed in memory");
    for title in ["Daily notes", "My daily posts", "Weekly digest"] {
        println!("  {:<16} {:?}", title, score(&[Some(title)], "dai"));
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
