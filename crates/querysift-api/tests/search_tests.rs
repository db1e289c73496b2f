use querysift::{
    like_matches, score, Columns, FuzzySearch, Search, SearchOperator, SearchParser, SelectExpr,
    SelectQuery,
};

fn post_columns() -> Columns {
    Columns::new(vec![
        "posts.title".into(),
        "description".into(),
        ("author_name", "authors.name").into(),
        "authors.age as author_age".into(),
    ])
}

struct Post {
    title: &'static str,
    description: Option<&'static str>,
}

fn posts() -> Vec<Post> {
    vec![
        Post {
            title: "My Daily Posts",
            description: Some("notes from every day"),
        },
        Post {
            title: "Weekly digest",
            description: None,
        },
        Post {
            title: "Daily standup",
            description: Some("what happened yesterday"),
        },
    ]
}

fn matching_titles(search: &Search, input: &str) -> Vec<&'static str> {
    posts()
        .into_iter()
        .filter(|post| search.matches(input, &[Some(post.title), post.description]))
        .map(|post| post.title)
        .collect()
}

#[test]
fn test_keys_and_selects_are_parallel() {
    let columns = post_columns();
    assert_eq!(columns.keys().len(), columns.selects().len());
    assert_eq!(columns.keys().len(), columns.actual().len());
}

#[test]
fn test_find_is_idempotent_and_cached() {
    let columns = post_columns();
    assert!(!columns.is_cached("title"));
    let first = columns.find("title");
    assert!(columns.is_cached("title"));
    assert_eq!(columns.find("title"), first);
    assert_eq!(first.as_deref(), Some("posts.title"));
}

#[test]
fn test_keyed_declaration() {
    let columns = Columns::new(vec![("author_name", "authors.name").into()]);
    assert_eq!(columns.find("author_name").as_deref(), Some("authors.name"));
    assert_eq!(
        columns.selects(),
        &[SelectExpr::raw("authors.name as author_name")]
    );
}

#[test]
fn test_inline_alias_declaration() {
    let columns = Columns::make(["authors.age as author_age"]);
    assert_eq!(columns.keys(), &["author_age"]);
    assert_eq!(columns.find("author_age").as_deref(), Some("authors.age"));
}

#[test]
fn test_fuzzy_pattern() {
    assert_eq!(
        FuzzySearch.parse("My Daily Posts"),
        "%M%y%D%a%i%l%y%P%o%s%t%s%"
    );
}

#[test]
fn test_degenerate_input_keeps_every_row() {
    let search = Search::new(Columns::make(["title", "description"]));
    for input in ["", "   ", "?!.,"] {
        assert_eq!(search.parse(input), "%%");
        assert_eq!(matching_titles(&search, input).len(), posts().len());
    }
}

#[test]
fn test_search_narrows_rows() {
    let search = Search::new(Columns::make(["title", "description"]));
    assert_eq!(
        matching_titles(&search, "daily"),
        vec!["My Daily Posts", "Daily standup"]
    );
    assert_eq!(matching_titles(&search, "wkd"), vec!["Weekly digest"]);
    assert_eq!(matching_titles(&search, "yesterday"), vec!["Daily standup"]);
    assert!(matching_titles(&search, "zzz").is_empty());
}

#[test]
fn test_empty_registry_leaves_query_unchanged() {
    let search = Search::new(Columns::default());
    let mut query = SelectQuery::new("posts");
    search.search(&mut query, "anything").unwrap();
    assert_eq!(query, SelectQuery::new("posts"));
}

#[test]
fn test_two_char_score_expression() {
    let search = Search::new(Columns::make(["title"]));
    let mut query = SelectQuery::new("posts");
    search.search(&mut query, "ab").unwrap();

    let concat = "CONCAT(IFNULL(title, ''))";
    assert_eq!(
        query.columns,
        vec![SelectExpr::raw(format!(
            "(LOCATE('a', {concat}, 1) + LOCATE('b', {concat}, 2)) AS sort_index"
        ))]
    );
}

#[test]
fn test_compared_columns_follow_operator() {
    let mut search = Search::new(post_columns());
    assert_eq!(
        search.columns_to_compare(),
        &["posts.title", "description", "authors.name", "authors.age"]
    );

    search.set_operator(SearchOperator::Having);
    assert_eq!(
        search.columns_to_compare(),
        &["title", "description", "author_name", "author_age"]
    );
}

#[test]
fn test_relevance_order_in_memory() {
    // An early match scores lower than a late one and sorts first
    let early = score(&[Some("daily")], "da").unwrap();
    let late = score(&[Some("my daily")], "da").unwrap();
    assert!(early < late);
}

#[test]
fn test_like_matches_subsequence() {
    let pattern = FuzzySearch.parse("mdp");
    assert!(like_matches("My Daily Posts", &pattern));
    assert!(!like_matches("Posts Daily My", &pattern));
}
