//! In-memory SQL `LIKE` evaluation
//!
//! Mirrors how MySQL evaluates the generated predicates under its default
//! case-insensitive collation, so results can be checked or filtered without
//! a database.

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    /// `%`
    AnyRun,
    /// `_`
    AnyOne,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            '%' => Token::AnyRun,
            '_' => Token::AnyOne,
            // MySQL's default escape character; a trailing backslash is literal
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            c => Token::Literal(c),
        };
        tokens.push(token);
    }
    tokens
}

/// Case-insensitive character comparison.
pub(crate) fn chars_eq(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Returns true if `value LIKE pattern` holds.
pub fn like_matches(value: &str, pattern: &str) -> bool {
    let tokens = tokenize(pattern);
    let text: Vec<char> = value.chars().collect();

    let (mut t, mut p) = (0, 0);
    // Last `%` seen and the text position it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(Token::AnyRun) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(Token::AnyOne) => {
                t += 1;
                p += 1;
            }
            Some(Token::Literal(c)) if chars_eq(*c, text[t]) => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    t = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            },
        }
    }

    tokens[p..].iter().all(|token| *token == Token::AnyRun)
}
