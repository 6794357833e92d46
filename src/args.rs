//! Tag argument tokenizer.
//!
//! Tag markup is a single line of whitespace-separated arguments. Arguments
//! may be quoted to capture spaces, and a backslash escapes any single
//! character (quote, whitespace, or another backslash):
//!
//! ```text
//! <empty>              → []
//! foo bar              → ["foo", "bar"]
//!   foo   bar          → ["foo", "bar"]
//! foo 'bar quux'       → ["foo", "bar quux"]
//! foo bar\ quux        → ["foo", "bar quux"]
//! foo "'bar quux'"     → ["foo", "'bar quux'"]
//! foo "\"bar quux\""   → ["foo", "\"bar quux\""]
//! ```
//!
//! Positional meaning is assigned by the tag handlers, not here. An empty
//! quoted argument (`''`) keeps its position as an empty string so the
//! arguments after it stay at the right index.
//!
//! Unterminated quotes and a trailing backslash are accepted silently; the
//! partial token is kept.

/// Split tag markup into its arguments.
pub fn tokenize(markup: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current: Option<String> = None;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in markup.chars() {
        if escaped {
            current.get_or_insert_with(String::new).push(c);
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        match quote {
            Some(q) if c == q => {
                tokens.push(current.take().unwrap_or_default());
                quote = None;
            }
            Some(_) => current.get_or_insert_with(String::new).push(c),
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c.is_whitespace() => {
                if let Some(token) = current.take() {
                    tokens.push(token);
                }
            }
            None => current.get_or_insert_with(String::new).push(c),
        }
    }

    if let Some(token) = current {
        tokens.push(token);
    }
    tokens
}

/// Positional argument, treating a missing or empty token as absent.
pub fn arg(args: &[String], index: usize) -> Option<&str> {
    args.get(index).map(String::as_str).filter(|s| !s.is_empty())
}
