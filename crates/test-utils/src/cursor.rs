//! Cursor position extraction for editor feature tests.
//!
//! Mark the cursor with `*` in a source literal; the helpers strip the
//! marker and return the clean text plus the editor [`Position`] (UTF-16
//! columns, as an editor would report it).

use graphql_types::Position;

/// Extract the cursor position from source marked with `*`.
///
/// ```
/// use graphql_test_utils::extract_cursor;
///
/// let (source, pos) = extract_cursor("query { user*Name }");
/// assert_eq!(source, "query { userName }");
/// assert_eq!((pos.line, pos.character), (0, 12));
///
/// let (source, pos) = extract_cursor("query {\n  *user\n}");
/// assert_eq!(source, "query {\n  user\n}");
/// assert_eq!((pos.line, pos.character), (1, 2));
/// ```
///
/// # Panics
///
/// Panics if the input contains no `*` marker or multiple `*` markers.
pub fn extract_cursor(input: &str) -> (String, Position) {
    let marker_count = input.chars().filter(|&c| c == '*').count();
    assert!(
        marker_count == 1,
        "extract_cursor: input must contain exactly one '*' marker, found {marker_count}"
    );

    let (source, positions) = extract_marked(input, |chars| {
        (chars.peek() == Some(&'*')).then(|| {
            chars.next();
            0
        })
    });
    (source, positions[0])
}

/// Extract several positions marked `$1`, `$2`, ... in marker order.
///
/// ```
/// use graphql_test_utils::extract_cursors;
///
/// let (source, positions) = extract_cursors("query { $1user { $2id } }");
/// assert_eq!(source, "query { user { id } }");
/// assert_eq!(positions.len(), 2);
/// assert_eq!(positions[1].character, 15);
/// ```
pub fn extract_cursors(input: &str) -> (String, Vec<Position>) {
    extract_marked(input, |chars| {
        let mut lookahead = chars.clone();
        if lookahead.next() != Some('$') {
            return None;
        }
        let digit = lookahead.next()?.to_digit(10)?;
        chars.next();
        chars.next();
        Some(digit as usize)
    })
}

fn extract_marked<F>(input: &str, mut marker: F) -> (String, Vec<Position>)
where
    F: FnMut(&mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize>,
{
    let mut marks: Vec<(usize, Position)> = Vec::new();
    let mut result = String::with_capacity(input.len());
    let mut line = 0u32;
    let mut character = 0u32;

    let mut chars = input.chars().peekable();
    loop {
        if let Some(index) = marker(&mut chars) {
            marks.push((index, Position::new(line, character)));
            continue;
        }
        let Some(ch) = chars.next() else {
            break;
        };
        result.push(ch);
        if ch == '\n' {
            line += 1;
            character = 0;
        } else {
            character += ch.len_utf16() as u32;
        }
    }

    marks.sort_by_key(|(index, _)| *index);
    (result, marks.into_iter().map(|(_, pos)| pos).collect())
}
