//! Title/subtitle splitting

fn is_open_paren(c: char) -> bool {
    c == '(' || c == '（'
}

fn is_close_paren(c: char) -> bool {
    c == ')' || c == '）'
}

/// Split a full title into `(title, sub_title)`.
///
/// Only the final parenthetical pair is the disambiguator; earlier pairs stay
/// in the title verbatim. Without a trailing pair the subtitle is empty.
///
/// ```
/// use xlink::annotation::split_title;
///
/// assert_eq!(split_title("Title（Sub）"), ("Title", "Sub"));
/// assert_eq!(split_title("Plain"), ("Plain", ""));
/// assert_eq!(split_title("A(B)C（D）"), ("A(B)C", "D"));
/// ```
pub fn split_title(full_title: &str) -> (&str, &str) {
    let Some(closer) = full_title.chars().next_back().filter(|&c| is_close_paren(c)) else {
        return (full_title, "");
    };

    match full_title.rfind(is_open_paren) {
        Some(open_idx) => {
            let open_len = full_title[open_idx..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            let sub_start = open_idx + open_len;
            let sub_end = full_title.len() - closer.len_utf8();
            if sub_start > sub_end {
                return (full_title, "");
            }
            (&full_title[..open_idx], &full_title[sub_start..sub_end])
        }
        None => (full_title, ""),
    }
}
