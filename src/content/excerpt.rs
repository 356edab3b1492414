//! Excerpt extraction from page content

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HTML_RE: Regex =
        Regex::new(r"<.*?>|&([a-z0-9]+|#[0-9]{1,6}|#x[0-9a-f]{1,6});").unwrap();
}

/// Options controlling [`excerpt`] extraction.
pub struct ExcerptOptions<'a> {
    /// Strip HTML tags from a marker-delimited excerpt.
    pub remove_html_tags: bool,
    /// Marker opening an explicit excerpt.
    pub start_tag: &'a str,
    /// Marker closing an explicit excerpt.
    pub end_tag: &'a str,
    /// Without markers, take this many characters extended to the next
    /// space boundary.
    pub fallback_num_characters: usize,
    /// Appended to the extracted excerpt, e.g. `...`.
    pub suffix: &'a str,
}

impl Default for ExcerptOptions<'_> {
    fn default() -> Self {
        Self {
            remove_html_tags: true,
            start_tag: "<!--excerpt-start-->",
            end_tag: "<!--excerpt-end-->",
            fallback_num_characters: 250,
            suffix: "",
        }
    }
}

/// Extracts a single-line excerpt from `content`.
///
/// If either excerpt marker is present the text between them is used (a
/// missing end marker means "to the end", a missing start marker "from the
/// beginning"). Otherwise the first `fallback_num_characters` characters of
/// the tag-stripped content are taken, extended to the following space so a
/// word is never cut in half.
pub fn excerpt(content: &str, options: &ExcerptOptions) -> String {
    let has_start = content.contains(options.start_tag);
    let has_end = content.contains(options.end_tag);

    let text = if has_start || has_end {
        let mut marked = content;
        if has_start {
            marked = marked.splitn(2, options.start_tag).nth(1).unwrap_or("");
        }
        if has_end {
            marked = marked.splitn(2, options.end_tag).next().unwrap_or("");
        }
        if options.remove_html_tags {
            strip_html(marked)
        } else {
            marked.to_string()
        }
    } else {
        let clean = strip_html(content);
        let chars: Vec<char> = clean.chars().collect();
        let end = if chars.len() > options.fallback_num_characters {
            chars[options.fallback_num_characters..]
                .iter()
                .position(|&c| c == ' ')
                .map(|i| options.fallback_num_characters + i)
                .unwrap_or(chars.len())
        } else {
            chars.len()
        };
        chars[..end].iter().collect()
    };

    let single_line: String = text.lines().collect::<Vec<_>>().join("");
    format!("{}{}", single_line, options.suffix)
}

/// Removes HTML tags and entities, collapsing newlines to spaces.
pub fn strip_html(text: &str) -> String {
    HTML_RE.replace_all(text, "").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <b>world</b>&nbsp;!</p>"),
            "Hello world!"
        );
    }

    #[test]
    fn test_excerpt_with_markers() {
        let content = "intro <!--excerpt-start-->the <i>good</i> part<!--excerpt-end--> outro";
        let got = excerpt(content, &ExcerptOptions::default());
        assert_eq!(got, "the good part");
    }

    #[test]
    fn test_excerpt_missing_end_marker_runs_to_end() {
        let content = "intro <!--excerpt-start-->from here onwards";
        let got = excerpt(content, &ExcerptOptions::default());
        assert_eq!(got, "from here onwards");
    }

    #[test]
    fn test_excerpt_markers_keep_html_when_asked() {
        let content = "<!--excerpt-start--><em>kept</em><!--excerpt-end-->";
        let options = ExcerptOptions {
            remove_html_tags: false,
            ..Default::default()
        };
        assert_eq!(excerpt(content, &options), "<em>kept</em>");
    }

    #[test]
    fn test_fallback_extends_to_space_boundary() {
        let content = "aaaa bbbb cccc dddd";
        let options = ExcerptOptions {
            fallback_num_characters: 6,
            suffix: "...",
            ..Default::default()
        };
        // 6 characters land inside "bbbb"; extend to the next space.
        assert_eq!(excerpt(content, &options), "aaaa bbbb...");
    }

    #[test]
    fn test_fallback_shorter_than_limit() {
        let got = excerpt("tiny", &ExcerptOptions::default());
        assert_eq!(got, "tiny");
    }

    #[test]
    fn test_excerpt_is_single_line() {
        let content = "<p>line one</p>\n<p>line two</p>";
        let got = excerpt(content, &ExcerptOptions::default());
        assert!(!got.contains('\n'));
        assert!(got.contains("line one"));
        assert!(got.contains("line two"));
    }
}
