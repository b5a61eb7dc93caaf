use scraper::ElementRef;
use scraper::node::Node;

/// Elements whose text never reaches the reader
const INVISIBLE: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Collapse every run of whitespace into one space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of an element, trimmed and whitespace-collapsed.
///
/// Text nodes are concatenated as they appear, so inline markup such as
/// `<em>` or `<b>` never introduces spaces of its own.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Readable text under `scope`, skipping script and style contents
pub fn visible_text(scope: ElementRef<'_>) -> String {
    text_excluding(scope, INVISIBLE)
}

/// Text under `scope` with every subtree rooted at one of `skip` left out
pub fn text_excluding(scope: ElementRef<'_>, skip: &[&str]) -> String {
    let mut content = String::new();

    for node in scope.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != scope.id())
            .filter_map(|ancestor| ancestor.value().as_element())
            .any(|element| skip.contains(&element.name()));
        if !hidden {
            content.push_str(text);
        }
    }

    collapse_whitespace(&content)
}

/// Character count above `min`, as opposed to byte length
pub fn longer_than(text: &str, min: usize) -> bool {
    text.chars().count() > min
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(html: &'a Html, css: &str) -> ElementRef<'a> {
        html.select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    #[test]
    fn test_inline_markup_adds_no_spaces() {
        let html = Html::parse_fragment("<h2>Hello, <em>World</em>!</h2>");
        assert_eq!(element_text(first(&html, "h2")), "Hello, World!");
    }

    #[test]
    fn test_skipped_subtrees_leave_surrounding_text() {
        let html = Html::parse_fragment(
            "<div>Mail info@<b>acme.example</b><script>var x = 1;</script> today</div>",
        );
        assert_eq!(visible_text(first(&html, "div")), "Mail info@acme.example today");
    }

    #[test]
    fn test_longer_than_counts_chars() {
        assert!(longer_than("café", 3));
        assert!(!longer_than("café", 4));
    }
}
