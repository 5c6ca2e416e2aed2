use scraper::{Html, Node};

/// Elements whose direct text is never shown to a reader
const HIDDEN_PARENTS: &[&str] = &["style", "script", "head", "title", "meta"];

/// Extract the human-visible text of an HTML document.
///
/// Text nodes are kept in document order unless their parent is the document
/// root or one of [`HIDDEN_PARENTS`]. The parser wraps loose text in implied
/// `<html>`/`<body>` elements, so text under one of those that never appears
/// in the source counts as document-root text. Comments are never text nodes.
/// Each fragment is trimmed and non-empty fragments are joined with a single space.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let implied = implied_roots(html);

    let fragments = document.tree.root().descendants().filter_map(|node| {
        let Node::Text(text) = node.value() else {
            return None;
        };
        let visible = match node.parent().map(|parent| parent.value()) {
            Some(Node::Element(parent)) => {
                let name = parent.name();
                !HIDDEN_PARENTS.contains(&name) && !implied.contains(&name)
            }
            _ => false,
        };
        let trimmed = text.trim();
        (visible && !trimmed.is_empty()).then_some(trimmed)
    });

    fragments.collect::<Vec<_>>().join(" ")
}

/// Root elements the parser will synthesize because the markup lacks their start tag
fn implied_roots(html: &str) -> Vec<&'static str> {
    let lower = html.to_ascii_lowercase();
    ["html", "body"]
        .into_iter()
        .filter(|tag| !has_start_tag(&lower, tag))
        .collect()
}

fn has_start_tag(lower: &str, tag: &str) -> bool {
    let open = format!("<{tag}");
    lower.match_indices(&open).any(|(at, _)| {
        lower[at + open.len()..]
            .chars()
            .next()
            .map_or(false, |c| c == '>' || c == '/' || c.is_ascii_whitespace())
    })
}
