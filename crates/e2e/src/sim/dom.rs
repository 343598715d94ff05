//! Element tree for the simulated site and selector queries over it
//!
//! A [`Node`] tree renders to HTML and is queried with `scraper`. Playwright's
//! `:has-text("t")` is layered on top: the part before it selects candidates,
//! the text filters them, and whatever follows is selected inside the kept
//! elements. Click and input behaviour lives in a side table keyed by a
//! per-element handler id.

use scraper::{ElementRef, Html, Selector};

use crate::error::{E2eError, E2eResult};

use super::{Click, Field};

const HANDLER_ATTR: &str = "data-sim-handler";
const HAS_TEXT: &str = ":has-text(";
const VOID_TAGS: [&str; 2] = ["img", "input"];

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub tag: &'static str,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub data_test: Option<String>,
    pub text: String,
    pub visible: bool,
    pub on_click: Option<Click>,
    pub field: Option<Field>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            visible: true,
            ..Default::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Space-separated class list
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn data_test(mut self, value: impl Into<String>) -> Self {
        self.data_test = Some(value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn on_click(mut self, click: Click) -> Self {
        self.on_click = Some(click);
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }
}

#[derive(Debug, Clone, Default)]
struct Handlers {
    on_click: Option<Click>,
    field: Option<Field>,
}

/// A matched element, detached from the document it came from
#[derive(Debug, Clone)]
pub struct Match {
    /// Text of the element and its descendants, like DOM `textContent`
    pub text: String,
    /// The element and all its ancestors are shown
    pub visible: bool,
    /// Handler of the element, or of the first descendant that has one
    pub click: Option<Click>,
    pub field: Option<Field>,
}

/// A rendered page; not `Send`, so build it, query it and drop it
pub struct Document {
    html: Html,
    handlers: Vec<Handlers>,
}

impl Document {
    pub fn render(root: &Node) -> Self {
        let mut markup = String::from("<!DOCTYPE html>");
        let mut handlers = Vec::new();
        write_node(root, &mut markup, &mut handlers);
        Self {
            html: Html::parse_document(&markup),
            handlers,
        }
    }

    /// Every match in document order
    pub fn select(&self, selector: &str) -> E2eResult<Vec<Match>> {
        if selector.trim().is_empty() {
            return Err(unsupported(selector, "empty selector"));
        }
        let root = self.html.root_element();
        let found = select_within(&[root], selector, selector)?;
        Ok(found.into_iter().map(|el| self.describe(el)).collect())
    }

    fn handlers(&self, el: ElementRef<'_>) -> Option<&Handlers> {
        let index = el.value().attr(HANDLER_ATTR)?.parse::<usize>().ok()?;
        self.handlers.get(index)
    }

    fn describe(&self, el: ElementRef<'_>) -> Match {
        let hidden = std::iter::once(el)
            .chain(el.ancestors().filter_map(ElementRef::wrap))
            .any(|e| e.value().attr("hidden").is_some());
        let click = el
            .descendants()
            .filter_map(ElementRef::wrap)
            .find_map(|e| self.handlers(e).and_then(|h| h.on_click.clone()));

        Match {
            text: el.text().collect(),
            visible: !hidden,
            click,
            field: self.handlers(el).and_then(|h| h.field),
        }
    }
}

fn write_node(node: &Node, out: &mut String, handlers: &mut Vec<Handlers>) {
    out.push('<');
    out.push_str(node.tag);
    if let Some(id) = &node.id {
        write_attr(out, "id", id);
    }
    if !node.classes.is_empty() {
        write_attr(out, "class", &node.classes.join(" "));
    }
    if let Some(value) = &node.data_test {
        write_attr(out, "data-test", value);
    }
    if !node.visible {
        out.push_str(" hidden");
    }
    if node.on_click.is_some() || node.field.is_some() {
        write_attr(out, HANDLER_ATTR, &handlers.len().to_string());
        handlers.push(Handlers {
            on_click: node.on_click.clone(),
            field: node.field,
        });
    }
    out.push('>');

    if VOID_TAGS.contains(&node.tag) {
        return;
    }
    out.push_str(&escape(&node.text));
    for child in &node.children {
        write_node(child, out, handlers);
    }
    out.push_str("</");
    out.push_str(node.tag);
    out.push('>');
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn unsupported(selector: &str, reason: &str) -> E2eError {
    E2eError::Playwright(format!("Unsupported selector {:?}: {}", selector, reason))
}

/// Case-insensitive, whitespace-collapsed text used by `:has-text`
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `head:has-text("text") tail`, split at the first `:has-text`
struct TextFilter<'s> {
    head: &'s str,
    text: String,
    tail: &'s str,
}

fn split_has_text<'s>(selector: &'s str, full: &str) -> E2eResult<Option<TextFilter<'s>>> {
    let Some(start) = selector.find(HAS_TEXT) else {
        return Ok(None);
    };
    let rest = &selector[start + HAS_TEXT.len()..];
    let mut chars = rest.char_indices();
    let quote = match chars.next() {
        Some((_, q @ ('"' | '\''))) => q,
        _ => return Err(unsupported(full, ":has-text needs a quoted argument")),
    };

    let mut text = String::new();
    let mut escaped = false;
    let mut close = None;
    for (i, c) in chars {
        if escaped {
            text.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            close = Some(i);
            break;
        } else {
            text.push(c);
        }
    }

    let close = close.ok_or_else(|| unsupported(full, "unterminated :has-text argument"))?;
    let tail = rest[close + 1..]
        .strip_prefix(')')
        .ok_or_else(|| unsupported(full, "missing ) after :has-text"))?;
    Ok(Some(TextFilter {
        head: &selector[..start],
        text,
        tail,
    }))
}

fn parse_css(css: &str, full: &str) -> E2eResult<Selector> {
    Selector::parse(css).map_err(|e| unsupported(full, &format!("{:?}", e)))
}

/// Descendants of `scopes` matching `selector`, without duplicates
fn select_within<'a>(scopes: &[ElementRef<'a>], selector: &str, full: &str) -> E2eResult<Vec<ElementRef<'a>>> {
    let filter = split_has_text(selector, full)?;
    let css = match &filter {
        None => selector.trim().to_string(),
        Some(f) if f.head.trim().is_empty() || f.head.ends_with(char::is_whitespace) => {
            format!("{}*", f.head)
        }
        Some(f) => f.head.to_string(),
    };
    let parsed = parse_css(css.trim(), full)?;

    let mut found: Vec<ElementRef<'a>> = Vec::new();
    for scope in scopes {
        for el in scope.select(&parsed) {
            if !found.contains(&el) {
                found.push(el);
            }
        }
    }

    let Some(filter) = filter else {
        return Ok(found);
    };
    let needle = normalize(&filter.text);
    let kept: Vec<ElementRef<'a>> = found
        .into_iter()
        .filter(|el| normalize(&el.text().collect::<String>()).contains(&needle))
        .collect();

    if filter.tail.trim().is_empty() {
        Ok(kept)
    } else if filter.tail.starts_with(char::is_whitespace) {
        select_within(&kept, filter.tail.trim_start(), full)
    } else {
        Err(unsupported(full, "only a descendant selector may follow :has-text"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Node {
        Node::new("body").children([
            Node::new("div").id("root").children([
                Node::new("div").class("cart_item").children([
                    Node::new("div").class("inventory_item_name").text("Sauce Labs Backpack"),
                    Node::new("button")
                        .data_test("remove-sauce-labs-backpack")
                        .text("Remove")
                        .on_click(Click::Remove(0)),
                ]),
                Node::new("div").class("cart_item").children([
                    Node::new("div").class("inventory_item_name").text("Sauce Labs Onesie"),
                    Node::new("button")
                        .data_test("remove-sauce-labs-onesie")
                        .text("Remove")
                        .on_click(Click::Remove(5)),
                ]),
                Node::new("nav")
                    .visible(false)
                    .child(Node::new("a").id("logout_sidebar_link").text("Logout").on_click(Click::Logout)),
                Node::new("input").id("first-name").field(Field::FirstName),
            ]),
        ])
    }

    fn count(selector: &str) -> usize {
        Document::render(&page()).select(selector).unwrap().len()
    }

    #[test]
    fn test_css_selectors() {
        assert_eq!(count("#root"), 1);
        assert_eq!(count(".cart_item"), 2);
        assert_eq!(count("button"), 2);
        assert_eq!(count(r#"[data-test^="remove"]"#), 2);
        assert_eq!(count(r#"[data-test="remove-sauce-labs-onesie"]"#), 1);
        assert_eq!(count("[data-test]"), 2);
        assert_eq!(count("#root > .cart_item"), 2);
        assert_eq!(count(".missing"), 0);
    }

    #[test]
    fn test_has_text_and_descendants() {
        assert_eq!(count(r#".cart_item:has-text("backpack")"#), 1);
        assert_eq!(count(r#".cart_item:has-text("Onesie") [data-test^="remove"]"#), 1);
        assert_eq!(count(r#"#root .inventory_item_name"#), 2);
        assert_eq!(count(r#"button:has-text("Add to cart")"#), 0);
        assert_eq!(count(r#"#root :has-text("  sauce   LABS onesie ")"#), 2);

        let doc = Document::render(&page());
        let matches = doc.select(r#".cart_item:has-text("Onesie") button"#).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].click, Some(Click::Remove(5)));
    }

    #[test]
    fn test_text_and_handlers() {
        let doc = Document::render(&page());

        let item = &doc.select(".cart_item").unwrap()[0];
        assert_eq!(item.text, "Sauce Labs BackpackRemove");
        assert_eq!(item.click, Some(Click::Remove(0)));
        assert_eq!(item.field, None);

        let input = &doc.select("#first-name").unwrap()[0];
        assert_eq!(input.field, Some(Field::FirstName));
        assert_eq!(input.click, None);
    }

    #[test]
    fn test_visibility_inherits_from_ancestors() {
        let doc = Document::render(&page());
        let matches = doc.select("#logout_sidebar_link").unwrap();
        assert_eq!(matches.len(), 1);
        assert!(!matches[0].visible);
        assert!(doc.select(".cart_item").unwrap()[0].visible);
    }

    #[test]
    fn test_markup_is_escaped() {
        let root = Node::new("body").child(
            Node::new("div")
                .data_test(r#"a"b"#)
                .text("<b>Fish & Chips</b>"),
        );
        let doc = Document::render(&root);
        let matches = doc.select(r#"[data-test="a\"b"]"#).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "<b>Fish & Chips</b>");
    }

    #[test]
    fn test_rejects_unsupported() {
        let doc = Document::render(&page());
        assert!(doc.select("##root").is_err());
        assert!(doc.select("div:not-a-pseudo").is_err());
        assert!(doc.select("   ").is_err());
        assert!(doc.select(r#"div:has-text(Remove)"#).is_err());
        assert!(doc.select(r#"div:has-text("Remove"#).is_err());
        assert!(doc.select(r#"div:has-text("Remove").cart_item"#).is_err());
    }
}
