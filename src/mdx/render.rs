//! mdast to view tree.
//!
//! Standard Markdown nodes become their usual HTML elements. Every element,
//! standard or JSX, is looked up in the component table first, so `pre` and
//! `blockquote` overrides apply no matter how the markup spelled them.
//! Embedded ESM and `{expressions}` are never evaluated, and anything the
//! [`sanitize`](super::sanitize) denylist matches is dropped with a
//! diagnostic.

use markdown::mdast::{AlignKind, AttributeContent, AttributeValue, List, ListItem, Node, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::components::{ComponentTable, COMPONENTS};
use super::parse::{mdx_parse, MdxError};
use super::sanitize::{is_blocked_element, is_event_handler, is_unsafe_url, is_url_attribute};
use super::view::{PropValue, Props, ViewNode};

/// What to do with a capitalized JSX tag that has no component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownComponentPolicy {
    /// Render as a plain element named after the tag, children kept
    #[default]
    Passthrough,

    /// Drop the element and its children
    Strip,

    /// Fail the render
    Error,
}

impl std::fmt::Display for UnknownComponentPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnknownComponentPolicy::Passthrough => write!(f, "passthrough"),
            UnknownComponentPolicy::Strip => write!(f, "strip"),
            UnknownComponentPolicy::Error => write!(f, "error"),
        }
    }
}

/// A non-fatal problem found while rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Human-readable description
    pub message: String,

    /// 1-based source line, when the node carries a position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// The offending source line, trimmed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<String>,
}

/// Render output: the view tree plus any diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Root of the view tree (a fragment for whole documents)
    pub node: ViewNode,

    /// Problems found along the way, in document order
    pub diagnostics: Vec<Diagnostic>,
}

/// Materializes a parsed MDX tree with a component table
pub struct SafeMdxRenderer<'a> {
    markdown: &'a str,
    mdast: &'a Node,
    components: &'a ComponentTable,
    policy: UnknownComponentPolicy,
}

impl<'a> SafeMdxRenderer<'a> {
    /// `markdown` must be the source `mdast` was parsed from
    pub fn new(markdown: &'a str, mdast: &'a Node, components: &'a ComponentTable) -> Self {
        Self {
            markdown,
            mdast,
            components,
            policy: UnknownComponentPolicy::default(),
        }
    }

    /// Set how capitalized tags without a component are handled
    pub fn with_policy(mut self, policy: UnknownComponentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Single pass over the tree
    pub fn render(&self) -> Result<Rendered, MdxError> {
        let mut diagnostics = Vec::new();
        let node = self
            .render_node(self.mdast, &mut diagnostics)?
            .unwrap_or_else(|| ViewNode::fragment(Vec::new()));

        Ok(Rendered { node, diagnostics })
    }

    fn render_children(
        &self,
        children: &[Node],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<ViewNode>, MdxError> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            if let Some(node) = self.render_node(child, diagnostics)? {
                out.push(node);
            }
        }
        Ok(out)
    }

    /// Element for a standard tag, routed through the component table
    fn materialize(&self, tag: &str, props: Props, children: Vec<ViewNode>) -> ViewNode {
        match self.components.get(tag) {
            Some(component) => component(&props, children),
            None => ViewNode::element_with(tag, props, children),
        }
    }

    fn wrap(
        &self,
        tag: &str,
        props: Props,
        children: &[Node],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<ViewNode, MdxError> {
        let children = self.render_children(children, diagnostics)?;
        Ok(self.materialize(tag, props, children))
    }

    fn render_node(
        &self,
        node: &Node,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<ViewNode>, MdxError> {
        let rendered = match node {
            Node::Root(root) => ViewNode::fragment(self.render_children(&root.children, diagnostics)?),
            Node::Paragraph(p) => self.wrap("p", Props::new(), &p.children, diagnostics)?,
            Node::Heading(h) => {
                let tag = format!("h{}", h.depth);
                self.wrap(&tag, Props::new(), &h.children, diagnostics)?
            }
            Node::Text(t) => ViewNode::text(t.value.as_str()),
            Node::Emphasis(e) => self.wrap("em", Props::new(), &e.children, diagnostics)?,
            Node::Strong(s) => self.wrap("strong", Props::new(), &s.children, diagnostics)?,
            Node::Delete(d) => self.wrap("del", Props::new(), &d.children, diagnostics)?,
            Node::InlineCode(c) => {
                self.materialize("code", Props::new(), vec![ViewNode::text(c.value.as_str())])
            }
            Node::Code(c) => self.code_block(&c.value, c.lang.as_deref(), c.meta.as_deref()),
            Node::Math(m) => self.code_block(&m.value, Some("math"), m.meta.as_deref()),
            Node::InlineMath(m) => {
                let props = Props::from([("class".to_string(), PropValue::from("math-inline"))]);
                self.materialize("code", props, vec![ViewNode::text(m.value.as_str())])
            }
            Node::Link(l) => {
                let mut props = Props::new();
                if let Some(href) = self.checked_url(node, &l.url, diagnostics) {
                    props.insert("href".into(), href.into());
                }
                if let Some(title) = &l.title {
                    props.insert("title".into(), title.as_str().into());
                }
                self.wrap("a", props, &l.children, diagnostics)?
            }
            Node::Image(i) => {
                let mut props = Props::new();
                if let Some(src) = self.checked_url(node, &i.url, diagnostics) {
                    props.insert("src".into(), src.into());
                }
                props.insert("alt".into(), i.alt.as_str().into());
                if let Some(title) = &i.title {
                    props.insert("title".into(), title.as_str().into());
                }
                self.materialize("img", props, Vec::new())
            }
            Node::List(list) => self.list(list, diagnostics)?,
            Node::ListItem(item) => self.list_item(item, true, diagnostics)?,
            Node::Blockquote(b) => self.wrap("blockquote", Props::new(), &b.children, diagnostics)?,
            Node::ThematicBreak(_) => self.materialize("hr", Props::new(), Vec::new()),
            Node::Break(_) => self.materialize("br", Props::new(), Vec::new()),
            Node::Table(table) => self.table(table, diagnostics)?,
            Node::TableRow(row) => self.wrap("tr", Props::new(), &row.children, diagnostics)?,
            Node::TableCell(cell) => self.wrap("td", Props::new(), &cell.children, diagnostics)?,
            // Raw HTML is shown as text, never injected
            Node::Html(h) => ViewNode::text(h.value.as_str()),
            Node::MdxJsxFlowElement(el) => {
                return self.jsx(node, el.name.as_deref(), &el.attributes, &el.children, diagnostics)
            }
            Node::MdxJsxTextElement(el) => {
                return self.jsx(node, el.name.as_deref(), &el.attributes, &el.children, diagnostics)
            }
            Node::MdxjsEsm(_)
            | Node::MdxFlowExpression(_)
            | Node::MdxTextExpression(_)
            | Node::Yaml(_)
            | Node::Toml(_)
            | Node::Definition(_) => return Ok(None),
            other => match other.children() {
                Some(children) => ViewNode::fragment(self.render_children(children, diagnostics)?),
                None => return Ok(None),
            },
        };

        Ok(Some(rendered))
    }

    /// `<pre language=.. meta=..><code class="language-..">..</code></pre>`
    fn code_block(&self, value: &str, lang: Option<&str>, meta: Option<&str>) -> ViewNode {
        let mut code_props = Props::new();
        let mut pre_props = Props::new();
        if let Some(lang) = lang {
            code_props.insert("class".into(), format!("language-{}", lang).into());
            pre_props.insert("language".into(), lang.into());
        }
        if let Some(meta) = meta {
            pre_props.insert("meta".into(), meta.into());
        }

        let code = self.materialize("code", code_props, vec![ViewNode::text(value)]);
        self.materialize("pre", pre_props, vec![code])
    }

    fn list(&self, list: &List, diagnostics: &mut Vec<Diagnostic>) -> Result<ViewNode, MdxError> {
        let loose = list.spread
            || list
                .children
                .iter()
                .any(|child| matches!(child, Node::ListItem(item) if item.spread));

        let mut items = Vec::with_capacity(list.children.len());
        for child in &list.children {
            let rendered = match child {
                Node::ListItem(item) => Some(self.list_item(item, loose, diagnostics)?),
                other => self.render_node(other, diagnostics)?,
            };
            items.extend(rendered);
        }

        let mut props = Props::new();
        let tag = if list.ordered {
            if let Some(start) = list.start.filter(|s| *s != 1) {
                props.insert("start".into(), start.to_string().into());
            }
            "ol"
        } else {
            "ul"
        };

        Ok(self.materialize(tag, props, items))
    }

    /// Tight lists lose the `<p>` around item text
    fn list_item(
        &self,
        item: &ListItem,
        loose: bool,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<ViewNode, MdxError> {
        let mut children = Vec::new();
        let mut props = Props::new();

        if let Some(checked) = item.checked {
            props.insert("class".into(), "task-list-item".into());
            children.push(
                ViewNode::element("input")
                    .with_prop("type", "checkbox")
                    .with_prop("checked", checked)
                    .with_prop("disabled", true),
            );
        }

        for child in &item.children {
            match child {
                Node::Paragraph(p) if !loose => {
                    children.extend(self.render_children(&p.children, diagnostics)?);
                }
                other => children.extend(self.render_node(other, diagnostics)?),
            }
        }

        Ok(self.materialize("li", props, children))
    }

    fn table(&self, table: &Table, diagnostics: &mut Vec<Diagnostic>) -> Result<ViewNode, MdxError> {
        let mut head = Vec::new();
        let mut body = Vec::new();

        for (row_index, row) in table.children.iter().enumerate() {
            let Node::TableRow(row) = row else {
                continue;
            };
            let cell_tag = if row_index == 0 { "th" } else { "td" };

            let mut cells = Vec::with_capacity(row.children.len());
            for (column, cell) in row.children.iter().enumerate() {
                let mut props = Props::new();
                let align = match table.align.get(column) {
                    Some(AlignKind::Left) => Some("left"),
                    Some(AlignKind::Right) => Some("right"),
                    Some(AlignKind::Center) => Some("center"),
                    _ => None,
                };
                if let Some(align) = align {
                    props.insert("style".into(), format!("text-align: {}", align).into());
                }

                let content = match cell {
                    Node::TableCell(cell) => self.render_children(&cell.children, diagnostics)?,
                    other => self.render_node(other, diagnostics)?.into_iter().collect(),
                };
                cells.push(self.materialize(cell_tag, props, content));
            }

            let tr = self.materialize("tr", Props::new(), cells);
            if row_index == 0 {
                head.push(tr);
            } else {
                body.push(tr);
            }
        }

        let mut sections = vec![self.materialize("thead", Props::new(), head)];
        if !body.is_empty() {
            sections.push(self.materialize("tbody", Props::new(), body));
        }
        Ok(self.materialize("table", Props::new(), sections))
    }

    fn jsx(
        &self,
        node: &Node,
        name: Option<&str>,
        attributes: &[AttributeContent],
        children: &[Node],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<ViewNode>, MdxError> {
        // `<>...</>`
        let Some(name) = name else {
            return Ok(Some(ViewNode::fragment(
                self.render_children(children, diagnostics)?,
            )));
        };

        if is_blocked_element(name) {
            warn!(element = name, "Dropping blocked element");
            self.diagnose(node, format!("Blocked element <{}> removed", name), diagnostics);
            return Ok(None);
        }

        if let Some(component) = self.components.get(name) {
            let props = self.safe_props(node, attributes, diagnostics);
            let children = self.render_children(children, diagnostics)?;
            return Ok(Some(component(&props, children)));
        }

        if is_intrinsic(name) {
            let mut props = self.safe_props(node, attributes, diagnostics);
            if let Some(class) = props.remove("className") {
                props.insert("class".into(), class);
            }
            let children = self.render_children(children, diagnostics)?;
            return Ok(Some(ViewNode::element_with(name, props, children)));
        }

        let line = node.position().map(|p| p.start.line);
        if self.policy == UnknownComponentPolicy::Error {
            return Err(MdxError::UnknownComponent {
                name: name.to_string(),
                line: line.unwrap_or(0),
            });
        }

        warn!(component = name, ?line, policy = %self.policy, "Unsupported component");
        self.diagnose(node, format!("Unsupported component <{}>", name), diagnostics);

        match self.policy {
            UnknownComponentPolicy::Strip => Ok(None),
            _ => {
                let props = self.safe_props(node, attributes, diagnostics);
                let children = self.render_children(children, diagnostics)?;
                Ok(Some(ViewNode::element_with(name, props, children)))
            }
        }
    }

    /// JSX props minus event handlers and script URLs
    fn safe_props(
        &self,
        node: &Node,
        attributes: &[AttributeContent],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Props {
        let mut props = jsx_props(attributes);

        props.retain(|name, value| {
            let unsafe_url = is_url_attribute(name)
                && attribute_url(value).is_some_and(is_unsafe_url);
            if !is_event_handler(name) && !unsafe_url {
                return true;
            }
            self.diagnose(node, format!("Unsafe attribute `{}` removed", name), diagnostics);
            false
        });

        props
    }

    /// `url` if it is safe to emit, otherwise `None` plus a diagnostic
    fn checked_url<'u>(
        &self,
        node: &Node,
        url: &'u str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<&'u str> {
        if !is_unsafe_url(url) {
            return Some(url);
        }
        self.diagnose(node, "Unsafe URL removed".to_string(), diagnostics);
        None
    }

    fn diagnose(&self, node: &Node, message: String, diagnostics: &mut Vec<Diagnostic>) {
        let line = node.position().map(|p| p.start.line);
        diagnostics.push(Diagnostic {
            message,
            line,
            source_line: line
                .and_then(|l| self.markdown.lines().nth(l.saturating_sub(1)))
                .map(|s| s.trim().to_string()),
        });
    }
}

/// Text a URL attribute would resolve to; expressions are kept as source
fn attribute_url(value: &PropValue) -> Option<&str> {
    match value {
        PropValue::Literal(s) | PropValue::Expression(s) => Some(s),
        PropValue::Json(Value::String(s)) => Some(s),
        PropValue::Json(_) => None,
    }
}

/// Lower-case, non-member names are plain HTML elements
fn is_intrinsic(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase()) && !name.contains('.')
}

fn jsx_props(attributes: &[AttributeContent]) -> Props {
    let mut props = Props::new();
    for attribute in attributes {
        // Spread attributes (`{...x}`) are not evaluated
        let AttributeContent::Property(attribute) = attribute else {
            continue;
        };

        let value = match &attribute.value {
            None => PropValue::Json(Value::Bool(true)),
            Some(AttributeValue::Literal(s)) => PropValue::Literal(s.clone()),
            Some(AttributeValue::Expression(expression)) => expression_value(&expression.value),
        };
        props.insert(attribute.name.clone(), value);
    }
    props
}

/// JSON literals are decoded, anything else stays as source text
fn expression_value(source: &str) -> PropValue {
    match serde_json::from_str::<Value>(source.trim()) {
        Ok(value) => PropValue::Json(value),
        Err(_) => PropValue::Expression(source.to_string()),
    }
}

/// Parse `code` and render it with [`COMPONENTS`].
///
/// Unknown capitalized tags pass through as plain elements.
pub fn render_safe_mdx(code: &str) -> Result<ViewNode, MdxError> {
    Ok(render_safe_mdx_with(code, UnknownComponentPolicy::default())?.node)
}

/// [`render_safe_mdx`] with an explicit unknown-component policy,
/// returning diagnostics as well
pub fn render_safe_mdx_with(
    code: &str,
    policy: UnknownComponentPolicy,
) -> Result<Rendered, MdxError> {
    let ast = mdx_parse(code)?;
    SafeMdxRenderer::new(code, &ast, &COMPONENTS)
        .with_policy(policy)
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(code: &str) -> String {
        render_safe_mdx(code).unwrap().to_html()
    }

    #[test]
    fn test_heading_and_article_section() {
        let node = render_safe_mdx("# Hi\n<ArticleSection/>").unwrap();

        assert_eq!(node.find("h1").unwrap().text_content(), "Hi");
        let section = node.find("section").unwrap();
        assert_eq!(section.prop("class"), Some(&PropValue::from("article-section")));
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            html("Some *em*, **strong** and `code`."),
            "<p>Some <em>em</em>, <strong>strong</strong> and <code>code</code>.</p>"
        );
    }

    #[test]
    fn test_code_fence_uses_codeblock() {
        let out = html("```rust\nfn main() {}\n```");
        assert_eq!(
            out,
            "<div class=\"codeblock\" data-language=\"rust\"><pre><code class=\"language-rust\">fn main() {}</code></pre></div>"
        );
    }

    #[test]
    fn test_blockquote_becomes_warning_callout() {
        let node = render_safe_mdx("> Do not share your keypair.").unwrap();
        let quote = node.find("blockquote").unwrap();

        assert_eq!(quote.prop("class"), Some(&PropValue::from("callout")));
        assert!(quote.find("span").is_some());
        assert_eq!(quote.text_content(), "Do not share your keypair.");
    }

    #[test]
    fn test_tight_list_has_no_paragraphs() {
        assert_eq!(html("- a\n- b"), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_ordered_list_start() {
        assert_eq!(html("3. c\n4. d"), "<ol start=\"3\"><li>c</li><li>d</li></ol>");
    }

    #[test]
    fn test_task_list() {
        let out = html("- [x] done");
        assert!(out.contains("<input checked disabled type=\"checkbox\" />"));
    }

    #[test]
    fn test_jsx_props_are_typed() {
        let node = render_safe_mdx("<IDE file=\"a.ts\" lines={3} readOnly />").unwrap();
        let ide = node.find("div").unwrap();

        assert_eq!(ide.prop("data-file"), Some(&PropValue::from("a.ts")));
        assert_eq!(ide.prop("data-lines"), Some(&PropValue::Json(serde_json::json!(3))));
        assert_eq!(ide.prop("data-read-only"), Some(&PropValue::Json(Value::Bool(true))));
    }

    #[test]
    fn test_non_literal_expression_kept_as_source() {
        assert_eq!(
            expression_value("props.name"),
            PropValue::Expression("props.name".to_string())
        );
        assert_eq!(expression_value(" \"x\" "), PropValue::Json(serde_json::json!("x")));
    }

    #[test]
    fn test_expressions_and_esm_are_dropped() {
        let out = html("import X from './x'\n\nHello {name}");
        assert_eq!(out, "<p>Hello </p>");
    }

    #[test]
    fn test_frontmatter_is_dropped() {
        assert_eq!(html("---\ntitle: x\n---\n\nBody"), "<p>Body</p>");
    }

    #[test]
    fn test_intrinsic_jsx_maps_class_name() {
        assert_eq!(
            html("<div className=\"note\">\n\nhi\n\n</div>"),
            "<div class=\"note\"><p>hi</p></div>"
        );
    }

    #[test]
    fn test_unknown_component_passthrough() {
        let rendered =
            render_safe_mdx_with("<Callout>\n\nhey\n\n</Callout>", UnknownComponentPolicy::Passthrough)
                .unwrap();

        assert_eq!(rendered.node.to_html(), "<Callout><p>hey</p></Callout>");
        assert_eq!(rendered.diagnostics.len(), 1);
        assert_eq!(rendered.diagnostics[0].line, Some(1));
        assert_eq!(rendered.diagnostics[0].source_line.as_deref(), Some("<Callout>"));
    }

    #[test]
    fn test_unknown_component_strip() {
        let rendered =
            render_safe_mdx_with("a\n\n<Callout>\n\nhey\n\n</Callout>", UnknownComponentPolicy::Strip)
                .unwrap();

        assert_eq!(rendered.node.to_html(), "<p>a</p>");
        assert_eq!(rendered.diagnostics.len(), 1);
    }

    #[test]
    fn test_unknown_component_error() {
        let err = render_safe_mdx_with("text\n\n<Callout />", UnknownComponentPolicy::Error)
            .unwrap_err();

        assert_eq!(
            err,
            MdxError::UnknownComponent {
                name: "Callout".to_string(),
                line: 3
            }
        );
    }

    #[test]
    fn test_table() {
        let out = html("| a | b |\n| :- | -: |\n| 1 | 2 |");
        assert_eq!(
            out,
            "<table><thead><tr><th style=\"text-align: left\">a</th><th style=\"text-align: right\">b</th></tr></thead>\
             <tbody><tr><td style=\"text-align: left\">1</td><td style=\"text-align: right\">2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_malformed_markup_propagates() {
        assert!(matches!(
            render_safe_mdx("<Requirement>\n\nunterminated"),
            Err(MdxError::Parse { .. })
        ));
    }
}
