//! MDX parsing into mdast.
//!
//! A thin wrapper over `markdown`'s MDX mode. Parsing is pure: no I/O, no
//! evaluation of embedded expressions or ESM.

use markdown::mdast::Node;
use markdown::{Constructs, ParseOptions};
use thiserror::Error;

/// Errors from parsing or rendering markup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MdxError {
    #[error("Failed to parse markup: {message}")]
    Parse { message: String },

    #[error("Unsupported component <{name}> at line {line}")]
    UnknownComponent { name: String, line: usize },
}

/// Parser options: MDX plus GFM tables, strikethrough, task lists, math and
/// YAML frontmatter.
pub fn parse_options() -> ParseOptions {
    ParseOptions {
        constructs: Constructs {
            frontmatter: true,
            gfm_strikethrough: true,
            gfm_table: true,
            gfm_task_list_item: true,
            math_flow: true,
            math_text: true,
            ..Constructs::mdx()
        },
        ..ParseOptions::mdx()
    }
}

/// Parse MDX source into a syntax tree.
///
/// Malformed markup (unclosed JSX tags, mismatched closing tags, broken
/// expressions) is reported as [`MdxError::Parse`].
pub fn mdx_parse(code: &str) -> Result<Node, MdxError> {
    markdown::to_mdast(code, &parse_options()).map_err(|e| {
        tracing::debug!("MDX parse failed: {}", e);
        MdxError::Parse {
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_heading_and_component() {
        let ast = mdx_parse("# Hi\n\n<ArticleSection/>").unwrap();

        let children = ast.children().unwrap();
        assert!(matches!(children[0], Node::Heading(_)));
        match &children[1] {
            Node::MdxJsxFlowElement(el) => assert_eq!(el.name.as_deref(), Some("ArticleSection")),
            other => panic!("expected JSX element, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unclosed_component() {
        let err = mdx_parse("<Requirement>\n\nnever closed").unwrap_err();
        assert!(matches!(err, MdxError::Parse { .. }));
    }

    #[test]
    fn test_parse_rejects_mismatched_closing_tag() {
        assert!(mdx_parse("<IDE>x</Requirement>").is_err());
    }

    #[test]
    fn test_gfm_table_enabled() {
        let ast = mdx_parse("| a | b |\n| - | - |\n| 1 | 2 |").unwrap();
        assert!(matches!(ast.children().unwrap()[0], Node::Table(_)));
    }
}
