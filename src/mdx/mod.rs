//! Safe MDX rendering.
//!
//! ```text
//! source ──mdx_parse──▶ mdast ──SafeMdxRenderer + COMPONENTS──▶ ViewNode ──▶ HTML / JSON
//! ```
//!
//! Nothing embedded in the markup is executed: ESM and `{expressions}` are
//! dropped, JSX attribute expressions are only decoded when they are JSON
//! literals. Script-bearing elements, `on*` handlers and `javascript:`-style
//! URLs never reach the output (see [`sanitize`]).

pub mod components;
pub mod parse;
pub mod render;
pub mod sanitize;
pub mod view;

pub use components::{Component, ComponentTable, DiscriminatorKind, COMPONENTS};
pub use parse::{mdx_parse, MdxError};
pub use render::{
    render_safe_mdx, render_safe_mdx_with, Diagnostic, Rendered, SafeMdxRenderer,
    UnknownComponentPolicy,
};
pub use view::{escape_html, Element, PropValue, Props, ViewNode};
