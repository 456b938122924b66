//! Presentation components bound to custom tag names.
//!
//! The set of recognized tags is closed: [`COMPONENTS`] is the whole table.
//! Each component receives the props written on the tag and its already
//! rendered children.

use sha2::{Digest, Sha256};

use super::view::{PropValue, Props, ViewNode};

/// A component renders props + children into a view node
pub type Component = fn(&Props, Vec<ViewNode>) -> ViewNode;

/// Tag name to component table
#[derive(Clone, Copy)]
pub struct ComponentTable {
    entries: &'static [(&'static str, Component)],
}

/// Custom components plus overrides for `pre` and `blockquote`
pub static COMPONENTS: ComponentTable = ComponentTable {
    entries: &[
        ("ArticleSection", article_section as Component),
        ("IDE", ide as Component),
        ("RequirementList", requirement_list as Component),
        ("Requirement", requirement as Component),
        ("AnchorDiscriminatorCalculator", anchor_discriminator_calculator as Component),
        ("pre", codeblock as Component),
        ("blockquote", warning_blockquote as Component),
    ],
};

impl ComponentTable {
    /// Component bound to `tag`, if any
    pub fn get(&self, tag: &str) -> Option<Component> {
        self.entries
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, component)| *component)
    }

    /// Whether `tag` has a component
    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Bound tag names, in table order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

/// `<ArticleSection name="Accounts">` → `<section class="article-section" id="accounts">`
pub fn article_section(props: &Props, children: Vec<ViewNode>) -> ViewNode {
    let mut out = Props::new();
    out.insert("class".into(), "article-section".into());

    let id = prop_str(props, "id")
        .map(str::to_string)
        .or_else(|| prop_str(props, "name").map(slugify));
    if let Some(id) = id {
        out.insert("id".into(), id.into());
    }
    if let Some(name) = prop_str(props, "name") {
        out.insert("data-name".into(), name.into());
    }

    ViewNode::element_with("section", out, children)
}

/// `<IDE file="counter.ts" />` → interactive editor mount point
pub fn ide(props: &Props, children: Vec<ViewNode>) -> ViewNode {
    let mut out = data_props(props);
    out.insert("class".into(), "ide".into());
    ViewNode::element_with("div", out, children)
}

pub fn requirement_list(props: &Props, children: Vec<ViewNode>) -> ViewNode {
    let mut out = data_props(props);
    out.insert("class".into(), "requirement-list".into());
    ViewNode::element_with("ol", out, children)
}

pub fn requirement(props: &Props, children: Vec<ViewNode>) -> ViewNode {
    let mut out = data_props(props);
    out.insert("class".into(), "requirement".into());
    ViewNode::element_with("li", out, children)
}

/// Calculator shell. With a `name` prop the discriminator is computed at
/// render time and shown as bytes and hex.
pub fn anchor_discriminator_calculator(props: &Props, children: Vec<ViewNode>) -> ViewNode {
    let kind = prop_str(props, "kind")
        .and_then(|k| k.parse::<DiscriminatorKind>().ok())
        .unwrap_or(DiscriminatorKind::Instruction);

    let mut out = Props::new();
    out.insert("class".into(), "anchor-discriminator-calculator".into());
    out.insert("data-kind".into(), kind.as_str().into());

    let mut body = children;
    if let Some(name) = prop_str(props, "name") {
        let bytes = kind.discriminator(name);
        let listed = bytes
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        out.insert("data-name".into(), name.into());
        body.push(
            ViewNode::element("code")
                .with_prop("class", "discriminator-bytes")
                .with_child(ViewNode::text(format!("[{}]", listed))),
        );
        body.push(
            ViewNode::element("code")
                .with_prop("class", "discriminator-hex")
                .with_child(ViewNode::text(hex::encode(bytes))),
        );
    }

    ViewNode::element_with("div", out, body)
}

/// `pre` override: wraps the `<pre><code>` pair in a code block frame
pub fn codeblock(props: &Props, children: Vec<ViewNode>) -> ViewNode {
    let mut out = Props::new();
    out.insert("class".into(), "codeblock".into());
    if let Some(lang) = prop_str(props, "language") {
        out.insert("data-language".into(), lang.into());
    }
    if let Some(meta) = prop_str(props, "meta") {
        out.insert("data-meta".into(), meta.into());
    }

    ViewNode::element_with(
        "div",
        out,
        vec![ViewNode::element_with("pre", Props::new(), children)],
    )
}

/// `blockquote` override: warning icon beside the original content
pub fn warning_blockquote(_props: &Props, children: Vec<ViewNode>) -> ViewNode {
    let icon = ViewNode::element("span")
        .with_prop("class", "icon icon-warning")
        .with_prop("data-icon", "Warning")
        .with_prop("data-size", "18")
        .with_prop("aria-hidden", "true");

    let body = ViewNode::element_with(
        "div",
        Props::from([("class".to_string(), PropValue::from("callout-body"))]),
        children,
    );

    ViewNode::element("blockquote")
        .with_prop("class", "callout")
        .with_child(icon)
        .with_child(body)
}

/// What an Anchor discriminator is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscriminatorKind {
    /// `global:<snake_case_name>`
    Instruction,

    /// `account:<Name>`
    Account,

    /// `event:<Name>`
    Event,
}

impl DiscriminatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscriminatorKind::Instruction => "instruction",
            DiscriminatorKind::Account => "account",
            DiscriminatorKind::Event => "event",
        }
    }

    /// First 8 bytes of `sha256("<namespace>:<name>")`
    pub fn discriminator(&self, name: &str) -> [u8; 8] {
        let preimage = match self {
            DiscriminatorKind::Instruction => format!("global:{}", to_snake_case(name)),
            DiscriminatorKind::Account => format!("account:{}", name),
            DiscriminatorKind::Event => format!("event:{}", name),
        };

        let hash = Sha256::digest(preimage.as_bytes());
        let mut out = [0u8; 8];
        out.copy_from_slice(&hash[..8]);
        out
    }
}

impl std::str::FromStr for DiscriminatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "instruction" | "ix" | "global" => Ok(DiscriminatorKind::Instruction),
            "account" => Ok(DiscriminatorKind::Account),
            "event" => Ok(DiscriminatorKind::Event),
            _ => Err(format!("Unknown discriminator kind: {}", s)),
        }
    }
}

fn prop_str<'a>(props: &'a Props, name: &str) -> Option<&'a str> {
    props.get(name).and_then(PropValue::as_str)
}

/// Forward every prop as a `data-*` attribute (`fileName` → `data-file-name`)
fn data_props(props: &Props) -> Props {
    props
        .iter()
        .map(|(name, value)| (format!("data-{}", to_kebab_case(name)), value.clone()))
        .collect()
}

/// `"Program Derived Addresses"` → `"program-derived-addresses"`
fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn to_kebab_case(s: &str) -> String {
    to_snake_case(s).replace('_', "-")
}

/// `initializeCounter` / `InitializeCounter` / `initialize counter` →
/// `initialize_counter`
fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' || c == '-' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }

        out.extend(c.to_lowercase());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_closed() {
        let names: Vec<_> = COMPONENTS.names().collect();
        assert_eq!(
            names,
            vec![
                "ArticleSection",
                "IDE",
                "RequirementList",
                "Requirement",
                "AnchorDiscriminatorCalculator",
                "pre",
                "blockquote"
            ]
        );
        assert!(!COMPONENTS.contains("Callout"));
        assert!(!COMPONENTS.contains("p"));
    }

    #[test]
    fn test_instruction_discriminator_matches_anchor() {
        assert_eq!(
            DiscriminatorKind::Instruction.discriminator("initialize"),
            [175, 175, 109, 31, 13, 152, 155, 237]
        );
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("initialize"), "initialize");
        assert_eq!(to_snake_case("initializeCounter"), "initialize_counter");
        assert_eq!(to_snake_case("InitializeCounter"), "initialize_counter");
        assert_eq!(to_snake_case("create NFT mint"), "create_nft_mint");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
    }

    #[test]
    fn test_calculator_renders_discriminator() {
        let props = Props::from([("name".to_string(), PropValue::from("initialize"))]);
        let node = anchor_discriminator_calculator(&props, Vec::new());

        assert_eq!(
            node.find("code").unwrap().text_content(),
            "[175, 175, 109, 31, 13, 152, 155, 237]"
        );
        assert!(node.to_html().contains("afaf6d1f0d989bed"));
    }

    #[test]
    fn test_calculator_without_name_is_a_shell() {
        let node = anchor_discriminator_calculator(&Props::new(), Vec::new());
        assert!(node.children().is_empty());
        assert_eq!(node.prop("data-kind"), Some(&PropValue::from("instruction")));
    }

    #[test]
    fn test_article_section_id() {
        let props = Props::from([("name".to_string(), PropValue::from("Program Derived Addresses"))]);
        let node = article_section(&props, Vec::new());

        assert_eq!(node.tag(), Some("section"));
        assert_eq!(
            node.prop("id"),
            Some(&PropValue::from("program-derived-addresses"))
        );
    }

    #[test]
    fn test_ide_forwards_data_props() {
        let props = Props::from([("fileName".to_string(), PropValue::from("counter.ts"))]);
        let node = ide(&props, Vec::new());

        assert_eq!(node.to_html(), r#"<div class="ide" data-file-name="counter.ts"></div>"#);
    }

    #[test]
    fn test_warning_blockquote_wraps_children() {
        let node = warning_blockquote(&Props::new(), vec![ViewNode::text("Careful")]);

        assert_eq!(node.tag(), Some("blockquote"));
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[0].prop("data-icon"), Some(&PropValue::from("Warning")));
        assert_eq!(node.children()[1].text_content(), "Careful");
    }
}
