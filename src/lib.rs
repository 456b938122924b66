//! syllabus - Course content access and safe MDX rendering
//!
//! Two independent halves consumed by lesson pages:
//!
//! - Content: a read-only store of courses (with ordered lessons) and
//!   challenges, looked up by slug. Every lookup returns an owned copy;
//!   lessons are numbered from 1 at read time.
//! - MDX: markup with embedded component tags is parsed into mdast and
//!   rendered into a view tree, with a fixed table binding custom tags
//!   (`ArticleSection`, `IDE`, `Requirement`, ...) to components.
//!
//! # Modules
//!
//! - `domain`: Course, Lesson, Challenge, ChallengeSlug
//! - `content`: ContentStore and the metadata accessors
//! - `mdx`: parser, renderer, components, view tree
//! - `config`: config file / environment resolution
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Show a course with numbered lessons
//! syllabus --content ./content course anchor-101
//!
//! # Render a lesson body
//! syllabus render --input lessons/intro.mdx
//! ```

pub mod cli;
pub mod config;
pub mod content;
pub mod domain;
pub mod mdx;

// Re-export main types at crate root for convenience
pub use content::{ContentError, ContentStore};
pub use domain::{Challenge, ChallengeSlug, Course, Lesson};
pub use mdx::{render_safe_mdx, MdxError, SafeMdxRenderer, UnknownComponentPolicy, ViewNode};
