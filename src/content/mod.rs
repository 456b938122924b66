//! Content store and metadata accessors.
//!
//! # Content Layout
//!
//! ```text
//! <content>/
//! ├── courses.yaml        # ordered course list (slug, lessons, ...)
//! ├── courses/            # optional, one course per file
//! ├── challenges.yaml     # ordered challenge list (slug, ...)
//! └── challenges/         # optional, one challenge per file
//! ```

pub mod accessor;
pub mod store;

pub use accessor::{
    get_all_challenges, get_all_courses, get_challenge, get_course, get_course_lessons, install,
    store,
};
pub use store::{ContentError, ContentStore};
