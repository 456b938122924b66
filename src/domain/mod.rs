//! Domain types for course content.
//!
//! - Course / Lesson: ordered curriculum, lessons numbered at read time
//! - Challenge: standalone exercises
//! - ChallengeSlug: optional slug input for challenge lookups

pub mod challenge;
pub mod course;
pub mod slug;

pub use challenge::Challenge;
pub use course::{Course, Lesson};
pub use slug::ChallengeSlug;
