//! Courses and the lessons they own.
//!
//! Only `slug`, `lessons` and the derived `lessonNumber` are understood by
//! this crate. Everything else in a content entry (title, description,
//! difficulty, ...) is carried through untouched in `metadata`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A course and its ordered lessons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier (URL-safe)
    pub slug: String,

    /// Lessons in reading order
    #[serde(default)]
    pub lessons: Vec<Lesson>,

    /// Opaque course-level fields
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Course {
    /// Create a course with no lessons
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            lessons: Vec::new(),
            metadata: Map::new(),
        }
    }

    /// Add a lesson at the end
    pub fn with_lesson(mut self, lesson: Lesson) -> Self {
        self.lessons.push(lesson);
        self
    }

    /// Set an opaque metadata field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Title, when the content provides one
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }

    /// Copy of this course with every lesson numbered by position (1-based).
    pub fn numbered(&self) -> Self {
        let mut course = self.clone();
        for (index, lesson) in course.lessons.iter_mut().enumerate() {
            lesson.lesson_number = Some(index as u32 + 1);
        }
        course
    }
}

/// A single lesson inside a course
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// 1-based position within the parent course. Content files normally
    /// leave it out; [`Course::numbered`] overwrites whatever is there.
    #[serde(
        rename = "lessonNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub lesson_number: Option<u32>,

    /// Opaque lesson fields (slug, title, ...)
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Lesson {
    /// Create an empty lesson
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an opaque metadata field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Lesson slug, when the content provides one
    pub fn slug(&self) -> Option<&str> {
        self.metadata.get("slug").and_then(Value::as_str)
    }

    /// Lesson title, when the content provides one
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }
}
