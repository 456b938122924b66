//! Metadata accessors.
//!
//! Every accessor hands back an owned copy; nothing returned here shares
//! state with the store or with another caller's result.
//!
//! The free functions operate on the process-wide store installed with
//! [`install`]. Embedders that manage their own [`ContentStore`] can call
//! the methods directly.

use std::sync::OnceLock;

use tracing::{debug, instrument};

use super::store::{ContentError, ContentStore};
use crate::domain::{Challenge, ChallengeSlug, Course, Lesson};

/// Process-wide store, set once at start-up
static STORE: OnceLock<ContentStore> = OnceLock::new();

impl ContentStore {
    /// Find a course by slug, lessons numbered from 1.
    ///
    /// A missing course is a hard not-found: the caller should stop and
    /// answer with its not-found response.
    #[instrument(skip(self))]
    pub fn get_course(&self, course_slug: &str) -> Result<Course, ContentError> {
        match self.courses().iter().find(|c| c.slug == course_slug) {
            Some(course) => Ok(course.numbered()),
            None => {
                debug!("Course not found");
                Err(ContentError::CourseNotFound(course_slug.to_string()))
            }
        }
    }

    /// Copy of every course, source order, no derived fields
    pub fn get_all_courses(&self) -> Vec<Course> {
        self.courses().to_vec()
    }

    /// Lessons of a course, numbered from 1
    pub fn get_course_lessons(&self, course_slug: &str) -> Result<Vec<Lesson>, ContentError> {
        Ok(self.get_course(course_slug)?.lessons)
    }

    /// Find a challenge by slug.
    ///
    /// No slug, a null slug, an empty slug or an unknown slug all give
    /// `None`; this is never an error.
    pub fn get_challenge<'a>(
        &self,
        challenge_slug: impl Into<ChallengeSlug<'a>>,
    ) -> Option<Challenge> {
        let slug = challenge_slug.into().as_lookup()?;
        self.challenges().iter().find(|c| c.slug == slug).cloned()
    }

    /// Copy of every challenge, source order
    pub fn get_all_challenges(&self) -> Vec<Challenge> {
        self.challenges().to_vec()
    }
}

/// Install the process-wide store. Only the first call succeeds.
pub fn install(store: ContentStore) -> Result<&'static ContentStore, ContentError> {
    let mut installed = false;
    let stored = STORE.get_or_init(|| {
        installed = true;
        store
    });

    if installed {
        Ok(stored)
    } else {
        Err(ContentError::AlreadyInstalled)
    }
}

/// The process-wide store, if installed
pub fn store() -> Result<&'static ContentStore, ContentError> {
    STORE.get().ok_or(ContentError::NotInitialized)
}

/// [`ContentStore::get_course`] on the installed store
pub fn get_course(course_slug: &str) -> Result<Course, ContentError> {
    store()?.get_course(course_slug)
}

/// [`ContentStore::get_all_courses`] on the installed store
pub fn get_all_courses() -> Result<Vec<Course>, ContentError> {
    Ok(store()?.get_all_courses())
}

/// [`ContentStore::get_course_lessons`] on the installed store
pub fn get_course_lessons(course_slug: &str) -> Result<Vec<Lesson>, ContentError> {
    store()?.get_course_lessons(course_slug)
}

/// [`ContentStore::get_challenge`] on the installed store
pub fn get_challenge<'a>(
    challenge_slug: impl Into<ChallengeSlug<'a>>,
) -> Result<Option<Challenge>, ContentError> {
    Ok(store()?.get_challenge(challenge_slug))
}

/// [`ContentStore::get_all_challenges`] on the installed store
pub fn get_all_challenges() -> Result<Vec<Challenge>, ContentError> {
    Ok(store()?.get_all_challenges())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContentStore {
        ContentStore::new(
            vec![Course::new("ts-basics")
                .with_lesson(Lesson::new().with_field("title", "A"))
                .with_lesson(Lesson::new().with_field("title", "B"))],
            vec![Challenge::new("counter").with_field("title", "Counter")],
        )
        .unwrap()
    }

    #[test]
    fn test_get_course_numbers_lessons() {
        let course = sample().get_course("ts-basics").unwrap();

        let numbers: Vec<_> = course.lessons.iter().map(|l| l.lesson_number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_get_course_not_found() {
        let err = sample().get_course("missing").unwrap_err();
        assert_eq!(err, ContentError::CourseNotFound("missing".to_string()));
    }

    #[test]
    fn test_get_challenge_variants() {
        let store = sample();

        assert!(store.get_challenge("counter").is_some());
        assert!(store.get_challenge("missing").is_none());
        assert!(store.get_challenge("").is_none());
        assert!(store.get_challenge(ChallengeSlug::Absent).is_none());
        assert!(store.get_challenge(ChallengeSlug::Null).is_none());
        assert!(store.get_challenge(None::<&str>).is_none());
    }

    #[test]
    fn test_all_courses_has_no_lesson_numbers() {
        let courses = sample().get_all_courses();
        assert!(courses[0].lessons.iter().all(|l| l.lesson_number.is_none()));
    }
}
