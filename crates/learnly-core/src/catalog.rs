use std::sync::Mutex;

use thiserror::Error;

use crate::models::{Course, CourseCategory};
use crate::orchestrator::lock_state;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown course id {0}")]
    UnknownCourse(String),
}

/// Course collection shown on the dashboard. Only thumbnails change after
/// seeding.
#[derive(Debug)]
pub struct CourseCatalog {
    courses: Mutex<Vec<Course>>,
}

impl Default for CourseCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl CourseCatalog {
    pub fn seeded() -> Self {
        Self::from_courses(seed_courses())
    }

    fn from_courses(courses: Vec<Course>) -> Self {
        Self {
            courses: Mutex::new(courses),
        }
    }

    pub fn courses(&self) -> Vec<Course> {
        lock_state(&self.courses).clone()
    }

    pub fn get(&self, course_id: &str) -> Option<Course> {
        lock_state(&self.courses)
            .iter()
            .find(|course| course.id == course_id)
            .cloned()
    }

    pub fn replace_image(
        &self,
        course_id: &str,
        image: impl Into<String>,
    ) -> Result<Course, CatalogError> {
        let mut courses = lock_state(&self.courses);
        let course = courses
            .iter_mut()
            .find(|course| course.id == course_id)
            .ok_or_else(|| CatalogError::UnknownCourse(course_id.to_string()))?;
        course.image = image.into();
        Ok(course.clone())
    }
}

pub fn seed_courses() -> Vec<Course> {
    [
        (
            "1",
            CourseCategory::Frontend,
            "Beginner's Guide to Becoming a Professional Front-End Developer",
            "Leonardo Samsul",
            "https://picsum.photos/400/250?random=10",
        ),
        (
            "2",
            CourseCategory::UiUxDesign,
            "Optimizing User Experience with the Best UI/UX Design",
            "Bayu Salto",
            "https://picsum.photos/400/250?random=11",
        ),
        (
            "3",
            CourseCategory::Branding,
            "Reviving and Refreshing Company Image",
            "Padhang Satrio",
            "https://picsum.photos/400/250?random=12",
        ),
    ]
    .into_iter()
    .map(|(id, category, title, author, image)| Course {
        id: id.to_string(),
        category,
        title: title.to_string(),
        author: author.to_string(),
        image: image.to_string(),
    })
    .collect()
}
