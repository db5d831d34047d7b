//! User-held search filters.

use serde::{Deserialize, Serialize};

use super::Department;

/// What the user asked to search for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Free-text query (may be empty).
    pub query: String,

    /// Restrict results to one department.
    pub selected_department: Option<Department>,

    /// Only return objects that have images.
    pub has_images: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            query: String::new(),
            selected_department: None,
            has_images: true,
        }
    }
}

impl SearchFilters {
    /// Create filters for a text query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set the department filter.
    pub fn with_department(mut self, department: Option<Department>) -> Self {
        self.selected_department = department;
        self
    }

    /// Set the has-images flag.
    pub fn with_has_images(mut self, has_images: bool) -> Self {
        self.has_images = has_images;
        self
    }

    /// Department id for the `departmentId` parameter.
    pub fn department_id(&self) -> Option<i64> {
        self.selected_department.as_ref().map(|d| d.id)
    }

    /// A search needs a query or a department to be submitted.
    pub fn can_submit(&self) -> bool {
        !self.query.is_empty() || self.selected_department.is_some()
    }
}
