//! Render resource clients and their models.
//!
//! # Available Resources
//!
//! | Resource | Endpoints |
//! |---|---|
//! | [`UsersResource`] | `GET /users` |
//! | [`ProjectsResource`] | `/projects`, `/projects/{id}` |
//! | [`EnvironmentsResource`] | `/environments`, `/environments/{id}`, `/environments/{id}/resources` |
//! | [`EventsResource`] | `GET /events/{id}` |
//!
//! List endpoints come in two flavors: `list` fetches one page and returns a
//! [`PaginatedResponse`](crate::pagination::PaginatedResponse), `list_all`
//! returns a lazy stream over every page.

mod environments;
mod events;
mod projects;
mod users;

use serde::{Deserialize, Serialize};

pub use environments::{
    CreateEnvironmentInput, Environment, EnvironmentsResource, ListEnvironmentsParams,
    UpdateEnvironmentInput,
};
pub use events::{Event, EventsResource};
pub use projects::{
    CreateProjectInput, ListProjectsParams, Project, ProjectEnvironmentInput, ProjectsResource,
    UpdateProjectInput,
};
pub use users::{User, UsersResource};

/// Protection status of an environment.
///
/// Protected environments restrict destructive actions to admins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProtectedStatus {
    /// Only admins can perform destructive actions.
    Protected,
    /// No additional restrictions.
    NotProtected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_status_wire_values() {
        assert_eq!(
            serde_json::to_value(ProtectedStatus::NotProtected).unwrap(),
            "not_protected"
        );
        assert_eq!(
            serde_json::from_str::<ProtectedStatus>("\"protected\"").unwrap(),
            ProtectedStatus::Protected
        );
    }
}
