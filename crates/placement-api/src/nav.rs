use axum::{Json, extract::Query, response::IntoResponse};
use serde::Deserialize;

use placement_types::api::NavItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub label: &'static str,
}

pub const ROUTES: [Route; 7] = [
    Route { path: "/", label: "Dashboard" },
    Route { path: "/hr-database", label: "HR Database" },
    Route { path: "/ask-questions", label: "Ask Questions" },
    Route { path: "/recent-questions", label: "Recent Questions" },
    Route { path: "/expert-answers", label: "Expert Answers" },
    Route { path: "/job-openings", label: "Job Openings" },
    Route { path: "/current-jobs", label: "Current Jobs" },
];

/// The root link is active only on `/` itself; every other link is active
/// for its path and anything below it.
pub fn is_active(path: &str, current: &str) -> bool {
    if path == "/" {
        current == "/"
    } else {
        current.starts_with(path)
    }
}

pub fn nav_items(current: &str) -> Vec<NavItem> {
    ROUTES
        .iter()
        .map(|r| NavItem {
            path: r.path,
            label: r.label,
            active: is_active(r.path, current),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct NavQuery {
    #[serde(default = "root")]
    pub path: String,
}

fn root() -> String {
    "/".into()
}

pub async fn get_nav(Query(query): Query<NavQuery>) -> impl IntoResponse {
    Json(nav_items(&query.path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_labels(current: &str) -> Vec<&'static str> {
        nav_items(current)
            .into_iter()
            .filter(|i| i.active)
            .map(|i| i.label)
            .collect()
    }

    #[test]
    fn root_is_exact_match() {
        assert!(is_active("/", "/"));
        assert!(!is_active("/", "/current-jobs"));
        assert_eq!(active_labels("/"), vec!["Dashboard"]);
    }

    #[test]
    fn others_are_prefix_match() {
        assert!(is_active("/recent-questions", "/recent-questions"));
        assert!(is_active("/recent-questions", "/recent-questions/q1/answers"));
        assert!(!is_active("/recent-questions", "/expert-answers"));
        assert_eq!(active_labels("/current-jobs"), vec!["Current Jobs"]);
    }

    #[test]
    fn seven_routes() {
        assert_eq!(nav_items("/").len(), 7);
        assert!(active_labels("/nowhere").is_empty());
    }
}
