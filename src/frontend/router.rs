use std::collections::{HashMap, HashSet};

use thiserror::Error;

const MAX_REDIRECTS: usize = 8;

/// The views of the users module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum View {
    UsersIndex,
    UserCreate,
    UserShow,
    UserEdit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Loading {
    /// Bundled with the application.
    Eager,
    /// Fetched on first navigation, optionally under a named chunk.
    Lazy { chunk: Option<&'static str> },
}

/// Plain data for an outside navigation guard. Nothing here enforces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: &'static str,
    pub requires_auth: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Redirect(&'static str),
    View { view: View, loading: Loading },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteRecord {
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub alias: Option<&'static str>,
    pub meta: Option<RouteMeta>,
    pub target: Target,
}

impl RouteRecord {
    fn view(
        path: &'static str,
        name: &'static str,
        title: &'static str,
        view: View,
        loading: Loading,
    ) -> Self {
        RouteRecord {
            path,
            name: Some(name),
            alias: None,
            meta: Some(RouteMeta {
                title,
                requires_auth: true,
            }),
            target: Target::View { view, loading },
        }
    }

    /// Segment-wise match; `:name` segments capture.
    fn matches(&self, segments: &[&str]) -> Option<HashMap<String, String>> {
        let pattern = split(self.path);
        if pattern.len() != segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (expected, actual) in pattern.iter().zip(segments) {
            match expected.strip_prefix(':') {
                Some(param) => {
                    params.insert(param.to_string(), actual.to_string());
                }
                None if expected == actual => (),
                None => return None,
            }
        }

        Some(params)
    }
}

pub fn user_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord {
            path: "/",
            name: None,
            alias: None,
            meta: None,
            target: Target::Redirect("/users"),
        },
        RouteRecord::view("/users", "UsersList", "Users", View::UsersIndex, Loading::Eager),
        RouteRecord::view(
            "/users/create",
            "UserCreate",
            "Create user",
            View::UserCreate,
            Loading::Lazy {
                chunk: Some("create"),
            },
        ),
        RouteRecord {
            alias: Some("/users/:id"),
            ..RouteRecord::view(
                "/users/:id",
                "UserShow",
                "Show user",
                View::UserShow,
                Loading::Lazy { chunk: None },
            )
        },
        RouteRecord::view(
            "/users/:id/edit",
            "UserEdit",
            "Edit user",
            View::UserEdit,
            Loading::Lazy { chunk: None },
        ),
    ]
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("No route matches {0}")]
    NotFound(String),
    #[error("Too many redirects resolving {0}")]
    RedirectLoop(String),
}

#[derive(Debug, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub record: &'a RouteRecord,
    pub view: View,
    pub params: HashMap<String, String>,
    /// True when this navigation was the one that loaded the view.
    pub loaded_now: bool,
}

pub struct Router {
    routes: Vec<RouteRecord>,
    loaded: HashSet<View>,
}

impl Router {
    pub fn new(routes: Vec<RouteRecord>) -> Self {
        let loaded = routes
            .iter()
            .filter_map(|route| match route.target {
                Target::View {
                    view,
                    loading: Loading::Eager,
                } => Some(view),
                _ => None,
            })
            .collect();

        Router { routes, loaded }
    }

    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    pub fn is_loaded(&self, view: View) -> bool {
        self.loaded.contains(&view)
    }

    #[tracing::instrument(skip(self))]
    pub fn resolve(&mut self, path: &str) -> Result<Resolved<'_>, RouteError> {
        let mut current = path.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let segments = split(&current);
            let (index, params) = self
                .routes
                .iter()
                .enumerate()
                .find_map(|(i, route)| route.matches(&segments).map(|params| (i, params)))
                .ok_or_else(|| RouteError::NotFound(current.clone()))?;

            match self.routes[index].target {
                Target::Redirect(to) => {
                    tracing::debug!(from = %current, to = to, "Following redirect");
                    current = to.to_string();
                }
                Target::View { view, loading } => {
                    let loaded_now = loading != Loading::Eager && self.loaded.insert(view);
                    if loaded_now {
                        tracing::debug!(view = ?view, "Loaded view");
                    }

                    return Ok(Resolved {
                        record: &self.routes[index],
                        view,
                        params,
                        loaded_now,
                    });
                }
            }
        }

        Err(RouteError::RedirectLoop(path.to_string()))
    }
}

impl Default for Router {
    fn default() -> Self {
        Router::new(user_routes())
    }
}

/// Path segments, ignoring any query string or fragment.
fn split(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty()).collect()
}
