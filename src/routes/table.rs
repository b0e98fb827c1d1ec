use std::{collections::HashSet, fmt, sync::Arc};

use crate::{config::AppConfig, lazy::LazyPage, models::RouteManifestEntry};

/// RouteDescriptor
///
/// One configured route: the path it answers, the title shown in navigation and
/// breadcrumbs, the page unit it renders and whether a session is required.
#[derive(Clone)]
pub struct RouteDescriptor {
    pub path: String,
    pub title: String,
    pub component: Arc<LazyPage>,
    pub is_secure: bool,
}

impl RouteDescriptor {
    pub fn new(
        path: impl Into<String>,
        title: impl Into<String>,
        component: Arc<LazyPage>,
        is_secure: bool,
    ) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            component,
            is_secure,
        }
    }

    pub fn manifest_entry(&self) -> RouteManifestEntry {
        RouteManifestEntry {
            path: self.path.clone(),
            title: self.title.clone(),
            is_secure: self.is_secure,
        }
    }
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("path", &self.path)
            .field("title", &self.title)
            .field("component", &self.component.name())
            .field("is_secure", &self.is_secure)
            .finish()
    }
}

/// RouteTableProvider Trait
///
/// Supplies the ordered route descriptors. Read once, when the router is built.
pub trait RouteTableProvider {
    fn routes(&self) -> Vec<RouteDescriptor>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route path '{0}' must start with '/'")]
    NotAbsolute(String),
    #[error("route path '/' is reserved for the default redirect")]
    ReservedRoot,
    #[error("route path '{0}' must be literal (no wildcards or captures)")]
    NotLiteral(String),
    #[error("route path '{0}' is configured more than once")]
    Duplicate(String),
    #[error("default path '{0}' is not a configured route")]
    MissingDefault(String),
    #[error("default path '{0}' must not require authentication")]
    SecureDefault(String),
    #[error("login path '{0}' must not require authentication")]
    SecureLogin(String),
}

/// RouteTable
///
/// The validated, immutable route descriptors, in provider order.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    /// Validates `routes` against the redirect targets in `config`.
    pub fn new(routes: Vec<RouteDescriptor>, config: &AppConfig) -> Result<Self, RouteTableError> {
        let mut seen = HashSet::new();

        for route in &routes {
            let path = route.path.as_str();
            if !path.starts_with('/') {
                return Err(RouteTableError::NotAbsolute(route.path.clone()));
            }
            if path == "/" {
                return Err(RouteTableError::ReservedRoot);
            }
            if path.contains(['*', '{', '}'])
                || path.split('/').any(|segment| segment.starts_with(':'))
            {
                return Err(RouteTableError::NotLiteral(route.path.clone()));
            }
            if !seen.insert(path) {
                return Err(RouteTableError::Duplicate(route.path.clone()));
            }
        }

        // Unmatched paths redirect to the default; it must be reachable without a session.
        match routes.iter().find(|r| r.path == config.default_path) {
            None => return Err(RouteTableError::MissingDefault(config.default_path.clone())),
            Some(route) if route.is_secure => {
                return Err(RouteTableError::SecureDefault(config.default_path.clone()));
            }
            Some(_) => {}
        }

        if routes
            .iter()
            .any(|r| r.path == config.login_path && r.is_secure)
        {
            return Err(RouteTableError::SecureLogin(config.login_path.clone()));
        }

        Ok(Self { routes })
    }

    pub fn from_provider(
        provider: &dyn RouteTableProvider,
        config: &AppConfig,
    ) -> Result<Self, RouteTableError> {
        Self::new(provider.routes(), config)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter()
    }

    pub fn get(&self, path: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.path == path)
    }

    /// Descriptors shown in the sidebar navigation.
    pub fn secure_routes(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter().filter(|r| r.is_secure)
    }

    pub fn manifest(&self) -> Vec<RouteManifestEntry> {
        self.routes.iter().map(RouteDescriptor::manifest_entry).collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
