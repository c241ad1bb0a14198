use std::collections::HashMap;
use std::fmt;

use crate::model::{Entity, Key};

/// Navigation targets of the admin UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    NotFound,
    List { resource: &'static str },
    View { resource: &'static str, id: Key },
    New { resource: &'static str },
    Edit { resource: &'static str, id: Key },
}

impl Route {
    pub fn list<E: Entity>() -> Self {
        Route::List {
            resource: E::ENTITY_NAME,
        }
    }

    pub fn new_entity<E: Entity>() -> Self {
        Route::New {
            resource: E::ENTITY_NAME,
        }
    }

    pub fn edit<E: Entity>(id: Key) -> Self {
        Route::Edit {
            resource: E::ENTITY_NAME,
            id,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::NotFound => "/404".to_string(),
            Route::List { resource } => format!("/{}", resource),
            Route::View { resource, id } => format!("/{}/{}/view", resource, id),
            Route::New { resource } => format!("/{}/new", resource),
            Route::Edit { resource, id } => format!("/{}/{}/edit", resource, id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Path parameters of the navigation being resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: HashMap<String, String>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_id(self, id: Key) -> Self {
        self.with("id", id.to_string())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
