use parking_lot::Mutex;

use crate::model::Route;

/// Caller-side navigation. Components decide *where* to go; the host performs it.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);

    /// Return to the previous view.
    fn back(&self);
}

/// A navigation history kept in memory, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<Route>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(route: Route) -> Self {
        Self {
            entries: Mutex::new(vec![route]),
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.entries.lock().last().cloned()
    }

    pub fn entries(&self) -> Vec<Route> {
        self.entries.lock().clone()
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        log::debug!("navigating to {}", route);
        self.entries.lock().push(route);
    }

    fn back(&self) {
        let mut entries = self.entries.lock();
        if let Some(route) = entries.pop() {
            log::debug!("leaving {}", route);
        }
    }
}
