//! Navbar affordances and what activating each one does.

use crate::core::identity::Identity;
use crate::core::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub home: Route,
    pub create_event: Route,
    pub my_events: Route,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Plain link, never gated.
    Link(Route),
    // Requires a signed in user.
    Gated(Route),
    OpenAuth,
    SignOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: Action,
}

impl MenuItem {
    fn new(label: &'static str, action: Action) -> Self {
        Self { label, action }
    }
}

pub fn menu(identity: Option<&Identity>, routes: &Routes) -> Vec<MenuItem> {
    let mut items = vec![
        MenuItem::new("Discover", Action::Link(routes.home.clone())),
        MenuItem::new("Create Event", Action::Gated(routes.create_event.clone())),
    ];
    match identity {
        Some(_) => {
            items.push(MenuItem::new("My Events", Action::Link(routes.my_events.clone())));
            items.push(MenuItem::new("Sign Out", Action::SignOut));
        }
        None => items.push(MenuItem::new("Sign In", Action::OpenAuth)),
    }
    items
}

/// Find an item by its label, ignoring case.
pub fn find<'a>(items: &'a [MenuItem], label: &str) -> Option<&'a MenuItem> {
    items
        .iter()
        .find(|item| item.label.eq_ignore_ascii_case(label.trim()))
}
