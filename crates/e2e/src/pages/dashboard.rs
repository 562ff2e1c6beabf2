//! Dashboard page

use rsvp_browser::Selector;

pub const PATH: &str = "/dashboard";

/// The user menu button carries the logged-in account's display name.
pub fn user_menu(display_name: &str) -> Selector {
    Selector::role("button", display_name)
}

pub fn logout_button() -> Selector {
    Selector::role("button", "Logout")
}
