//! Login page

use rsvp_browser::Selector;

pub const PATH: &str = "/login";

pub fn username_input() -> Selector {
    Selector::placeholder("Enter username")
}

pub fn password_input() -> Selector {
    Selector::placeholder("Enter password")
}

pub fn sign_in_button() -> Selector {
    Selector::role("button", "Sign In")
}

pub fn error_message() -> Selector {
    Selector::css(".error-message")
}
