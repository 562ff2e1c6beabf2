//! Session and navigation context
//!
//! One authenticated browser state per test run/worker, threaded explicitly
//! through every flow — no ambient shared test context. Navigation calls are
//! idempotent: re-navigating to the same list is a fresh load of the same
//! view.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use rsvp_browser::{BrowserError, Page, Selector, WaitState};

use crate::error::{SuiteError, SuiteResult};
use crate::pages::{clients, dashboard, events, login};
use crate::record::Domain;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Authenticated browser state plus the current logical location.
#[derive(Debug)]
pub struct Session<P: Page> {
    page: P,
    base_url: String,
    location: Option<Domain>,
    nav_timeout_ms: u64,
}

impl<P: Page> Session<P> {
    /// Log in and return the authenticated session.
    ///
    /// Waits for either the dashboard URL or the login error message;
    /// the error resolves to `InvalidCredentials`, neither within the
    /// budget resolves to `NavigationTimeout`.
    pub async fn authenticate(
        page: P,
        base_url: impl Into<String>,
        credentials: &Credentials,
        nav_timeout_ms: u64,
    ) -> SuiteResult<Self> {
        let base_url = base_url.into();

        page.navigate(&format!("{}{}", base_url, login::PATH)).await?;
        page.fill(&login::username_input(), &credentials.username).await?;
        page.fill(&login::password_input(), &credentials.password).await?;
        page.click(&login::sign_in_button(), nav_timeout_ms).await?;

        let deadline = Instant::now() + Duration::from_millis(nav_timeout_ms);
        loop {
            let url = page.current_url().await?;
            if url.contains(dashboard::PATH) {
                info!("Authenticated as {}", credentials.username);
                return Ok(Self {
                    page,
                    base_url,
                    location: None,
                    nav_timeout_ms,
                });
            }
            if page.is_visible(&login::error_message()).await? {
                return Err(SuiteError::InvalidCredentials {
                    username: credentials.username.clone(),
                });
            }
            if Instant::now() >= deadline {
                return Err(SuiteError::NavigationTimeout {
                    target: format!("{}{}", base_url, dashboard::PATH),
                });
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Load `domain`'s list view and wait for its anchor element.
    pub async fn navigate_to_list(&mut self, domain: Domain) -> SuiteResult<()> {
        let url = format!("{}{}", self.base_url, domain.list_path());
        debug!("Navigating to {}", url);

        self.page.navigate(&url).await?;
        let anchor = Self::list_anchor(domain);
        match self
            .page
            .wait_for(&anchor, WaitState::Visible, self.nav_timeout_ms)
            .await
        {
            Ok(()) => {
                self.location = Some(domain);
                Ok(())
            }
            Err(BrowserError::WaitTimeout { .. }) => {
                self.location = None;
                Err(SuiteError::NavigationTimeout { target: url })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// From the events list, open one event's detail page (where sub-event
    /// forms live).
    pub async fn open_event_detail(&mut self, event_name: &str) -> SuiteResult<()> {
        if self.location != Some(Domain::SubEvents) && self.location != Some(Domain::Events) {
            self.navigate_to_list(Domain::Events).await?;
        }
        match self
            .page
            .click(&events::event_link(event_name), self.nav_timeout_ms)
            .await
        {
            Ok(()) => {
                self.page.wait_for_load().await?;
                // A detail page is no longer any list view.
                self.location = None;
                Ok(())
            }
            Err(BrowserError::WaitTimeout { .. }) => Err(SuiteError::NavigationTimeout {
                target: format!("event {:?}", event_name),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Log out through the dashboard user menu and wait for the login page.
    pub async fn logout(&mut self, display_name: &str) -> SuiteResult<()> {
        self.page
            .click(&dashboard::user_menu(display_name), self.nav_timeout_ms)
            .await?;
        self.page
            .click(&dashboard::logout_button(), self.nav_timeout_ms)
            .await?;

        let deadline = Instant::now() + Duration::from_millis(self.nav_timeout_ms);
        loop {
            if self.page.current_url().await?.contains(login::PATH) {
                self.location = None;
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SuiteError::NavigationTimeout {
                    target: format!("{}{}", self.base_url, login::PATH),
                });
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn location(&self) -> Option<Domain> {
        self.location
    }

    /// Tear down the session, returning the page to the caller.
    pub fn into_page(self) -> P {
        self.page
    }

    fn list_anchor(domain: Domain) -> Selector {
        match domain {
            Domain::Clients => clients::add_client_button(),
            Domain::Events | Domain::SubEvents => events::add_event_button(),
        }
    }
}

/// Poll the target application until it answers, up to `timeout`.
///
/// Run once before a live suite so an unreachable deployment fails fast with
/// a clear message instead of as a cascade of navigation timeouts.
pub async fn wait_until_reachable(base_url: &str, timeout: Duration) -> SuiteResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(|e| SuiteError::NavigationTimeout {
            target: format!("{}: {}", base_url, e),
        })?;

    let start = Instant::now();
    let mut attempts = 0u32;
    while start.elapsed() < timeout {
        attempts += 1;
        match client.get(base_url).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("{} reachable after {} attempt(s)", base_url, attempts);
                return Ok(());
            }
            Ok(resp) => debug!("Reachability probe returned {}", resp.status()),
            Err(e) => debug!("Reachability probe failed: {}", e),
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    Err(SuiteError::NavigationTimeout {
        target: base_url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsvp_browser::fake::{FakeEffect, FakePage};

    const BASE: &str = "https://app.test";

    fn login_page() -> FakePage {
        let page = FakePage::new(format!("{}/login", BASE))
            .with_action_timeout(Duration::from_millis(100));
        page.add_element(login::username_input(), "");
        page.add_element(login::password_input(), "");
        page.add_element(login::sign_in_button(), "Sign In");
        page
    }

    #[tokio::test]
    async fn authenticate_succeeds_on_dashboard_redirect() {
        let page = login_page();
        page.on_click(
            login::sign_in_button(),
            Duration::from_millis(20),
            vec![FakeEffect::SetUrl {
                url: format!("{}/dashboard", BASE),
            }],
        );

        let creds = Credentials::new("aman@gmail.com", "Admin@123");
        let session = Session::authenticate(page.clone(), BASE, &creds, 1_000)
            .await
            .unwrap();
        assert!(session.location().is_none());
        assert_eq!(
            page.value_of(&login::username_input()).as_deref(),
            Some("aman@gmail.com")
        );
    }

    #[tokio::test]
    async fn authenticate_maps_error_banner_to_invalid_credentials() {
        let page = login_page();
        page.on_click(
            login::sign_in_button(),
            Duration::from_millis(20),
            vec![FakeEffect::Show {
                selector: login::error_message(),
                text: "Invalid credentials".into(),
            }],
        );

        let creds = Credentials::new("invalid@example.com", "wrong");
        let err = Session::authenticate(page, BASE, &creds, 1_000)
            .await
            .unwrap_err();
        assert!(matches!(err, SuiteError::InvalidCredentials { .. }));
    }

    #[tokio::test]
    async fn authenticate_times_out_without_either_signal() {
        let page = login_page();
        let creds = Credentials::new("aman@gmail.com", "Admin@123");
        let err = Session::authenticate(page, BASE, &creds, 300)
            .await
            .unwrap_err();
        assert!(matches!(err, SuiteError::NavigationTimeout { .. }));
    }

    #[tokio::test]
    async fn navigate_to_list_waits_for_anchor() {
        let page = login_page();
        page.on_click(
            login::sign_in_button(),
            Duration::ZERO,
            vec![FakeEffect::SetUrl {
                url: format!("{}/dashboard", BASE),
            }],
        );
        page.add_element(clients::add_client_button(), "Add Client");

        let creds = Credentials::new("aman@gmail.com", "Admin@123");
        let mut session = Session::authenticate(page.clone(), BASE, &creds, 1_000)
            .await
            .unwrap();

        session.navigate_to_list(Domain::Clients).await.unwrap();
        assert_eq!(session.location(), Some(Domain::Clients));
        assert_eq!(
            page.navigations().last().map(String::as_str),
            Some("https://app.test/clients")
        );

        // Idempotent: a second call is a fresh load of the same view.
        session.navigate_to_list(Domain::Clients).await.unwrap();
        assert_eq!(
            page.navigations()
                .iter()
                .filter(|u| u.as_str() == "https://app.test/clients")
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn navigate_to_list_times_out_without_anchor() {
        let page = login_page();
        page.on_click(
            login::sign_in_button(),
            Duration::ZERO,
            vec![FakeEffect::SetUrl {
                url: format!("{}/dashboard", BASE),
            }],
        );

        let creds = Credentials::new("aman@gmail.com", "Admin@123");
        let mut session = Session::authenticate(page, BASE, &creds, 300)
            .await
            .unwrap();

        let err = session.navigate_to_list(Domain::Events).await.unwrap_err();
        assert!(matches!(err, SuiteError::NavigationTimeout { .. }));
        assert_eq!(session.location(), None);
    }
}
