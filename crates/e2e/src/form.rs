//! Form Driver
//!
//! Maps one [`DomainRecord`] onto a sequence of UI operations described by a
//! [`FormPlan`]: open the creation form, enter every bound field through its
//! configured widget variant, submit, and hand terminal-state determination
//! to the [`Reconciler`]. A locator that never becomes actionable within its
//! budget surfaces as a typed failure for the owning step, never as a hang.

use tracing::{debug, info};

use rsvp_browser::{BrowserError, Page, Selector, WaitState};

use crate::error::{SuiteError, SuiteResult};
use crate::profile::{FieldBinding, FormPlan, WidgetKind};
use crate::reconcile::{Reconciler, SubmissionOutcome};
use crate::record::DomainRecord;

pub struct FormDriver {
    plan: FormPlan,
    reconciler: Reconciler,
}

impl FormDriver {
    pub fn new(plan: FormPlan) -> SuiteResult<Self> {
        let reconciler = Reconciler::new(&plan.signals)?;
        Ok(Self { plan, reconciler })
    }

    pub fn plan(&self) -> &FormPlan {
        &self.plan
    }

    /// Drive one record through the form and classify the outcome.
    ///
    /// `listed_text` is forwarded to the reconciler as the list-membership
    /// signal.
    pub async fn submit<P: Page + ?Sized>(
        &self,
        page: &P,
        record: &DomainRecord,
        listed_text: Option<&str>,
    ) -> SuiteResult<SubmissionOutcome> {
        self.open_form(page).await?;

        for binding in &self.plan.fields {
            self.enter_field(page, binding, record).await?;
        }

        let submitted_from = page.current_url().await?;
        match page.click(&self.plan.submit, self.plan.field_timeout_ms).await {
            Ok(()) => {}
            Err(BrowserError::WaitTimeout { .. }) => return Err(SuiteError::SubmitControlMissing),
            Err(e) => return Err(e.into()),
        }
        info!("Submitted {} form", self.plan.name);

        self.reconciler
            .reconcile(page, &submitted_from, listed_text)
            .await
    }

    /// Open the form and wait until its primary input is interactable.
    async fn open_form<P: Page + ?Sized>(&self, page: &P) -> SuiteResult<()> {
        let never_opened = || SuiteError::FormNeverOpened {
            form: self.plan.name.clone(),
        };

        match page.click(&self.plan.open_form, self.plan.open_timeout_ms).await {
            Ok(()) => {}
            Err(BrowserError::WaitTimeout { .. }) => return Err(never_opened()),
            Err(e) => return Err(e.into()),
        }

        match page
            .wait_for(&self.plan.primary_input, WaitState::Visible, self.plan.open_timeout_ms)
            .await
        {
            Ok(()) => Ok(()),
            Err(BrowserError::WaitTimeout { .. }) => Err(never_opened()),
            Err(e) => Err(e.into()),
        }
    }

    async fn enter_field<P: Page + ?Sized>(
        &self,
        page: &P,
        binding: &FieldBinding,
        record: &DomainRecord,
    ) -> SuiteResult<()> {
        let value = binding.resolve(record);
        if value.is_empty() {
            // Missing optional fields map to empty string; leaving the
            // widget at its default is equivalent to entering nothing.
            debug!("Skipping empty field {}", binding.name());
            return Ok(());
        }

        let budget = self.plan.field_timeout_ms;
        let result = match binding.widget {
            WidgetKind::Text | WidgetKind::Date => self
                .fill_plain(page, &binding.selector, value, budget)
                .await,
            WidgetKind::NativeSelect => page.select_option(&binding.selector, value).await,
            WidgetKind::OverlayOptionList => {
                self.pick_overlay_option(page, &binding.selector, value, budget)
                    .await
            }
            WidgetKind::TypeAheadFilter => {
                self.filter_and_confirm(page, &binding.selector, value, budget)
                    .await
            }
        };

        match result {
            Ok(()) => Ok(()),
            Err(BrowserError::WaitTimeout { .. }) | Err(BrowserError::ActionFailed { .. }) => {
                Err(SuiteError::FieldNotFound {
                    field: binding.name(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn fill_plain<P: Page + ?Sized>(
        &self,
        page: &P,
        selector: &Selector,
        value: &str,
        budget: u64,
    ) -> Result<(), BrowserError> {
        page.wait_for(selector, WaitState::Visible, budget).await?;
        page.fill(selector, value).await
    }

    /// Click to open the overlay, then click the option with the matching
    /// visible text.
    async fn pick_overlay_option<P: Page + ?Sized>(
        &self,
        page: &P,
        selector: &Selector,
        label: &str,
        budget: u64,
    ) -> Result<(), BrowserError> {
        page.click(selector, budget).await?;
        page.click(&Selector::role("option", label), budget).await
    }

    /// Click the filter box, type the target label, confirm with Enter.
    async fn filter_and_confirm<P: Page + ?Sized>(
        &self,
        page: &P,
        selector: &Selector,
        label: &str,
        budget: u64,
    ) -> Result<(), BrowserError> {
        page.click(selector, budget).await?;
        page.type_text(selector, label).await?;
        page.press(selector, "Enter").await
    }
}
