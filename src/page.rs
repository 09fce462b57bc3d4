use std::sync::Arc;

use crate::locale::Locale;
use crate::waitlist_client::WaitlistClient;
use crate::widget::Slot;
use crate::widget::WaitlistWidget;
use crate::widget::WidgetOptions;

/// The knobs that used to be separate copies of the landing page
#[derive(Clone, Debug, Default)]
pub struct PageVariant {
    pub locale: Locale,
    /// Overrides `Locale::default_collection_path`
    pub endpoint_path: Option<String>,
    /// A second, independent form further down the page
    pub dual_form: bool,
    pub share_affordance: bool,
    pub privacy_consent: bool,
}

impl PageVariant {
    pub fn collection_path(&self) -> String {
        self.endpoint_path
            .clone()
            .unwrap_or_else(|| self.locale.default_collection_path().to_string())
    }
}

/// One page view: the top form, plus the bottom one on dual-form variants.
/// Both widgets post to the same collection over the same connection pool, but
/// nothing else is shared; each can be submitting while the other isn't.
pub struct LandingPage {
    pub variant: PageVariant,
    pub top: Arc<WaitlistWidget>,
    pub bottom: Option<Arc<WaitlistWidget>>,
}

impl LandingPage {
    pub fn build(
        variant: PageVariant,
        client: &WaitlistClient,
        share_url: String,
        initial_signup_count: u64,
    ) -> Self {
        let client = client.with_collection_path(variant.collection_path());
        let options = WidgetOptions {
            locale: variant.locale,
            require_privacy_consent: variant.privacy_consent,
            share_affordance: variant.share_affordance,
            share_url,
            initial_signup_count,
        };

        let top = Arc::new(WaitlistWidget::new(
            Slot::Top,
            client.clone(),
            options.clone(),
        ));
        let bottom = variant
            .dual_form
            .then(|| Arc::new(WaitlistWidget::new(Slot::Bottom, client, options)));

        Self {
            variant,
            top,
            bottom,
        }
    }

    pub fn widget(
        &self,
        slot: Slot,
    ) -> Option<&Arc<WaitlistWidget>> {
        match slot {
            Slot::Top => Some(&self.top),
            Slot::Bottom => self.bottom.as_ref(),
        }
    }

    pub fn widgets(&self) -> impl Iterator<Item = &Arc<WaitlistWidget>> {
        std::iter::once(&self.top).chain(self.bottom.as_ref())
    }
}
