//! Page Observer.
//!
//! Owns one page's [`Document`] and [`SessionContext`] and keeps the
//! page's masks in sync with the store:
//!
//! - at load, an early-hide stylesheet covers known selectors until the
//!   real masks are attached;
//! - host DOM changes arm a single-slot [`DebounceTimer`]; when the page
//!   goes quiet every applicable record is applied again;
//! - commands, hover and click events from the UI layer are handled in
//!   arrival order by [`PageObserver::run`].

mod commands;
mod debounce;
pub mod early_hide;
mod events;

use std::sync::Arc;

use spyweb_config::{Config, ObserverConfig};
use spyweb_dom::{Document, NodeId};
use spyweb_protocols::{MaskRecord, Scope, VisualMode};
use spyweb_store::{AddOutcome, KeyValueStorage, MaskStore, SettingsStore};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::artifact::{self, HIGHLIGHT_OVERLAY_ID, MASK_SELECTOR_ATTR, OVERLAY_TAG, is_artifact};
use crate::classify::classify;
use crate::error::ObserverError;
use crate::render::{MaskRenderer, capture_style};
use crate::resolver::resolve;
use crate::session::SessionContext;
use crate::synthesizer::synthesize;

pub use debounce::DebounceTimer;
pub use events::{ClickOutcome, DomEdit, DomRead, PageEvent, PageHandle};

/// Hostname of a page URL.
pub fn hostname(url: &str) -> Result<String, ObserverError> {
    let invalid = |reason: String| ObserverError::InvalidUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| invalid("URL has no host".to_string()))
}

pub struct PageObserver {
    doc: Document,
    session: SessionContext,
    masks: MaskStore,
    settings: SettingsStore,
    renderer: MaskRenderer,
    debounce: DebounceTimer,
    config: ObserverConfig,
    apply_passes: u64,
}

impl PageObserver {
    pub fn new(
        doc: Document,
        domain: impl Into<String>,
        masks: MaskStore,
        settings: SettingsStore,
        renderer: MaskRenderer,
        config: &Config,
    ) -> Self {
        let session = SessionContext::new(domain, Default::default(), config.history.limit);
        Self {
            doc,
            session,
            masks,
            settings,
            renderer,
            debounce: DebounceTimer::new(config.observer.debounce()),
            config: config.observer.clone(),
            apply_passes: 0,
        }
    }

    /// Observer over `storage` with the keys, limits and image loader the
    /// configuration names.
    pub fn from_config(
        doc: Document,
        domain: impl Into<String>,
        storage: Arc<dyn KeyValueStorage>,
        config: &Config,
    ) -> Self {
        let masks = MaskStore::new(storage.clone(), &config.storage.namespace);
        let settings = SettingsStore::new(storage, &config.storage.settings_key);
        let renderer = MaskRenderer::with_default_loader(config.render.clone());
        Self::new(doc, domain, masks, settings, renderer, config)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn domain(&self) -> &str {
        &self.session.domain
    }

    pub fn mask_store(&self) -> &MaskStore {
        &self.masks
    }

    /// Full mask application passes run so far.
    pub fn apply_passes(&self) -> u64 {
        self.apply_passes
    }

    pub fn debounce(&self) -> &DebounceTimer {
        &self.debounce
    }

    /// Page-load pass: early-hide, load settings and records, apply masks.
    ///
    /// Returns the number of elements masked. When the records cannot be
    /// read the early-hide stylesheet is removed again and the page stays
    /// unmasked.
    pub async fn initialize(&mut self) -> Result<usize, ObserverError> {
        if self.config.early_hide {
            self.early_hide().await;
        }

        match self.settings.load().await {
            Ok(settings) => self.session.settings = settings,
            Err(e) => warn!(error = %e, "Failed to load mask settings, using defaults"),
        }

        if let Err(e) = self.reload_records().await {
            early_hide::remove(&mut self.doc);
            self.doc.take_mutations();
            return Err(e);
        }

        let applied = self.apply_all().await;
        info!(
            domain = %self.session.domain,
            records = self.session.records.len(),
            applied,
            "Page masks initialized"
        );
        Ok(applied)
    }

    /// Hide known selectors with a stylesheet. Storage failures are not
    /// fatal here: the page renders unmasked until [`initialize`] finishes.
    ///
    /// [`initialize`]: Self::initialize
    pub async fn early_hide(&mut self) -> bool {
        let injected = match self.masks.load(&self.session.domain).await {
            Ok(records) => early_hide::inject(&mut self.doc, &records).is_some(),
            Err(e) => {
                debug!(error = %e, "Early hide skipped, storage unavailable");
                false
            }
        };
        self.doc.take_mutations();
        injected
    }

    pub async fn reload_records(&mut self) -> Result<(), ObserverError> {
        self.session.records = self.masks.load(&self.session.domain).await?;
        Ok(())
    }

    /// Apply every loaded record to every element its selector matches.
    ///
    /// Records whose selector is invalid or matches nothing are skipped.
    /// Returns the number of elements masked.
    pub async fn apply_all(&mut self) -> usize {
        let records = self.session.records.clone();
        let mut applied = 0;
        for record in &records {
            applied += self.render_record(record, None).await;
        }

        early_hide::remove(&mut self.doc);
        // Our own edits never schedule another pass.
        self.doc.take_mutations();
        self.apply_passes += 1;
        applied
    }

    async fn render_record(&mut self, record: &MaskRecord, target: Option<NodeId>) -> usize {
        let mut elements = match self.doc.query_selector_all(&record.selector) {
            Ok(elements) => elements,
            Err(e) => {
                debug!(selector = %record.selector, error = %e, "Skipping record");
                Vec::new()
            }
        };
        elements.retain(|&el| !is_artifact(&self.doc, el));
        if let Some(target) = target {
            if !elements.contains(&target) {
                elements.push(target);
            }
        }
        if elements.is_empty() {
            debug!(selector = %record.selector, "No element matches record");
            return 0;
        }

        let mut applied = 0;
        for element in elements {
            if self
                .renderer
                .apply(&mut self.doc, element, record)
                .await
                .is_some()
            {
                applied += 1;
            }
        }
        applied
    }

    /// Tear down every mask, reload the records and apply them again.
    async fn rerender(&mut self) -> Result<usize, ObserverError> {
        self.renderer.restore_all(&mut self.doc);
        self.renderer.clear_image_cache();
        self.reload_records().await?;
        Ok(self.apply_all().await)
    }

    /// The element a pointer target stands for, or `None` for engine
    /// artifacts such as the highlight overlay.
    fn pick_target(&self, raw: NodeId) -> Option<NodeId> {
        if let Some(owner) = artifact::mask_owner(&self.doc, raw) {
            return Some(owner);
        }
        if let Some(masked) = artifact::masked_container(&self.doc, raw) {
            return Some(masked);
        }
        if is_artifact(&self.doc, raw) {
            return None;
        }
        let element = resolve(&self.doc, raw);
        if !self.doc.is_element(element) || is_artifact(&self.doc, element) {
            return None;
        }
        Some(element)
    }

    /// Highlight the maskable target under the pointer while inspecting.
    pub fn hover(&mut self, raw: NodeId) -> Option<NodeId> {
        if !self.session.inspecting {
            return None;
        }
        let element = self.pick_target(raw)?;
        if self.session.highlighted != Some(element) {
            self.show_highlight(element);
        }
        Some(element)
    }

    fn show_highlight(&mut self, element: NodeId) {
        let overlay = match self.doc.get_element_by_id(HIGHLIGHT_OVERLAY_ID) {
            Some(overlay) => overlay,
            None => {
                let overlay = self.doc.create_element(OVERLAY_TAG);
                self.doc.set_attribute(overlay, "id", HIGHLIGHT_OVERLAY_ID);
                for (prop, value) in [
                    ("position", "fixed"),
                    ("pointer-events", "none"),
                    ("z-index", "2147483647"),
                    ("border", "2px solid #4a90e2"),
                    ("background-color", "rgba(74, 144, 226, 0.15)"),
                ] {
                    self.doc.set_style(overlay, prop, value);
                }
                let parent = self
                    .doc
                    .body()
                    .or_else(|| self.doc.document_element())
                    .unwrap_or_else(|| self.doc.root());
                self.doc.append_child(parent, overlay);
                overlay
            }
        };

        let rect = self.doc.rect(element);
        self.doc.set_style(overlay, "display", "block");
        self.doc.set_style(overlay, "left", &format!("{}px", rect.x));
        self.doc.set_style(overlay, "top", &format!("{}px", rect.y));
        self.doc.set_style(overlay, "width", &format!("{}px", rect.width));
        self.doc.set_style(overlay, "height", &format!("{}px", rect.height));
        self.doc.set_rect(overlay, rect);
        self.doc.take_mutations();
        self.session.highlighted = Some(element);
    }

    fn hide_highlight(&mut self) {
        if let Some(overlay) = self.doc.get_element_by_id(HIGHLIGHT_OVERLAY_ID) {
            self.doc.set_style(overlay, "display", "none");
        }
        self.session.highlighted = None;
    }

    /// Commit a mask for the element under the pointer.
    ///
    /// Ignored (`Ok(None)`) unless inspecting. The store write is awaited
    /// before the history entry is recorded, so a repeated click on the
    /// same element becomes an update rather than a duplicate.
    pub async fn click(&mut self, raw: NodeId) -> Result<Option<ClickOutcome>, ObserverError> {
        if !self.session.inspecting {
            return Ok(None);
        }
        let Some(element) = self.pick_target(raw) else {
            return Ok(None);
        };

        // Re-masking keeps the selector the element was masked under.
        let selector = match self.doc.attribute(element, MASK_SELECTOR_ATTR) {
            Some(selector) => selector.to_string(),
            None => synthesize(&self.doc, element),
        };
        if selector.is_empty() {
            return Ok(None);
        }

        // A global record owned by another domain is updated there and
        // stays global.
        let domain = self.owner_domain(&selector);
        let settings = self.session.settings.clone();
        let scope = if domain == self.session.domain {
            settings.mask_scope
        } else {
            Scope::All
        };
        let mut record = MaskRecord::new(
            selector.clone(),
            domain.clone(),
            settings.spec,
            classify(&self.doc, element),
            scope,
        );
        if record.mask_spec.visual_mode == VisualMode::Inherit {
            record = record.with_original_style(capture_style(&self.doc, element));
        }

        let updated = match self.masks.add(&domain, record.clone()).await? {
            AddOutcome::Inserted => {
                self.session.history.push_add(&domain, record.clone());
                false
            }
            AddOutcome::Updated { previous } => {
                self.session
                    .history
                    .push_update(&domain, record.clone(), previous);
                true
            }
        };

        if let Err(e) = self.reload_records().await {
            warn!(error = %e, "Failed to reload records after commit");
        }

        self.hide_highlight();
        self.render_record(&record, Some(element)).await;
        self.doc.take_mutations();
        info!(selector = %selector, updated, "Mask committed");
        Ok(Some(ClickOutcome { selector, updated }))
    }

    /// Domain whose stored record carries `selector`: this page's own
    /// record first, then a global record created elsewhere. Falls back to
    /// the page's domain for new selectors.
    fn owner_domain(&self, selector: &str) -> String {
        let current = &self.session.domain;
        let mut owners = self.session.records.iter().filter(|r| r.selector == selector);
        if owners.clone().any(|r| &r.domain == current) {
            return current.clone();
        }
        owners
            .next()
            .map_or_else(|| current.clone(), |r| r.domain.clone())
    }

    /// Switch to another page of the same tab: fresh history, inspection
    /// off, masks reloaded for the new hostname.
    pub async fn navigate(&mut self, url: &str) -> Result<usize, ObserverError> {
        let domain = hostname(url)?;
        self.hide_highlight();
        self.renderer.restore_all(&mut self.doc);
        self.debounce.cancel();
        self.session.reset_for(domain);
        info!(domain = %self.session.domain, "Navigated");
        self.initialize().await
    }

    /// Handle one event.
    pub async fn dispatch(&mut self, event: PageEvent) {
        match event {
            PageEvent::Command { command, reply } => {
                let response = self.handle_command(command).await;
                let _ = reply.send(response);
            }
            PageEvent::Hover { target } => {
                self.hover(target);
            }
            PageEvent::Click { target, reply } => {
                let _ = reply.send(self.click(target).await);
            }
            PageEvent::Mutate(edit) => {
                edit(&mut self.doc);
                if !self.doc.take_mutations().is_empty() {
                    self.debounce.trigger();
                }
            }
            PageEvent::Navigate { url, reply } => {
                let result = self.navigate(&url).await.map(|_| ());
                let _ = reply.send(result);
            }
            PageEvent::Read(read) => read(&self.doc),
        }
    }

    /// Consume events until `cancel` fires or every handle is dropped,
    /// reapplying masks whenever the page has been quiet for the debounce
    /// period after a host mutation. Returns the observer for inspection.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<PageEvent>,
        cancel: CancellationToken,
    ) -> Self {
        info!(domain = %self.session.domain, "Page observer started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.recv() => match event {
                    Some(event) => self.dispatch(event).await,
                    None => break,
                },
                _ = self.debounce.elapsed() => {
                    self.debounce.cancel();
                    let applied = self.apply_all().await;
                    debug!(applied, "Reapplied masks after page mutations");
                }
            }
        }
        info!(domain = %self.session.domain, "Page observer stopped");
        self
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
