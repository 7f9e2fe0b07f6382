use std::time::Duration;

use super::*;
use spyweb_protocols::{
    Command, ElementKind, MaskSettings, MaskSpec, Response, Scope, UndoRedoState,
};
use spyweb_store::MemoryStorage;

use crate::artifact::{EARLY_HIDE_STYLE_ID, MASKED_CLASS};
use crate::render::MaskRenderer;

const DOMAIN: &str = "example.com";

struct Page {
    doc: Document,
    email: NodeId,
    card: NodeId,
    card_text: NodeId,
}

fn page() -> Page {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let form = doc.create_element("form");
    let email = doc.create_element("input");
    doc.set_attribute(email, "id", "email");
    let card = doc.create_element("div");
    doc.set_attribute(card, "class", "card");
    let card_text = doc.create_text("Balance: 1,024");
    doc.append_child(body, form);
    doc.append_child(form, email);
    doc.append_child(body, card);
    doc.append_child(card, card_text);
    doc.take_mutations();
    Page {
        doc,
        email,
        card,
        card_text,
    }
}

fn observer(doc: Document, storage: Arc<MemoryStorage>) -> PageObserver {
    let config = Config::default();
    PageObserver::new(
        doc,
        DOMAIN,
        MaskStore::new(storage.clone(), config.storage.namespace.clone()),
        SettingsStore::new(storage, config.storage.settings_key.clone()),
        MaskRenderer::with_default_loader(config.render.clone()),
        &config,
    )
}

fn store(storage: &Arc<MemoryStorage>) -> MaskStore {
    MaskStore::new(storage.clone(), "maskedElements")
}

fn record(selector: &str, spec: MaskSpec) -> MaskRecord {
    MaskRecord::new(selector, DOMAIN, spec, ElementKind::Generic, Scope::Current)
}

fn add_secret(doc: &mut Document) {
    let body = doc.body().unwrap();
    let p = doc.create_element("p");
    doc.set_attribute(p, "class", "secret");
    doc.append_child(body, p);
}

fn masked_count(doc: &Document) -> usize {
    doc.query_selector_all(".spyweb-masked").unwrap().len()
}

async fn inspecting(storage: Arc<MemoryStorage>) -> (PageObserver, Page) {
    let page = page();
    let mut observer = observer(page.doc.clone(), storage);
    observer.initialize().await.unwrap();
    observer
        .handle_command(Command::StartInspection { settings: None })
        .await;
    (observer, page)
}

#[test]
fn test_hostname() {
    assert_eq!(hostname("https://mail.example.com/inbox?x=1").unwrap(), "mail.example.com");
    assert!(matches!(
        hostname("not a url"),
        Err(ObserverError::InvalidUrl { .. })
    ));
    assert!(hostname("data:text/plain,hi").is_err());
}

#[tokio::test]
async fn test_initialize_applies_stored_records() {
    let storage = Arc::new(MemoryStorage::new());
    let masks = store(&storage);
    masks.add(DOMAIN, record(".card", MaskSpec::default())).await.unwrap();
    masks.add(DOMAIN, record("#missing", MaskSpec::default())).await.unwrap();
    masks.add(DOMAIN, record("div[", MaskSpec::default())).await.unwrap();
    let mut global = record("#email", MaskSpec::blur());
    global.domain = "other.org".to_string();
    global.scope = Scope::All;
    masks.add("other.org", global).await.unwrap();

    let page = page();
    let mut observer = observer(page.doc, storage);
    let applied = observer.initialize().await.unwrap();

    assert_eq!(applied, 2);
    assert_eq!(observer.apply_passes(), 1);
    let doc = observer.document();
    assert!(doc.has_class(page.card, MASKED_CLASS));
    assert!(doc.has_class(page.email, MASKED_CLASS));
    assert!(doc.get_element_by_id(EARLY_HIDE_STYLE_ID).is_none());
    assert!(!doc.has_pending_mutations());
}

#[tokio::test]
async fn test_early_hide_injects_stylesheet() {
    let storage = Arc::new(MemoryStorage::new());
    store(&storage)
        .add(DOMAIN, record(".card", MaskSpec::default()))
        .await
        .unwrap();

    let mut observer = observer(page().doc, storage);
    assert!(observer.early_hide().await);
    let style = observer
        .document()
        .get_element_by_id(EARLY_HIDE_STYLE_ID)
        .unwrap();
    assert!(observer.document().text_content(style).contains(".card"));
}

#[tokio::test]
async fn test_unavailable_storage_leaves_page_unmasked() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set_available(false);

    let mut observer = observer(page().doc, storage);
    assert!(!observer.early_hide().await);
    assert!(matches!(
        observer.initialize().await,
        Err(ObserverError::Store(_))
    ));
    assert_eq!(masked_count(observer.document()), 0);
    assert!(observer.document().get_element_by_id(EARLY_HIDE_STYLE_ID).is_none());
}

#[tokio::test]
async fn test_click_requires_inspection() {
    let storage = Arc::new(MemoryStorage::new());
    let page = page();
    let mut observer = observer(page.doc, storage.clone());
    observer.initialize().await.unwrap();

    assert_eq!(observer.click(page.card).await.unwrap(), None);
    assert!(store(&storage).all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_click_commits_then_updates() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut observer, page) = inspecting(storage.clone()).await;

    let outcome = observer.click(page.card_text).await.unwrap().unwrap();
    assert_eq!(outcome.selector, "html body div.card");
    assert!(!outcome.updated);
    assert!(observer.document().has_class(page.card, MASKED_CLASS));
    assert!(observer.session().history.can_undo());

    // Clicking the mask re-masks the same element with the new recipe.
    observer
        .handle_command(Command::UpdateSettings {
            settings: MaskSettings::new(MaskSpec::color(Some("#00ff00")), Scope::Current),
        })
        .await;
    let mask = observer.document().query_selector(".spyweb-mask").unwrap().unwrap();
    let outcome = observer.click(mask).await.unwrap().unwrap();
    assert_eq!(outcome.selector, "html body div.card");
    assert!(outcome.updated);

    let records = store(&storage).records_for(DOMAIN).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].mask_spec.explicit_color(), Some("#00ff00"));
    assert_eq!(masked_count(observer.document()), 1);
}

#[tokio::test]
async fn test_click_on_input_uses_id() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut observer, page) = inspecting(storage.clone()).await;

    let outcome = observer.click(page.email).await.unwrap().unwrap();
    assert_eq!(outcome.selector, "#email");
    let records = store(&storage).records_for(DOMAIN).await.unwrap();
    assert!(records[0].target_kind.is_input);
}

#[tokio::test]
async fn test_inherit_click_captures_style() {
    let storage = Arc::new(MemoryStorage::new());
    let page = page();
    let mut doc = page.doc;
    doc.set_computed_style(page.card, "font-size", "21px");
    let mut observer = observer(doc, storage.clone());
    observer.initialize().await.unwrap();
    observer
        .handle_command(Command::StartInspection {
            settings: Some(MaskSettings::new(MaskSpec::inherit(), Scope::All)),
        })
        .await;

    observer.click(page.card).await.unwrap().unwrap();
    let records = store(&storage).records_for(DOMAIN).await.unwrap();
    assert_eq!(records[0].scope, Scope::All);
    assert_eq!(records[0].original_style.as_ref().unwrap().font_size, "21px");
}

#[tokio::test]
async fn test_undo_on_empty_stack() {
    let storage = Arc::new(MemoryStorage::new());
    store(&storage)
        .add(DOMAIN, record(".card", MaskSpec::default()))
        .await
        .unwrap();
    let mut observer = observer(page().doc, storage.clone());
    observer.initialize().await.unwrap();
    let before = store(&storage).all().await.unwrap();

    let response = observer.handle_command(Command::Undo).await;
    assert_eq!(
        response,
        Response::UndoRedo(UndoRedoState {
            success: false,
            can_undo: false,
            can_redo: false,
        })
    );
    assert_eq!(store(&storage).all().await.unwrap(), before);
}

#[tokio::test]
async fn test_undo_redo_add() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut observer, page) = inspecting(storage.clone()).await;
    observer.click(page.card).await.unwrap().unwrap();
    let original = store(&storage).records_for(DOMAIN).await.unwrap()[0].clone();

    let state = observer.undo().await;
    assert!(state.success && !state.can_undo && state.can_redo);
    assert!(store(&storage).load(DOMAIN).await.unwrap().is_empty());
    assert!(!observer.document().has_class(page.card, MASKED_CLASS));
    assert_eq!(observer.document().children(page.card), &[page.card_text]);

    let state = observer.redo().await;
    assert!(state.success && state.can_undo && !state.can_redo);
    assert_eq!(store(&storage).load(DOMAIN).await.unwrap(), vec![original]);
    assert!(observer.document().has_class(page.card, MASKED_CLASS));

    let state = observer.redo().await;
    assert!(!state.success);
}

#[tokio::test]
async fn test_undo_update_restores_previous_spec() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut observer, page) = inspecting(storage.clone()).await;
    observer.click(page.card).await.unwrap();
    observer
        .handle_command(Command::UpdateSettings {
            settings: MaskSettings::new(MaskSpec::blur(), Scope::Current),
        })
        .await;
    observer.click(page.card).await.unwrap();

    observer.undo().await;
    let records = store(&storage).records_for(DOMAIN).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].mask_spec.visual_mode, VisualMode::Text);
    assert!(observer.session().history.can_undo());
}

#[tokio::test]
async fn test_undo_failure_keeps_entry() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut observer, page) = inspecting(storage.clone()).await;
    observer.click(page.card).await.unwrap();

    storage.set_available(false);
    let state = observer.undo().await;
    assert!(!state.success);
    assert!(state.can_undo);
    assert!(!state.can_redo);
}

#[tokio::test]
async fn test_refresh_clears_history_on_outside_edits() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut observer, page) = inspecting(storage.clone()).await;
    observer.click(page.card).await.unwrap();

    // Unchanged store keeps history.
    let response = observer.handle_command(Command::RefreshMasks).await;
    assert!(response.is_success());
    assert!(observer.session().history.can_undo());

    store(&storage)
        .add(DOMAIN, record("#email", MaskSpec::default()))
        .await
        .unwrap();
    observer.handle_command(Command::RefreshMasks).await;
    assert!(!observer.session().history.can_undo());
    assert_eq!(masked_count(observer.document()), 2);
}

#[tokio::test]
async fn test_clear_masks_command() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut observer, page) = inspecting(storage.clone()).await;
    observer.click(page.card).await.unwrap();
    let mut global = record("#email", MaskSpec::default());
    global.domain = "other.org".to_string();
    store(&storage).add("other.org", global).await.unwrap();

    let response = observer
        .handle_command(Command::ClearMasks { all: false })
        .await;
    assert!(response.is_success());
    assert_eq!(masked_count(observer.document()), 0);
    assert!(!observer.session().history.can_undo());
    assert_eq!(store(&storage).all().await.unwrap().len(), 1);

    observer.handle_command(Command::ClearMasks { all: true }).await;
    assert!(store(&storage).all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_hover_highlight() {
    let storage = Arc::new(MemoryStorage::new());
    let page = page();
    let mut observer = observer(page.doc, storage);
    observer.initialize().await.unwrap();

    assert_eq!(observer.hover(page.card_text), None);

    observer
        .handle_command(Command::StartInspection { settings: None })
        .await;
    assert_eq!(observer.hover(page.card_text), Some(page.card));
    let overlay = observer
        .document()
        .get_element_by_id(HIGHLIGHT_OVERLAY_ID)
        .unwrap();
    assert_eq!(observer.document().style(overlay, "display"), Some("block"));
    assert_eq!(observer.hover(overlay), None);

    observer.handle_command(Command::StopInspection).await;
    assert_eq!(observer.document().style(overlay, "display"), Some("none"));
    assert_eq!(observer.session().highlighted, None);
    let response = observer
        .handle_command(Command::GetInspectionState)
        .await;
    assert_eq!(response, Response::Inspection { inspecting: false });
}

#[tokio::test]
async fn test_navigate_resets_session() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut observer, page) = inspecting(storage.clone()).await;
    observer.click(page.card).await.unwrap();

    observer.navigate("https://other.org/home").await.unwrap();
    assert_eq!(observer.domain(), "other.org");
    assert!(!observer.session().inspecting);
    assert!(!observer.session().history.can_undo());
    assert_eq!(masked_count(observer.document()), 0);

    assert!(observer.navigate("nowhere").await.is_err());
    assert_eq!(observer.domain(), "other.org");
}

#[tokio::test(start_paused = true)]
async fn test_mutations_are_debounced() {
    let storage = Arc::new(MemoryStorage::new());
    store(&storage)
        .add(DOMAIN, record(".secret", MaskSpec::default()))
        .await
        .unwrap();
    let mut observer = observer(page().doc, storage);
    observer.initialize().await.unwrap();

    let (handle, events) = PageHandle::channel(16);
    let cancel = CancellationToken::new();
    let task = tokio::spawn(observer.run(events, cancel.clone()));

    handle.mutate(add_secret).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    handle.mutate(add_secret).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    // 600ms after the first edit but only 300ms after the second.
    assert_eq!(handle.read(masked_count).await.unwrap(), 0);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(handle.read(masked_count).await.unwrap(), 2);

    cancel.cancel();
    let observer = task.await.unwrap();
    assert_eq!(observer.apply_passes(), 2);
    assert!(!observer.debounce().is_pending());
}

#[tokio::test]
async fn test_handle_round_trip() {
    let storage = Arc::new(MemoryStorage::new());
    let page = page();
    let mut observer = observer(page.doc, storage);
    observer.initialize().await.unwrap();

    let (handle, events) = PageHandle::channel(8);
    let cancel = CancellationToken::new();
    let task = tokio::spawn(observer.run(events, cancel.clone()));

    let response = handle
        .command(Command::StartInspection { settings: None })
        .await
        .unwrap();
    assert!(response.is_success());
    handle.hover(page.card).await.unwrap();
    let outcome = handle.click(page.card).await.unwrap().unwrap();
    assert_eq!(outcome.selector, "html body div.card");
    let response = handle.command(Command::GetUndoRedoState).await.unwrap();
    assert_eq!(
        response,
        Response::UndoRedo(UndoRedoState {
            success: true,
            can_undo: true,
            can_redo: false,
        })
    );
    handle.navigate("https://example.com/next").await.unwrap();

    drop(handle);
    let observer = task.await.unwrap();
    assert!(!observer.session().history.can_undo());
    assert_eq!(masked_count(observer.document()), 1);
}
