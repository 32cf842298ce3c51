use super::*;
use letterpad_core::document::SortOrder;
use letterpad_infrastructure::{InMemoryDocumentGateway, StaticAuthService};
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;

// Mock notifier recording every message
#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.messages.lock().unwrap().push(notification);
    }
}

struct Fixture {
    store: SessionStore,
    gateway: Arc<InMemoryDocumentGateway>,
    notifier: Arc<RecordingNotifier>,
}

async fn fixture_with(documents: Vec<Document>) -> Fixture {
    let gateway = Arc::new(InMemoryDocumentGateway::with_documents(documents).await);
    let notifier = Arc::new(RecordingNotifier::default());
    let store = SessionStore::start(
        gateway.clone(),
        Arc::new(StaticAuthService::signed_in(User::new("u1"))),
        notifier.clone(),
    )
    .await;
    Fixture {
        store,
        gateway,
        notifier,
    }
}

async fn fixture() -> Fixture {
    fixture_with(Vec::new()).await
}

fn titles(documents: &[Document]) -> Vec<&str> {
    documents.iter().map(|d| d.title.as_str()).collect()
}

#[tokio::test]
async fn test_start_resolves_user() {
    let f = fixture().await;
    assert_eq!(f.store.current_user().unwrap().id, "u1");
    assert!(f.store.auth_state().borrow().is_signed_in());

    let signed_out = SessionStore::start(
        f.gateway.clone(),
        Arc::new(StaticAuthService::signed_out()),
        f.notifier.clone(),
    )
    .await;
    assert!(signed_out.current_user().is_none());
    assert!(signed_out.list().await.unwrap_err().is_unauthorized());
    assert_eq!(f.gateway.list_count(), 0, "no gateway call without a user");
}

#[tokio::test]
async fn test_list_is_cached_until_invalidated() {
    let f = fixture_with(vec![Document::new("a", ""), Document::new("b", "")]).await;

    assert_eq!(titles(&f.store.list().await.unwrap()), vec!["a", "b"]);
    f.store.list().await.unwrap();
    assert_eq!(f.gateway.list_count(), 1);

    f.store.invalidate().await;
    assert!(!f.store.status().await.loaded);
    f.store.list().await.unwrap();
    assert_eq!(f.gateway.list_count(), 2);

    f.store.refresh().await.unwrap();
    assert_eq!(f.gateway.list_count(), 3);
}

#[tokio::test]
async fn test_save_creates_then_relists() {
    let f = fixture().await;
    f.store.list().await.unwrap();

    let saved = f
        .store
        .save(&SaveRequest::new(None, "Hi", "world"))
        .await
        .unwrap();
    assert!(saved.id.is_some());
    assert_eq!(f.gateway.list_count(), 2, "save re-lists the collection");

    let collection = f.store.list().await.unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection[0].id, saved.id);
    assert_eq!(f.notifier.messages(), vec!["Letter saved successfully"]);
}

#[tokio::test]
async fn test_update_replaces_entry_without_duplicates() {
    let f = fixture().await;
    let created = f
        .store
        .save(&SaveRequest::new(None, "Hi", "v1"))
        .await
        .unwrap();
    f.store
        .save(&SaveRequest::new(created.id.clone(), "Hi", "v2"))
        .await
        .unwrap();

    let collection = f.store.list().await.unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection[0].body, "v2");
}

#[tokio::test]
async fn test_save_blank_title_makes_no_call() {
    let f = fixture().await;
    let err = f
        .store
        .save(&SaveRequest::new(None, "  ", "hello"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(f.gateway.save_count(), 0);
}

// Mock gateway whose list call can be switched to fail
struct FlakyListGateway {
    inner: InMemoryDocumentGateway,
    fail_list: AtomicBool,
}

#[async_trait::async_trait]
impl DocumentGateway for FlakyListGateway {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(LetterError::request_failed("down"));
        }
        self.inner.list_documents().await
    }

    async fn get_document(&self, id: &str) -> Result<Document> {
        self.inner.get_document(id).await
    }

    async fn save_document(&self, request: &SaveRequest) -> Result<Document> {
        self.inner.save_document(request).await
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        self.inner.delete_document(id).await
    }
}

#[tokio::test]
async fn test_relist_failure_does_not_fail_save() {
    let gateway = Arc::new(FlakyListGateway {
        inner: InMemoryDocumentGateway::new(),
        fail_list: AtomicBool::new(false),
    });
    let notifier = Arc::new(RecordingNotifier::default());
    let store = SessionStore::start(
        gateway.clone(),
        Arc::new(StaticAuthService::signed_in(User::new("u1"))),
        notifier.clone(),
    )
    .await;
    store.list().await.unwrap();

    gateway.fail_list.store(true, Ordering::SeqCst);
    let saved = store
        .save(&SaveRequest::new(None, "Hi", "world"))
        .await
        .unwrap();
    assert!(saved.id.is_some());
    assert!(!store.status().await.loaded, "collection is stale");
    assert_eq!(
        notifier.messages(),
        vec!["Failed to load letters", "Letter saved successfully"]
    );

    gateway.fail_list.store(false, Ordering::SeqCst);
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_signs_out_and_keeps_collection() {
    let f = fixture_with(vec![Document::new("a", "")]).await;
    let before = f.store.list().await.unwrap();
    let mut auth = f.store.auth_state();

    f.gateway.set_authorized(false);
    let err = f
        .store
        .save(&SaveRequest::new(None, "Hi", "world"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());

    assert!(auth.has_changed().unwrap());
    assert_eq!(*auth.borrow_and_update(), AuthState::SignedOut);
    assert_eq!(
        f.notifier.messages(),
        vec!["Session expired. Please log in again."]
    );
    assert_eq!(f.store.query(&CollectionQuery::new()).await, before);

    // Signed out: later calls never reach the gateway
    let saves = f.gateway.save_count();
    assert!(f.store.save(&SaveRequest::new(None, "Hi", "")).await.is_err());
    assert_eq!(f.gateway.save_count(), saves);
}

#[tokio::test]
async fn test_get_reports_not_found() {
    let f = fixture().await;
    let err = f.store.get("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(f.notifier.messages(), vec!["Letter not found"]);
    assert_eq!(f.store.status().await.last_error, Some(err));
}

#[tokio::test]
async fn test_get_without_prior_list() {
    let f = fixture().await;
    let doc = f.gateway.insert(Document::new("direct", "x")).await;
    let fetched = f.store.get(doc.id.as_deref().unwrap()).await.unwrap();
    assert_eq!(fetched.title, "direct");
    assert_eq!(f.gateway.list_count(), 0);
}

#[tokio::test]
async fn test_delete_removes_exactly_one() {
    for size in 1..=4 {
        let docs = (0..size).map(|i| Document::new(format!("d{i}"), "")).collect();
        let f = fixture_with(docs).await;
        let before = f.store.list().await.unwrap();
        let victim = before[size / 2].id.clone().unwrap();

        assert!(f.store.delete(&victim).await);

        let after = f.store.query(&CollectionQuery::new().with_order(SortOrder::Asc)).await;
        assert_eq!(after.len(), size - 1);
        assert!(after.iter().all(|d| d.id.as_deref() != Some(victim.as_str())));
        let expected: Vec<&Document> = before
            .iter()
            .filter(|d| d.id.as_deref() != Some(victim.as_str()))
            .collect();
        let remaining = f.store.list().await.unwrap();
        assert_eq!(remaining.iter().collect::<Vec<_>>(), expected);
    }
}

// Mock gateway whose list call takes its snapshot, then waits on a gate
struct SlowListGateway {
    inner: InMemoryDocumentGateway,
    gate: tokio::sync::Mutex<()>,
    snapshots: AtomicUsize,
}

#[async_trait::async_trait]
impl DocumentGateway for SlowListGateway {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        let snapshot = self.inner.list_documents().await;
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        let _open = self.gate.lock().await;
        snapshot
    }

    async fn get_document(&self, id: &str) -> Result<Document> {
        self.inner.get_document(id).await
    }

    async fn save_document(&self, request: &SaveRequest) -> Result<Document> {
        self.inner.save_document(request).await
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        self.inner.delete_document(id).await
    }
}

#[tokio::test]
async fn test_relist_overlapping_delete_keeps_entry_deleted() {
    let inner = InMemoryDocumentGateway::new();
    let old_id = inner.insert(Document::new("old", "")).await.id.unwrap();
    let gateway = Arc::new(SlowListGateway {
        inner,
        gate: tokio::sync::Mutex::new(()),
        snapshots: AtomicUsize::new(0),
    });
    let store = Arc::new(
        SessionStore::start(
            gateway.clone(),
            Arc::new(StaticAuthService::signed_in(User::new("u1"))),
            Arc::new(RecordingNotifier::default()),
        )
        .await,
    );

    let hold = gateway.gate.lock().await;
    let saving = tokio::spawn({
        let store = store.clone();
        async move { store.save(&SaveRequest::new(None, "new", "")).await }
    });
    // Wait until the re-list has taken its snapshot containing "old"
    while gateway.snapshots.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    assert!(store.delete(&old_id).await);
    drop(hold);
    saving.await.unwrap().unwrap();

    let collection = store.query(&CollectionQuery::new()).await;
    assert_eq!(titles(&collection), vec!["new"]);
    assert_eq!(titles(&store.list().await.unwrap()), vec!["new"]);
}

#[tokio::test]
async fn test_delete_failure_returns_false() {
    let f = fixture_with(vec![Document::new("a", "")]).await;
    let before = f.store.list().await.unwrap();
    let id = before[0].id.clone().unwrap();

    f.gateway.fail_next(LetterError::request_failed("down")).await;
    assert!(!f.store.delete(&id).await);
    assert_eq!(f.store.list().await.unwrap(), before);
    assert_eq!(f.notifier.messages(), vec!["Failed to delete letter"]);
}

#[tokio::test]
async fn test_list_failure_notifies() {
    let f = fixture().await;
    f.gateway.fail_next(LetterError::request_failed("down")).await;
    assert!(f.store.list().await.is_err());
    assert_eq!(f.notifier.messages(), vec!["Failed to load letters"]);

    let status = f.store.status().await;
    assert!(!status.loading);
    assert!(!status.loaded);
    assert!(status.last_error.unwrap().is_request_failed());
}

#[tokio::test]
async fn test_query_filters_cached_collection() {
    let f = fixture_with(vec![
        Document::new("To Ann", "<p>thanks</p>"),
        Document::new("To Bob", "<p>sorry</p>"),
    ])
    .await;
    f.store.list().await.unwrap();

    let hits = f
        .store
        .query(&CollectionQuery::new().with_search("THANKS"))
        .await;
    assert_eq!(titles(&hits), vec!["To Ann"]);
}

#[tokio::test]
async fn test_dispose_rejects_calls() {
    let f = fixture_with(vec![Document::new("a", "")]).await;
    f.store.list().await.unwrap();

    f.store.dispose().await;
    assert!(f.store.is_disposed());
    assert!(f.store.current_user().is_none());
    assert!(f.store.query(&CollectionQuery::new()).await.is_empty());
    assert!(!f.store.delete("a").await);
    assert!(f.store.list().await.unwrap_err().is_unauthorized());
}
