//! # Application State
//!
//! In-memory stores and shared configuration for the API.
//!
//! The stores are the source of truth at request time. When a Postgres pool
//! is configured, writes go through to the database and the stores are
//! hydrated from it at startup; when it is not, the API runs memory-only
//! and state does not survive restarts.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use sqlx::PgPool;

use legitech_advisor::GeminiClient;
use legitech_auth::SecretKey;
use legitech_core::{Email, LawId, Role, UserId};
use legitech_entitlement::Membership;
use legitech_laws::{derive_view, FilteredView, Law, LawAnalysis, LawBook, NavTab};

/// Server configuration. `SecretKey` redacts itself, so deriving `Debug`
/// here does not leak the signing secret into logs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// JWT signing secret. Required; there is no built-in default.
    pub jwt_secret: SecretKey,
}

/// A stored user account. The password hash never leaves this struct; the
/// public representation is built by the auth routes.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Thread-safe user store keyed by id, with a secondary email index.
///
/// The email index holds normalized addresses, so duplicate detection is
/// case-insensitive for free.
#[derive(Clone, Default)]
pub struct UserStore {
    inner: Arc<RwLock<UserIndex>>,
}

#[derive(Default)]
struct UserIndex {
    by_id: HashMap<UserId, UserRecord>,
    by_email: HashMap<String, UserId>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new user. Returns `false` (and stores nothing) if the email
    /// is already registered.
    pub fn insert(&self, record: UserRecord) -> bool {
        let mut index = self.inner.write();
        if index.by_email.contains_key(record.email.as_str()) {
            return false;
        }
        index
            .by_email
            .insert(record.email.as_str().to_string(), record.id);
        index.by_id.insert(record.id, record);
        true
    }

    pub fn get(&self, id: &UserId) -> Option<UserRecord> {
        self.inner.read().by_id.get(id).cloned()
    }

    pub fn find_by_email(&self, email: &Email) -> Option<UserRecord> {
        let index = self.inner.read();
        let id = index.by_email.get(email.as_str())?;
        index.by_id.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().by_id.is_empty()
    }

    /// Replace the store contents with rows loaded from the database.
    pub fn hydrate(&self, records: Vec<UserRecord>) {
        let mut index = self.inner.write();
        index.by_id.clear();
        index.by_email.clear();
        for record in records {
            index
                .by_email
                .insert(record.email.as_str().to_string(), record.id);
            index.by_id.insert(record.id, record);
        }
    }
}

/// Thread-safe membership store, one record per user.
#[derive(Clone, Default)]
pub struct MembershipStore {
    inner: Arc<RwLock<HashMap<UserId, Membership>>>,
}

impl MembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the user's membership.
    pub fn upsert(&self, membership: Membership) {
        self.inner.write().insert(membership.user_id, membership);
    }

    pub fn get(&self, user_id: &UserId) -> Option<Membership> {
        self.inner.read().get(user_id).cloned()
    }

    pub fn hydrate(&self, memberships: Vec<Membership>) {
        let mut map = self.inner.write();
        map.clear();
        for membership in memberships {
            map.insert(membership.user_id, membership);
        }
    }
}

/// Thread-safe law book wrapper exposing the derived views.
#[derive(Clone)]
pub struct LawStore {
    inner: Arc<RwLock<LawBook>>,
}

impl LawStore {
    /// Store seeded with the base knowledge set.
    pub fn seeded() -> Self {
        Self {
            inner: Arc::new(RwLock::new(LawBook::seeded(Utc::now()))),
        }
    }

    /// Derive the listing for a tab and search query under a single read
    /// lock, so the figures always match the records they were computed
    /// from.
    pub fn view(&self, tab: NavTab, query: &str) -> FilteredView {
        derive_view(self.inner.read().laws(), tab, query)
    }

    pub fn get(&self, id: &LawId) -> Option<Law> {
        self.inner.read().get(id).cloned()
    }

    pub fn prepend(&self, law: Law) {
        self.inner.write().prepend(law);
    }

    pub fn apply_analysis(&self, id: &LawId, analysis: &LawAnalysis) -> Option<Law> {
        self.inner.write().apply_analysis(id, analysis)
    }
}

/// Shared application state, cheap to clone into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: UserStore,
    pub memberships: MembershipStore,
    pub laws: LawStore,
    /// Postgres pool; `None` means memory-only mode.
    pub db: Option<PgPool>,
    /// Advisory client; `None` means AI endpoints answer 503.
    pub advisor: Option<Arc<GeminiClient>>,
}

impl AppState {
    /// Memory-only state with a seeded law book and no advisor.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            users: UserStore::new(),
            memberships: MembershipStore::new(),
            laws: LawStore::seeded(),
            db: None,
            advisor: None,
        }
    }

    pub fn with_db(mut self, db: Option<PgPool>) -> Self {
        self.db = db;
        self
    }

    pub fn with_advisor(mut self, advisor: Option<GeminiClient>) -> Self {
        self.advisor = advisor.map(Arc::new);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(email: &str) -> UserRecord {
        UserRecord {
            id: UserId::new(),
            name: "Ana".to_string(),
            email: Email::new(email).unwrap(),
            password_hash: "$2b$04$hash".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn user_store_rejects_duplicate_email() {
        let store = UserStore::new();
        assert!(store.insert(sample_user("ana@empresa.mx")));
        assert!(!store.insert(sample_user("ana@empresa.mx")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_detection_is_case_insensitive() {
        let store = UserStore::new();
        assert!(store.insert(sample_user("ana@empresa.mx")));
        // Email normalizes at construction, so this is the same address.
        assert!(!store.insert(sample_user("ANA@Empresa.MX")));
    }

    #[test]
    fn find_by_email_returns_the_record() {
        let store = UserStore::new();
        let user = sample_user("ana@empresa.mx");
        let id = user.id;
        store.insert(user);
        let found = store
            .find_by_email(&Email::new("Ana@Empresa.mx").unwrap())
            .unwrap();
        assert_eq!(found.id, id);
    }

    #[test]
    fn membership_store_upsert_replaces() {
        let store = MembershipStore::new();
        let user_id = UserId::new();
        let now = Utc::now();
        store.upsert(Membership::trial(user_id, now));
        store.upsert(Membership::activate(
            user_id,
            legitech_entitlement::MembershipType::Annual,
            now,
        ));
        let m = store.get(&user_id).unwrap();
        assert_eq!(m.membership_type, legitech_entitlement::MembershipType::Annual);
    }

    #[test]
    fn law_store_is_seeded() {
        let store = LawStore::seeded();
        let view = store.view(NavTab::Monitor, "");
        assert_eq!(view.total, 2);
        assert_eq!(view.compliance_pct, 43);
    }
}
