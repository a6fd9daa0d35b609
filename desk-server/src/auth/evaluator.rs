//! Permission evaluation
//!
//! Every check resolves to a plain `bool` and fails closed: invalid input,
//! unknown or inactive users and store failures all deny. Failures are
//! logged here and never reach the caller.
//!
//! Administrators (role `admin`, any case) are granted without consulting
//! their permission set.

use std::sync::Arc;

use shared::SUPER_PERMISSION;

use crate::db::{PermissionSet, RepoError, UserStore};
use crate::security_log;

use super::permissions::is_admin_role;

/// Parse a user id from untrusted text; only positive integers are valid
pub fn parse_user_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// Resolved access of a single user
enum Access {
    Admin,
    Granted(PermissionSet),
}

#[derive(Clone)]
pub struct PermissionEvaluator {
    store: Arc<dyn UserStore>,
}

impl std::fmt::Debug for PermissionEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionEvaluator").finish_non_exhaustive()
    }
}

impl PermissionEvaluator {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Whether the user holds `permission`
    pub async fn check_user_permission(&self, user_id: i64, permission: &str) -> bool {
        let permission = permission.trim();
        let granted = if user_id <= 0 {
            tracing::warn!(user_id, permission, "Permission check with invalid user id");
            false
        } else if permission.is_empty() {
            tracing::warn!(user_id, "Permission check with empty permission code");
            false
        } else {
            match self.resolve(user_id).await {
                Some(Access::Admin) => true,
                Some(Access::Granted(set)) => set.grants(permission),
                None => false,
            }
        };

        if !granted {
            security_log!("WARN", "permission_denied", user_id = user_id, permission = permission);
        }
        granted
    }

    /// Whether the user holds at least one of `permissions`
    ///
    /// Administrators pass regardless of the list; for everyone else an
    /// empty list denies.
    pub async fn check_user_has_any_permission<S: AsRef<str>>(
        &self,
        user_id: i64,
        permissions: &[S],
    ) -> bool {
        let granted = match self.resolve_checked(user_id).await {
            Some(Access::Admin) => true,
            Some(Access::Granted(set)) => permissions
                .iter()
                .map(|p| p.as_ref().trim())
                .any(|p| !p.is_empty() && set.grants(p)),
            None => false,
        };

        if !granted {
            security_log!(
                "WARN",
                "permission_denied",
                user_id = user_id,
                any_of = join_codes(permissions)
            );
        }
        granted
    }

    /// Whether the user holds every one of `permissions`
    ///
    /// Administrators pass. A non-admin is denied for an empty list or when
    /// any entry is blank.
    pub async fn check_user_has_all_permissions<S: AsRef<str>>(
        &self,
        user_id: i64,
        permissions: &[S],
    ) -> bool {
        let granted = match self.resolve_checked(user_id).await {
            Some(Access::Admin) => true,
            Some(Access::Granted(set)) => {
                !permissions.is_empty()
                    && permissions
                        .iter()
                        .map(|p| p.as_ref().trim())
                        .all(|p| !p.is_empty() && set.grants(p))
            }
            None => false,
        };

        if !granted {
            security_log!(
                "WARN",
                "permission_denied",
                user_id = user_id,
                all_of = join_codes(permissions)
            );
        }
        granted
    }

    /// Permissions the checks above would honour for this user
    ///
    /// Administrators get the super permission; invalid, unknown and
    /// inactive users, or a failing store, yield an empty set.
    pub async fn effective_permissions(&self, user_id: i64) -> PermissionSet {
        match self.resolve_checked(user_id).await {
            Some(Access::Admin) => PermissionSet::new(vec![SUPER_PERMISSION.to_string()]),
            Some(Access::Granted(set)) => set,
            None => PermissionSet::default(),
        }
    }

    async fn resolve_checked(&self, user_id: i64) -> Option<Access> {
        if user_id <= 0 {
            tracing::warn!(user_id, "Permission check with invalid user id");
            return None;
        }
        self.resolve(user_id).await
    }

    /// Look up role, then (for non-admins) the permission set.
    /// `None` means deny.
    async fn resolve(&self, user_id: i64) -> Option<Access> {
        let user = match self.store.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(user_id, "Permission check for unknown user");
                return None;
            }
            Err(e) => {
                log_lookup_failure(user_id, "find_by_id", &e);
                return None;
            }
        };

        if !user.is_active {
            tracing::warn!(user_id, role = %user.role, "Permission check for inactive user");
            return None;
        }

        if is_admin_role(&user.role) {
            return Some(Access::Admin);
        }

        match self.store.get_user_permissions(user_id).await {
            Ok(set) => Some(Access::Granted(set)),
            Err(e) => {
                log_lookup_failure(user_id, "get_user_permissions", &e);
                None
            }
        }
    }
}

fn join_codes<S: AsRef<str>>(codes: &[S]) -> String {
    codes.iter().map(|c| c.as_ref()).collect::<Vec<_>>().join("|")
}

fn log_lookup_failure(user_id: i64, lookup: &'static str, err: &RepoError) {
    match err {
        RepoError::NotFound(_) => {
            tracing::warn!(user_id, lookup, error = %err, "Permission lookup found nothing");
        }
        _ => {
            tracing::error!(user_id, lookup, error = %err, "Permission lookup failed, denying");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryUserStore, RepoResult, UserRecord};
    use async_trait::async_trait;
    use shared::models::User;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    /// Counts events on the `security` target
    #[derive(Clone, Default)]
    struct SecurityEvents(Arc<AtomicUsize>);

    impl SecurityEvents {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for SecurityEvents {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if event.metadata().target() == "security" {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn user(id: i64, role: &str, extra: &[&str]) -> User {
        User {
            id,
            username: format!("user{id}"),
            role: role.to_string(),
            permissions: extra.iter().map(|s| s.to_string()).collect(),
            is_active: true,
        }
    }

    fn evaluator_with(users: Vec<User>) -> PermissionEvaluator {
        let store = MemoryUserStore::new();
        for u in users {
            store.upsert_user(u);
        }
        PermissionEvaluator::new(Arc::new(store))
    }

    /// Store whose lookups always fail
    struct BrokenStore;

    #[async_trait]
    impl UserStore for BrokenStore {
        async fn find_by_id(&self, _user_id: i64) -> RepoResult<Option<UserRecord>> {
            Err(RepoError::Unavailable("connection refused".into()))
        }

        async fn get_user_permissions(&self, _user_id: i64) -> RepoResult<PermissionSet> {
            Err(RepoError::Unavailable("connection refused".into()))
        }
    }

    /// Role lookup works, permission lookup fails
    struct PermissionsDown;

    #[async_trait]
    impl UserStore for PermissionsDown {
        async fn find_by_id(&self, user_id: i64) -> RepoResult<Option<UserRecord>> {
            let role = if user_id == 1 { "Admin" } else { "staff" };
            Ok(Some(UserRecord {
                id: user_id,
                role: role.to_string(),
                is_active: true,
            }))
        }

        async fn get_user_permissions(&self, _user_id: i64) -> RepoResult<PermissionSet> {
            Err(RepoError::Database("timeout".into()))
        }
    }

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("42"), Some(42));
        assert_eq!(parse_user_id(" 7 "), Some(7));
        assert_eq!(parse_user_id("0"), None);
        assert_eq!(parse_user_id("-5"), None);
        assert_eq!(parse_user_id("abc"), None);
        assert_eq!(parse_user_id(""), None);
    }

    #[tokio::test]
    async fn test_invalid_input_denies() {
        let ev = evaluator_with(vec![user(1, "admin", &[]), user(2, "staff", &[])]);

        assert!(!ev.check_user_permission(0, "customers:view").await);
        assert!(!ev.check_user_permission(-5, "customers:view").await);
        assert!(!ev.check_user_permission(2, "").await);
        assert!(!ev.check_user_permission(2, "   ").await);
        // even an admin needs a code to check
        assert!(!ev.check_user_permission(1, "").await);
    }

    #[tokio::test]
    async fn test_single_permission() {
        let ev = evaluator_with(vec![user(2, "staff", &["statistics:view"])]);

        assert!(ev.check_user_permission(2, "customers:view").await);
        assert!(ev.check_user_permission(2, "statistics:view").await);
        assert!(!ev.check_user_permission(2, "customers:manage").await);
        assert!(!ev.check_user_permission(99, "customers:view").await);
    }

    #[tokio::test]
    async fn test_store_failure_denies() {
        let ev = PermissionEvaluator::new(Arc::new(BrokenStore));
        assert!(!ev.check_user_permission(1, "customers:view").await);
        assert!(!ev.check_user_has_any_permission(1, &["customers:view"]).await);
        assert!(!ev.check_user_has_all_permissions(1, &["customers:view"]).await);
    }

    #[tokio::test]
    async fn test_permission_lookup_failure_denies_non_admin_only() {
        let ev = PermissionEvaluator::new(Arc::new(PermissionsDown));
        // admin never reaches the failing permission lookup
        assert!(ev.check_user_permission(1, "customers:view").await);
        assert!(!ev.check_user_permission(2, "customers:view").await);
    }

    #[tokio::test]
    async fn test_admin_bypass_any_case() {
        let ev = evaluator_with(vec![
            user(1, "ADMIN", &[]),
            user(2, "Admin", &[]),
        ]);
        let empty: [&str; 0] = [];

        assert!(ev.check_user_has_any_permission(1, &["does:not:exist"]).await);
        assert!(ev.check_user_has_any_permission(2, &empty).await);
        assert!(ev.check_user_has_any_permission(2, &[""]).await);
        assert!(ev.check_user_has_all_permissions(1, &["x:y", "z:w"]).await);
    }

    #[tokio::test]
    async fn test_any_and_all() {
        let ev = evaluator_with(vec![user(3, "staff", &[])]);
        let empty: [&str; 0] = [];

        assert!(ev.check_user_has_any_permission(3, &["settings:manage", "requests:view"]).await);
        assert!(!ev.check_user_has_any_permission(3, &["settings:manage", "users:manage"]).await);
        assert!(!ev.check_user_has_any_permission(3, &empty).await);

        assert!(ev.check_user_has_all_permissions(3, &["customers:view", "requests:view"]).await);
        assert!(!ev.check_user_has_all_permissions(3, &["customers:view", "settings:manage"]).await);
        assert!(!ev.check_user_has_all_permissions(3, &["customers:view", ""]).await);
        assert!(!ev.check_user_has_all_permissions(3, &empty).await);
    }

    #[tokio::test]
    async fn test_inactive_user_denied() {
        let mut admin = user(1, "admin", &[]);
        admin.is_active = false;
        let ev = evaluator_with(vec![admin]);

        assert!(!ev.check_user_permission(1, "customers:view").await);
        assert!(!ev.check_user_has_any_permission(1, &["customers:view"]).await);
    }

    #[tokio::test]
    async fn test_owned_strings_accepted() {
        let ev = evaluator_with(vec![user(4, "manager", &[])]);
        let requested = vec!["requests:manage".to_string()];
        assert!(ev.check_user_has_all_permissions(4, &requested).await);
    }

    #[tokio::test]
    async fn test_each_denial_logged_once() {
        let events = SecurityEvents::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(events.clone()));
        let ev = evaluator_with(vec![user(3, "staff", &[])]);

        assert!(!ev.check_user_permission(3, "settings:manage").await);
        assert_eq!(events.count(), 1);
        assert!(!ev.check_user_has_any_permission(3, &["settings:manage"]).await);
        assert_eq!(events.count(), 2);
        assert!(!ev.check_user_has_all_permissions(3, &["customers:view", "settings:manage"]).await);
        assert_eq!(events.count(), 3);
        assert!(!ev.check_user_permission(0, "customers:view").await);
        assert_eq!(events.count(), 4);

        // grants stay quiet
        assert!(ev.check_user_permission(3, "customers:view").await);
        assert!(ev.check_user_has_any_permission(3, &["requests:view"]).await);
        assert_eq!(events.count(), 4);
    }

    #[tokio::test]
    async fn test_effective_permissions() {
        let mut former = user(5, "manager", &[]);
        former.is_active = false;
        let ev = evaluator_with(vec![
            user(1, "Admin", &[]),
            user(3, "staff", &["statistics:view"]),
            former,
        ]);

        assert_eq!(ev.effective_permissions(1).await.permissions, vec!["all"]);

        let staff = ev.effective_permissions(3).await;
        assert!(staff.grants("customers:view"));
        assert!(staff.grants("statistics:view"));

        assert!(ev.effective_permissions(5).await.is_empty());
        assert!(ev.effective_permissions(99).await.is_empty());
        assert!(ev.effective_permissions(0).await.is_empty());

        let broken = PermissionEvaluator::new(Arc::new(BrokenStore));
        assert!(broken.effective_permissions(1).await.is_empty());
    }
}
