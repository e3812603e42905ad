//! Composable authorization guards.
//!
//! A guard inspects the caller and the target id, fetches whatever entity
//! it needs to authorize against, and either lets the request continue or
//! fails with a typed error. Guards run strictly before the handler body,
//! in declared order; the first failure short-circuits, so no handler side
//! effects are visible from a rejected request.
//!
//! Guards are stateless values, reusable across view descriptors.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use snapdex_core::types::DbId;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// A reusable request guard. The id is the path parameter of the guarded
/// route (`None` on collection-scoped routes).
pub type Guard = Arc<
    dyn Fn(AppState, AuthUser, Option<DbId>) -> BoxFuture<'static, Result<(), AppError>>
        + Send
        + Sync,
>;

/// Wrap an async closure as a [`Guard`].
pub fn guard<F, Fut>(f: F) -> Guard
where
    F: Fn(AppState, AuthUser, Option<DbId>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), AppError>> + Send + 'static,
{
    Arc::new(move |state, auth, id| Box::pin(f(state, auth, id)))
}

/// Run `guards` in declared order, short-circuiting on the first failure.
pub async fn run_guards(
    guards: &[Guard],
    state: &AppState,
    auth: &AuthUser,
    id: Option<DbId>,
) -> Result<(), AppError> {
    for guard in guards {
        (**guard)(state.clone(), auth.clone(), id).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use snapdex_core::error::CoreError;
    use snapdex_core::notification::MockNotifier;
    use snapdex_storage::MockStorage;
    use uuid::Uuid;

    use crate::auth::jwt::JwtConfig;
    use crate::config::ServerConfig;
    use snapdex_storage::StorageConfig;

    use super::*;

    /// State whose pool never connects; these guards never touch it.
    fn test_state() -> AppState {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://guard-test@localhost/guard-test")
            .expect("lazy pool should build");
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
            jwt: JwtConfig {
                secret: "guard-test-secret".to_string(),
                access_token_expiry_mins: 15,
                refresh_token_expiry_days: 7,
            },
            storage: StorageConfig {
                bucket: "test".to_string(),
                region: "eu-west-1".to_string(),
                endpoint_url: None,
                access_key_id: "test".to_string(),
                secret_access_key: "test".to_string(),
                url_expiry_secs: 3600,
            },
        };
        AppState {
            pool,
            config: std::sync::Arc::new(config),
            storage: std::sync::Arc::new(MockStorage::new()),
            notifier: std::sync::Arc::new(MockNotifier::new()),
        }
    }

    fn caller() -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn empty_chain_passes() {
        let result = run_guards(&[], &test_state(), &caller(), None).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn guards_run_in_declared_order_and_short_circuit() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let counting = guard(|_state, _auth, _id| async {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let failing = guard(|_state, _auth, _id| async {
            Err(AppError::Core(CoreError::Forbidden("nope".into())))
        });
        let unreachable = guard(|_state, _auth, _id| async {
            // Must never run: the failing guard before it short-circuits.
            CALLS.fetch_add(100, Ordering::SeqCst);
            Ok(())
        });

        let chain = vec![counting, failing, unreachable];
        let result = run_guards(&chain, &test_state(), &caller(), None).await;

        assert!(result.is_err());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn guards_are_reusable_across_chains() {
        let shared = guard(|_state, _auth, _id| async { Ok(()) });
        let first_chain = vec![Arc::clone(&shared)];
        let second_chain = vec![Arc::clone(&shared), shared];

        assert!(run_guards(&first_chain, &test_state(), &caller(), None)
            .await
            .is_ok());
        assert!(run_guards(&second_chain, &test_state(), &caller(), None)
            .await
            .is_ok());
    }
}
