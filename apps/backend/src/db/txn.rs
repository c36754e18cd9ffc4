use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use sea_orm::{DatabaseTransaction, TransactionTrait};

use super::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// A transaction injected into request extensions by tests that want to
/// observe or discard a handler's writes.
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }
}

/// Future returned by `with_txn` closures; it may borrow the transaction.
pub type TxnFuture<'c, R> = Pin<Box<dyn Future<Output = Result<R, AppError>> + 'c>>;

/// Run `f` inside a transaction.
///
/// 1) A `SharedTxn` in request extensions is used as-is (caller owns it).
/// 2) Otherwise begin, run, commit on `Ok`, roll back on `Err`.
pub async fn with_txn<R, F>(req: Option<&HttpRequest>, state: &AppState, f: F) -> Result<R, AppError>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxnFuture<'c, R>,
{
    // Clone out of the RefCell before awaiting.
    let shared_txn: Option<SharedTxn> =
        req.and_then(|r| r.extensions().get::<SharedTxn>().cloned());

    if let Some(shared) = shared_txn {
        return f(shared.transaction()).await;
    }

    let txn = require_db(state)?.begin().await?;
    match f(&txn).await {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            // best-effort; the original error matters more
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}
