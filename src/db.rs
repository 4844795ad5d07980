//! General database handling.

use std::error::Error;

use castaway::cast;
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};

/// Connects the SQLx database pool and runs pending database migrations, returning the pool once
/// complete.
///
/// # Errors
///
/// Returns an error if the initial database connection or its migrations fail.
pub async fn initialize(db_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .after_connect(|conn, _| {
            Box::pin(async move {
                conn.execute("SET default_transaction_isolation TO 'serializable';")
                    .await?;

                Ok(())
            })
        })
        .connect(db_url)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}

/// The error result of a database transaction.
///
/// Doesn't implement [`Error`] to prevent an impl conflict.
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Debug)]
pub(crate) enum TxError<E> {
    /// Aborts the transaction and returns the wrapped error.
    Abort(E),

    /// Aborts the transaction and runs the `transaction!` callback again.
    Retry,
}

/// The SQLSTATE code for serialization failures.
const SERIALIZATION_FAILURE: &str = "40001";

impl<S, E> From<S> for TxError<E>
where
    // This `Error` bound may be overly restrictive but prevents an impl conflict.
    S: Error + 'static,
    E: From<S>,
{
    fn from(source: S) -> Self {
        if is_serialization_failure(&source) {
            Self::Retry
        } else {
            Self::Abort(source.into())
        }
    }
}

/// Checks whether an error is an SQLx database error caused by a serialization failure.
fn is_serialization_failure<S: Error + 'static>(source: &S) -> bool {
    match cast!(source, &sqlx::Error) {
        Ok(sqlx::Error::Database(source)) => source
            .code()
            .is_some_and(|code| code == SERIALIZATION_FAILURE),
        _ => false,
    }
}

/// The result of a database transaction.
pub(crate) type TxResult<T, E> = Result<T, TxError<E>>;

/// Begins a database transaction with the maximum isolation level (`SERIALIZABLE`), retrying if the
/// database detects a race condition (serialization failure).
///
/// Two requests editing the same favorites document at once would otherwise lose one of the
/// edits, since a document is read, changed in memory, then written back.
macro_rules! transaction {
    ($db_pool:expr, $($ident:ident)* |$tx:ident| $(-> $Return:ty)? $block:block) => {
        $crate::db::transaction!(
            $db_pool,
            $($ident)* |$tx: &mut ::sqlx::Transaction<'static, ::sqlx::Postgres>| $(-> $Return)? {
                $block
            }
        )
    };

    ($db_pool:expr, $callback:expr) => {
        async {
            #[expect(clippy::allow_attributes, reason = "`unused_mut` isn't always expected")]
            #[allow(unused_mut, reason = "some callers need this to be `mut`")]
            let mut callback = $callback;

            #[expect(clippy::allow_attributes, reason = "`unused_mut` isn't always expected")]
            #[allow(unused_mut, reason = "some callers need this to be `mut`")]
            let mut callback = async || -> $crate::db::TxResult<_, _> {
                let mut tx = $db_pool.begin().await?;

                let return_value = match callback(&mut tx).await {
                    Ok(value) => value,
                    Err(error) => return Err(error),
                };

                tx.commit().await?;
                Ok(return_value)
            };

            loop {
                match callback().await {
                    Ok(value) => break Ok(value),
                    Err($crate::db::TxError::Abort(error)) => break Err(error),
                    Err($crate::db::TxError::Retry) => {
                        ::tracing::debug!("retrying transaction after serialization failure");
                    }
                }
            }
        }
    };
}

pub(crate) use transaction;
