use std::any::Any;
use std::sync::Arc;

use diesel::SqliteConnection;
use ledgerline_core::errors::{DatabaseError, Error, Result};
use log::error;
use tokio::sync::{mpsc, oneshot};

use super::{get_connection, DbPool};
use crate::errors::StorageError;

// A job runs against the writer's connection and reports a core Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    // Job return types are erased to `Box<dyn Any + Send>` and downcast in `exec`.
    tx: mpsc::Sender<(Job<Box<dyn Any + Send + 'static>>, Reply)>,
}

fn writer_gone() -> Error {
    Error::Database(DatabaseError::Internal(
        "Database writer is not running".to_string(),
    ))
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside an `IMMEDIATE` transaction. Returning `Err` rolls
    /// back everything the job wrote, and the error reaches the caller as-is.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| writer_gone())?;

        let boxed = ret_rx.await.map_err(|_| writer_gone())??;
        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Unexpected result type from database writer".to_string(),
            ))
        })
    }
}

/// Spawns a background Tokio task that acts as the single writer to the database.
///
/// The actor holds one pooled connection for its whole lifetime and processes
/// jobs serially, so writes never contend with each other. It stops once every
/// `WriteHandle` has been dropped.
pub fn spawn_writer(pool: Arc<DbPool>) -> Result<WriteHandle> {
    let mut conn = get_connection(&pool)?;
    let (tx, mut rx) = mpsc::channel::<(Job<Box<dyn Any + Send + 'static>>, Reply)>(1024);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            if let Err(e) = &result {
                if matches!(e, Error::Database(_)) {
                    error!("Database write failed: {}", e);
                }
            }
            // The requester may have gone away (timeout, cancellation)
            let _ = reply_tx.send(result);
        }
    });

    Ok(WriteHandle { tx })
}
