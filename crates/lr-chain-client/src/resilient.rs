//! Resilient remote call.

use std::future::Future;

use tracing::warn;

use crate::error::Result;

/// Await a single ledger read, converting any failure into `None`.
///
/// Field reads are independently fallible (stale node, method missing on a
/// contract variant, transient RPC error); callers render a partial view
/// instead of failing the whole page on one bad field. The only side
/// effect of a failure is the tagged warning.
pub async fn attempt<T, F>(label: &str, read: F) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    match read.await {
        Ok(value) => Some(value),
        Err(error) => {
            warn!("Falha ao ler {label}: {error}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainError;

    #[tokio::test]
    async fn attempt_contains_failures() {
        let ok = attempt("ended", async { Ok(true) }).await;
        assert_eq!(ok, Some(true));

        let failed: Option<bool> = attempt("ended", async {
            Err(ChainError::Transport("rpc offline".to_string()))
        })
        .await;
        assert_eq!(failed, None);
    }
}
