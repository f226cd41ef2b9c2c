use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs a view to completion. Ctrl-C doesn't abort it, it only cancels the token handed to the
/// view, which then decides how to wind down. A timer stops right away, a pending companion
/// request is left behind and its answer thrown away.
pub async fn run_interruptible<T, F, Fut>(view: F) -> T
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = T>,
{
    let token = CancellationToken::new();
    let view = view(token.clone());
    tokio::pin!(view);
    loop {
        tokio::select! {
            result = &mut view => return result,
            Ok(()) = tokio::signal::ctrl_c() => {
                info!("Interrupted, leaving the view");
                token.cancel();
            }
        }
    }
}
