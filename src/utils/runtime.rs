use anyhow::Result;

/// Every view runs on one thread. Remote calls and timers are the only suspension points.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
