/// Concurrency management for Calltrail.
/// Configures the scan thread pool to reserve system capacity for the
/// editor tooling running beside it.
use anyhow::Result;
use tracing::debug;

/// Initialize the global rayon thread pool with a controlled worker count.
/// Reserves ~50% of CPU capacity; only the workspace scan is parallel, the
/// graph engine itself never is.
pub fn init_scan_pool(workers: Option<usize>) -> Result<()> {
    let cores = num_cpus::get();
    let workers = workers.unwrap_or_else(|| std::cmp::max(1, cores / 2));

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    debug!("initialized scan pool: {workers} workers (system has {cores} cores)");
    Ok(())
}
