// Detached background work
//
// Runs on the tokio blocking pool when called from inside a runtime (Tauri
// commands), and on a named std thread otherwise (terminal shell, tests).

use tokio::runtime::Handle;

pub(crate) fn spawn_detached<F>(name: &str, job: F)
where
    F: FnOnce() + Send + 'static,
{
    if let Ok(runtime) = Handle::try_current() {
        runtime.spawn_blocking(job);
        return;
    }

    if let Err(e) = std::thread::Builder::new().name(name.to_string()).spawn(job) {
        tracing::error!("Failed to spawn {} thread: {}", name, e);
    }
}
