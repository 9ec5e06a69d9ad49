//! Starts the tailer and the dashboard, wires up SIGINT, waits for both.

use crate::liveness::Liveness;
use crate::runs::RunStore;
use crate::tail::Tailer;
use crate::watch::{Dashboard, DisplayOptions};
use anyhow::{bail, Context, Result};
use nix::sys::signal::{self, SigHandler, Signal};
use std::{path::PathBuf, sync::Arc, thread};
use tracing::{error, info};

pub fn run(path: PathBuf, options: DisplayOptions) -> Result<()> {
    let store = Arc::new(RunStore::new());
    let tailer = Tailer::new(path.clone(), Arc::clone(&store));
    let dashboard = Dashboard::new(Arc::clone(&store), path.clone(), options);

    let tail_alive = tailer.liveness();
    let ui_alive = dashboard.liveness();
    install_interrupt_handler(tail_alive.clone(), ui_alive)?;

    info!(path = %path.display(), "starting workers");
    let tail_handle = thread::Builder::new()
        .name("tailer".into())
        .spawn(move || tailer.run())
        .context("spawn tailer thread")?;

    let ui_handle = match thread::Builder::new()
        .name("dashboard".into())
        .spawn(move || dashboard.run())
    {
        Ok(handle) => handle,
        Err(e) => {
            tail_alive.stop();
            let _ = tail_handle.join();
            return Err(e).context("spawn dashboard thread");
        }
    };

    // the dashboard decides when we are done; the tailer runs until told
    let ui_result = ui_handle.join();
    tail_alive.stop();
    let tail_result = tail_handle.join();
    info!("workers stopped");

    match ui_result {
        Ok(result) => result.context("dashboard failed")?,
        Err(_) => {
            error!("dashboard thread panicked");
            bail!("dashboard thread panicked");
        }
    }
    if tail_result.is_err() {
        error!("tailer thread panicked");
        bail!("tailer thread panicked");
    }
    Ok(())
}

/// First SIGINT asks both workers to stop; a second one kills the process.
fn install_interrupt_handler(tail: Liveness, ui: Liveness) -> Result<()> {
    ctrlc::set_handler(move || {
        tail.stop();
        ui.stop();
        // SAFETY: runs on the ctrlc handler thread, not inside a signal handler
        if let Err(e) = unsafe { signal::signal(Signal::SIGINT, SigHandler::SigDfl) } {
            error!(error = %e, "could not restore default SIGINT disposition");
        }
    })
    .context("install SIGINT handler")
}
