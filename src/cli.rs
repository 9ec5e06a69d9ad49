use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vqe-watch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Live terminal view of VQE optimiser convergence",
    after_help = "Without PATH the stream file is looked up through CK for \
                  $VQE_QUANTUM_PROVIDER (ibm or rigetti, default ibm).\n\
                  Set VQE_WATCH_COLOR=1 to colour each run.\n\
                  Diagnostics go to the log file; filter with VQE_WATCH_LOG."
)]
pub struct Cli {
    /// Stream file written by the optimiser
    pub path: Option<PathBuf>,
}
