//! # ssss-pdsp
//!
//! Diagnostics for the ssss-pdsp test: simulated signal versus sim+sigproc
//! signal on ProtoDUNE-SP.
//!
//! ## Usage
//!
//! ```bash
//! # Sensitive volume reported by the job log
//! ssss-pdsp log-summary wct.log
//!
//! # Depo time and drift ranges before and after drifting
//! ssss-pdsp depo-summary depos.npz drift.npz
//!
//! # Frame timing and value ranges
//! ssss-pdsp frame-summary splat.npz signal.npz --format csv
//!
//! # Comparison pages
//! ssss-pdsp plots --channel-ranges 0,800,1600,2560 --smear 3 \
//!     depos.npz drift.npz splat.npz signal.npz -o plots.pdf
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
