use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "profiling")]
use pprof::{ProfilerGuard, ProfilerGuardBuilder};
#[cfg(feature = "profiling")]
use std::fs::File;

/// Install the stderr log subscriber. `RUST_LOG` overrides the default level.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "uidump_layout=debug,uidump=debug"
    } else {
        "uidump_layout=info,uidump=info"
    };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(feature = "profiling")]
pub struct Profiler {
    guard: Option<ProfilerGuard<'static>>,
}

#[cfg(feature = "profiling")]
impl Profiler {
    pub fn new() -> Result<Self> {
        let guard = ProfilerGuardBuilder::default()
            .frequency(1000)
            .blocklist(&["libc", "libgcc", "pthread", "vdso"])
            .build()?;
        Ok(Self { guard: Some(guard) })
    }

    pub fn report(&mut self, path: &str) -> Result<()> {
        if let Some(guard) = self.guard.take() {
            let report = guard.report().build()?;

            let file = File::create(format!("{path}.svg"))?;
            report.flamegraph(file)?;

            tracing::info!("Profiling report saved to {}.svg", path);
        }
        Ok(())
    }
}

#[cfg(not(feature = "profiling"))]
pub struct Profiler;

#[cfg(not(feature = "profiling"))]
impl Profiler {
    pub fn new() -> Result<Self> {
        Ok(Self)
    }

    pub fn report(&mut self, _path: &str) -> Result<()> {
        tracing::warn!("Profiling is not enabled. Build with --features profiling to enable it.");
        Ok(())
    }
}
