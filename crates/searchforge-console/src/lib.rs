//! Colorful console output for solver events.
//!
//! Provides a custom `tracing` layer that renders the solver's lifecycle
//! events (the `event` field of each record) as colored terminal lines.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve/phase start and end, new best solutions)
//! - **WARN**: Configuration warnings such as phases without termination
//! - **DEBUG**: One line per committed step

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use owo_colors::OwoColorize;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

mod format;

use format::{format_event, EventVisitor};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directive used when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVE: &str = "searchforge_solver=info";

/// Initializes the solver console output.
///
/// Safe to call multiple times - only the first call has effect. If another
/// global subscriber is already installed, it is left in place.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = match DEFAULT_DIRECTIVE.parse() {
            Ok(directive) => EnvFilter::builder()
                .with_default_directive(directive)
                .from_env_lossy(),
            Err(_) => EnvFilter::from_default_env(),
        };

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ____                      _     _____
/ ___|  ___  __ _ _ __ ___| |__ |  ___|__  _ __ __ _  ___
\___ \ / _ \/ _` | '__/ __| '_ \| |_ / _ \| '__/ _` |/ _ \
 ___) |  __/ (_| | | | (__| | | |  _| (_) | | | (_| |  __/
|____/ \___|\__,_|_|  \___|_| |_|_|  \___/|_|  \__, |\___|
                                               |___/
"#;

    let version_line = format!("                   v{VERSION} - Local Search Engine\n");

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
///
/// Only records from `searchforge_solver` carrying a known `event` field
/// are printed; everything else is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("searchforge_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        if visitor.event.as_deref() == Some("solve_start") {
            mark_solve_start();
        }

        if let Some(line) = format_event(&visitor, *metadata.level(), elapsed_secs()) {
            let _ = writeln!(io::stdout(), "{line}");
        }
    }
}
