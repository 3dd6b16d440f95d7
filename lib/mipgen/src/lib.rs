use std::path::Path;
use fnv::{FnvHashMap, FnvHashSet};

pub mod sarp;
pub mod data;

pub type Map<K, V> = FnvHashMap<K, V>;
pub type Set<T> = FnvHashSet<T>;


mod logging_setup {
    use super::*;
    use std::fs::File;
    use tracing_subscriber::{EnvFilter, fmt, registry, prelude::*};
    use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};

    // The returned guard flushes the file layer on drop and must be held
    // for as long as logging should keep working.
    fn install<P: AsRef<Path>>(logfile: Option<P>, best_effort: bool) -> Option<WorkerGuard> {
        let base = registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env());

        match logfile {
            None => {
                if best_effort { base.try_init().ok(); } else { base.init(); }
                None
            }
            Some(path) => {
                let file = File::create(path).expect("failed to create log file");
                let (writer, guard) = NonBlockingBuilder::default()
                    .lossy(false)
                    .finish(file);
                let subscriber = base.with(
                    fmt::layer()
                        .json()
                        .with_span_list(true)
                        .with_current_span(false)
                        .with_writer(writer)
                );
                if best_effort { subscriber.try_init().ok(); } else { subscriber.init(); }
                Some(guard)
            }
        }
    }

    pub fn init_logging(logfile: Option<impl AsRef<Path>>) -> Option<WorkerGuard> {
        return install(logfile, false);
    }

    // tests race to install the global subscriber, so only the first one wins
    #[allow(dead_code)]
    pub(crate) fn init_test_logging(logfile: Option<impl AsRef<Path>>) -> Option<WorkerGuard> {
        return install(logfile, true);
    }
}
pub use logging_setup::*;
