use cfg_if::cfg_if;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

fn env_filter() -> EnvFilter {
    // RUST_LOG wins; default keeps wgpu's chatter down
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,wgpu_core=warn,wgpu_hal=warn"))
}

cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        /// Route tracing to the browser console.
        pub fn init() {
            let wasm_layer = tracing_wasm::WASMLayer::new(tracing_wasm::WASMLayerConfig::default());

            tracing_subscriber::registry()
                .with(env_filter())
                .with(wasm_layer)
                .init();

            // Panics with stacktrace
            #[cfg(feature = "console_error_panic_hook")]
            console_error_panic_hook::set_once();
        }
    } else {
        use once_cell::sync::OnceCell;
        use tracing_appender::non_blocking::WorkerGuard;
        use tracing_subscriber::fmt;

        // Keeps the non-blocking writer alive for the process lifetime
        static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

        /// Stderr plus a daily-rolling log file (RUST_LOG_FILE overrides
        /// the default logs/voxville.log).
        pub fn init() {
            let console_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .compact();

            let log_path = std::env::var("RUST_LOG_FILE")
                .unwrap_or_else(|_| "logs/voxville.log".to_string());
            let path = std::path::Path::new(&log_path);
            let (file_writer, guard) = tracing_appender::non_blocking(
                tracing_appender::rolling::daily(
                    path.parent().unwrap_or(std::path::Path::new(".")),
                    path.file_name().unwrap_or(std::ffi::OsStr::new("voxville.log")),
                ),
            );
            let _ = FILE_GUARD.set(guard);

            tracing_subscriber::registry()
                .with(env_filter())
                .with(console_layer)
                .with(fmt::layer().with_writer(file_writer).compact())
                .init();

            hook_panics();
        }

        /// Panics land in the log with a backtrace instead of dying on
        /// a bare stderr line.
        fn hook_panics() {
            std::panic::set_hook(Box::new(|info| {
                let location = info
                    .location()
                    .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                    .unwrap_or_else(|| "<unknown>".to_string());
                let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = info.payload().downcast_ref::<String>() {
                    s.clone()
                } else {
                    "<non-string panic>".to_string()
                };
                let backtrace = std::backtrace::Backtrace::force_capture();
                tracing::error!("panic at {location}: {payload}\n{backtrace:?}");
            }));
        }
    }
}
