#[macro_export]
macro_rules! debug {
    ( $arg:expr $( , $extra:expr )* ) => {
        #[cfg(feature = "telemetry")]
        tracing::debug!($arg $( , $extra )*);
    };
}

pub use debug;

#[macro_export]
macro_rules! info {
    ( $arg:expr $( , $extra:expr )* ) => {
        #[cfg(feature = "telemetry")]
        tracing::info!($arg $( , $extra )*);
    };
}

pub use info;

#[macro_export]
macro_rules! error {
    ( $arg:expr $( , $extra:expr )* ) => {
        #[cfg(feature = "telemetry")]
        tracing::error!($arg $( , $extra )*);
    };
}

pub use error;

#[cfg(feature = "telemetry")]
pub fn init() {
    use tracing_subscriber::{
        filter::LevelFilter,
        fmt::{self, format::FmtSpan},
        layer::{Layer, SubscriberExt},
        util::SubscriberInitExt,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .pretty()
                .with_filter(LevelFilter::DEBUG),
        )
        .init();
}

#[cfg(not(feature = "telemetry"))]
pub fn init() {}
