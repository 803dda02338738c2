//! Logging macros for ergonomic log message formatting.
//!
//! Each macro formats its arguments like `format!`, records the call site and
//! returns the pipeline future; await it to gate and forward the message.
//! Put `section = expr` right after the engine to log somewhere other than
//! the default section.
//!
//! # Examples
//!
//! ```
//! use rust_section_logger::{info, warning, Engine};
//!
//! # tokio_test::block_on(async {
//! let engine = Engine::new();
//! let db = engine.section("db");
//!
//! // Default section
//! info!(engine, "Server started").await.unwrap();
//!
//! // With format arguments and a section
//! let retries = 3;
//! warning!(engine, section = &db, "Reconnecting, attempt {}", retries)
//!     .await
//!     .unwrap();
//! # });
//! ```

/// Location of the macro call site.
#[macro_export]
macro_rules! location {
    () => {
        $crate::core::Location::new(file!(), line!(), column!())
    };
}

/// Log a message at an explicit severity.
///
/// # Examples
///
/// ```
/// # use rust_section_logger::{Engine, Severity};
/// # tokio_test::block_on(async {
/// # let engine = Engine::new();
/// use rust_section_logger::log;
/// log!(engine, Severity::Notice, "Simple message").await.unwrap();
/// log!(engine, Severity::Error, "Error code: {}", 500).await.unwrap();
/// # });
/// ```
#[macro_export]
macro_rules! log {
    ($engine:expr, $level:expr, section = $section:expr, $($arg:tt)+) => {
        $engine
            .entry($level, format!($($arg)+))
            .section($section)
            .location($crate::location!())
            .send()
    };
    ($engine:expr, $level:expr, $($arg:tt)+) => {
        $engine
            .entry($level, format!($($arg)+))
            .location($crate::location!())
            .send()
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($engine:expr, $($arg:tt)+) => {
        $crate::log!($engine, $crate::Severity::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// # use rust_section_logger::Engine;
/// # tokio_test::block_on(async {
/// # let engine = Engine::new();
/// use rust_section_logger::info;
/// info!(engine, "Processing {} items", 100).await.unwrap();
/// # });
/// ```
#[macro_export]
macro_rules! info {
    ($engine:expr, $($arg:tt)+) => {
        $crate::log!($engine, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($engine:expr, $($arg:tt)+) => {
        $crate::log!($engine, $crate::Severity::Notice, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($engine:expr, $($arg:tt)+) => {
        $crate::log!($engine, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use rust_section_logger::Engine;
/// # tokio_test::block_on(async {
/// # let engine = Engine::new();
/// use rust_section_logger::error;
/// error!(engine, "Error code: {}, message: {}", 500, "Internal error")
///     .await
///     .unwrap();
/// # });
/// ```
#[macro_export]
macro_rules! error {
    ($engine:expr, $($arg:tt)+) => {
        $crate::log!($engine, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($engine:expr, $($arg:tt)+) => {
        $crate::log!($engine, $crate::Severity::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::sinks::MemorySink;
    use crate::{Engine, Severity};

    fn engine_with(memory: &MemorySink) -> Engine {
        Engine::builder()
            .default_level(Severity::Debug)
            .logger(memory.logger())
            .build()
    }

    #[test]
    fn test_macros_format_and_locate() {
        let memory = MemorySink::new();
        let engine = engine_with(&memory);

        tokio_test::block_on(async {
            crate::info!(engine, "value {}", 42).await.unwrap();
        });

        let records = memory.records();
        assert_eq!(records[0].lines, ["value 42"]);
        assert_eq!(records[0].severity, Severity::Info);
        let location = records[0].location.as_ref().unwrap();
        assert!(location.file.ends_with("macros.rs"));
        assert!(location.line > 0);
    }

    #[test]
    fn test_each_level_macro() {
        let memory = MemorySink::new();
        let engine = engine_with(&memory);

        tokio_test::block_on(async {
            crate::debug!(engine, "d").await.unwrap();
            crate::notice!(engine, "n").await.unwrap();
            crate::warning!(engine, "w").await.unwrap();
            crate::error!(engine, "e").await.unwrap();
            crate::fatal!(engine, "f").await.unwrap();
        });

        let levels: Vec<Severity> = memory.records().iter().map(|r| r.severity).collect();
        assert_eq!(
            levels,
            [
                Severity::Debug,
                Severity::Notice,
                Severity::Warning,
                Severity::Error,
                Severity::Fatal
            ]
        );
    }

    #[test]
    fn test_section_argument() {
        let memory = MemorySink::new();
        let engine = engine_with(&memory);
        let quiet = engine.section("quiet");
        engine.set_level(&quiet, Severity::Error);

        tokio_test::block_on(async {
            crate::warning!(engine, section = &quiet, "dropped").await.unwrap();
            crate::error!(engine, section = &quiet, "kept {}", 1).await.unwrap();
        });

        let records = memory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].section.name(), "quiet");
    }
}
