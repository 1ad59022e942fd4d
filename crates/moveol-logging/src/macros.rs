//! ---
//! ems_section: "03-logging"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Structured logging adapters for the sender."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Level-specific macros that attach a [`LogContext`](crate::LogContext).

#[doc(hidden)]
#[macro_export]
macro_rules! __moveol_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            $level,
            port = ctx.port.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            state = ctx.state.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an informational log enriched with sender context.
#[macro_export]
macro_rules! moveol_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__moveol_event!(tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__moveol_event!(tracing::Level::INFO, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with sender context.
#[macro_export]
macro_rules! moveol_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__moveol_event!(tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__moveol_event!(tracing::Level::DEBUG, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit an error log enriched with sender context.
#[macro_export]
macro_rules! moveol_error {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__moveol_event!(tracing::Level::ERROR, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__moveol_event!(tracing::Level::ERROR, $crate::LogContext::default(), $($arg)+)
    };
}
