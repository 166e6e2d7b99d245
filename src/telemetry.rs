use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

lazy_static! {
    pub static ref QUIZ_QUESTIONS_SERVED: CounterVec = register_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions handed out by the quiz endpoint",
        &["category"]
    )
    .unwrap();
}

/// Installs the global subscriber. `LOG_LEVEL` takes precedence over
/// `default_directives`, which normally comes from the settings file.
pub fn init_tracing(default_directives: &str) {
    let span_events = std::env::var("INCLUDE_SPAN_EVENTS")
        .is_ok_and(|value| value.eq_ignore_ascii_case("true"));
    let fmt_layer = fmt::layer().with_span_events(if span_events {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    });

    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new(default_directives))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
