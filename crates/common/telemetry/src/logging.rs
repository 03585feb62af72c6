// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Global `tracing` subscriber setup.
//!
//! Logs go to stdout and, when a directory is configured, to hourly rolling
//! files plus a separate error-only file. The level filter can be swapped at
//! runtime through [`RELOAD_HANDLE`].

use std::{
    env,
    io::IsTerminal,
    sync::{Mutex, Once},
};

use bon::Builder;
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Deserializer, Serialize, de};
use smart_default::SmartDefault;
use snafu::ResultExt as _;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Registry, filter, layer::SubscriberExt, prelude::*};

use crate::err::{InvalidLevelSnafu, LogDirSnafu, Result};

/// Deserializes a string, mapping the empty string to `T::default()`.
///
/// # Errors
/// Returns an error if the non-empty string is not a valid `T`.
pub fn empty_string_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        Ok(T::default())
    } else {
        T::deserialize(de::value::StrDeserializer::new(&s)).map_err(|e: de::value::Error| {
            de::Error::custom(format!("invalid value, expect empty string, err: {e}"))
        })
    }
}

/// Handle for changing the level filter after initialization. Empty until
/// [`init_global_logging`] has run.
pub static RELOAD_HANDLE: OnceCell<tracing_subscriber::reload::Handle<filter::Targets, Registry>> =
    OnceCell::new();

/// Filter used when neither `LoggingOptions::level` nor `RUST_LOG` is set.
const DEFAULT_LOG_TARGETS: &str = "info";

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, SmartDefault, Builder)]
#[serde(default)]
pub struct LoggingOptions {
    /// Directory for rolling log files. Empty disables file logging.
    #[default = ""]
    #[builder(default, into)]
    pub dir: String,

    /// Filter such as `"info"` or `"info,paneshell_store=debug"`. Falls back
    /// to `RUST_LOG`, then `"info"`.
    #[builder(into)]
    pub level: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_default")]
    #[builder(default)]
    pub log_format: LogFormat,

    /// Rotated files kept per log stream. Rotation is hourly.
    #[default = 168]
    #[builder(default = 168)]
    pub max_log_files: usize,

    /// Also write to stdout.
    #[default = true]
    #[builder(default = true)]
    pub append_stdout: bool,
}

/// Log line encoding.
#[derive(
    Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize, Default, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One JSON object per event, with span context
    Json,
    /// Human-readable lines
    #[default]
    Text,
}

static GLOBAL_UT_LOG_GUARD: Lazy<Mutex<Option<Vec<WorkerGuard>>>> = Lazy::new(|| Mutex::new(None));

/// Logging for tests, written to `UNITTEST_LOG_DIR` (default
/// `/tmp/__paneshell_unittest_logs`) at `UNITTEST_LOG_LEVEL` (default
/// `debug,sqlx=warn`). Safe to call from every test.
pub fn init_default_ut_logging() {
    static START: Once = Once::new();

    START.call_once(|| {
        let dir = env::var("UNITTEST_LOG_DIR")
            .unwrap_or_else(|_| "/tmp/__paneshell_unittest_logs".to_string());
        let level =
            env::var("UNITTEST_LOG_LEVEL").unwrap_or_else(|_| "debug,sqlx=warn".to_string());
        let opts = LoggingOptions {
            dir: dir.clone(),
            level: Some(level),
            append_stdout: false,
            ..Default::default()
        };

        let guards = match init_global_logging("unittest", &opts) {
            Ok(guards) => guards,
            Err(error) => {
                eprintln!("unittest logging disabled: {error}");
                return;
            }
        };
        if let Ok(mut slot) = GLOBAL_UT_LOG_GUARD.lock() {
            *slot = Some(guards);
        }

        tracing::info!("logs dir = {}", dir);
    });
}

/// Installs the global subscriber. Only the first call has any effect.
///
/// The level filter and the log directory are checked before anything is
/// installed, so a bad `[logging]` section is reported instead of leaving
/// the process half-configured. The returned guards flush the non-blocking
/// writers when dropped; keep them alive for the life of the process.
#[allow(clippy::print_stdout)]
pub fn init_global_logging(app_name: &str, opts: &LoggingOptions) -> Result<Vec<WorkerGuard>> {
    static START: Once = Once::new();

    let level = opts
        .level
        .clone()
        .or_else(|| env::var(EnvFilter::DEFAULT_ENV).ok())
        .unwrap_or_else(|| DEFAULT_LOG_TARGETS.to_string());
    let filter = level
        .parse::<filter::Targets>()
        .context(InvalidLevelSnafu { level })?;

    let appenders = if opts.dir.is_empty() {
        None
    } else {
        Some((
            rolling_appender(app_name, "", opts)?,
            rolling_appender(app_name, "-err", opts)?,
        ))
    };

    let mut guards = vec![];
    START.call_once(|| {
        // Another logger may already be installed, e.g. by a test harness.
        let _ = LogTracer::init();

        let stdout_logging_layer = if opts.append_stdout {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
            guards.push(guard);

            if opts.log_format == LogFormat::Json {
                Some(
                    tracing_subscriber::fmt::Layer::new()
                        .json()
                        .with_writer(writer)
                        .with_ansi(std::io::stdout().is_terminal())
                        .with_current_span(true)
                        .with_span_list(true)
                        .boxed(),
                )
            } else {
                Some(
                    tracing_subscriber::fmt::Layer::new()
                        .with_writer(writer)
                        .with_ansi(std::io::stdout().is_terminal())
                        .boxed(),
                )
            }
        } else {
            None
        };

        let (file_logging_layer, err_file_logging_layer) = match appenders {
            None => (None, None),
            Some((appender, err_appender)) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                guards.push(guard);
                let (err_writer, err_guard) = tracing_appender::non_blocking(err_appender);
                guards.push(err_guard);

                if opts.log_format == LogFormat::Json {
                    (
                        Some(
                            tracing_subscriber::fmt::Layer::new()
                                .json()
                                .with_writer(writer)
                                .with_ansi(false)
                                .with_current_span(true)
                                .with_span_list(true)
                                .boxed(),
                        ),
                        Some(
                            tracing_subscriber::fmt::Layer::new()
                                .json()
                                .with_writer(err_writer)
                                .with_ansi(false)
                                .with_filter(filter::LevelFilter::ERROR)
                                .boxed(),
                        ),
                    )
                } else {
                    (
                        Some(
                            tracing_subscriber::fmt::Layer::new()
                                .with_writer(writer)
                                .with_ansi(false)
                                .boxed(),
                        ),
                        Some(
                            tracing_subscriber::fmt::Layer::new()
                                .with_writer(err_writer)
                                .with_ansi(false)
                                .with_filter(filter::LevelFilter::ERROR)
                                .boxed(),
                        ),
                    )
                }
            }
        };

        let (dyn_filter, reload_handle) = tracing_subscriber::reload::Layer::new(filter);
        let _ = RELOAD_HANDLE.set(reload_handle);

        let subscriber = Registry::default()
            .with(dyn_filter)
            .with(stdout_logging_layer)
            .with(file_logging_layer)
            .with(err_file_logging_layer);

        if tracing::subscriber::set_global_default(subscriber).is_err() {
            println!("{app_name}: a global tracing subscriber is already installed");
        }
    });

    Ok(guards)
}

fn rolling_appender(
    app_name: &str,
    suffix: &str,
    opts: &LoggingOptions,
) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::HOURLY)
        .filename_prefix(format!("{}{suffix}", app_name.to_lowercase()))
        .filename_suffix("log")
        .max_log_files(opts.max_log_files)
        .build(&opts.dir)
        .context(LogDirSnafu { dir: &opts.dir })
}
