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

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use paneshell_app::{App, AppConfig, ShellComponents, ShellSession, StorageMode};
use paneshell_common_telemetry::{ResultExt as _, logging};
use snafu::{ResultExt, Whatever};

mod build_info;

#[derive(Debug, Parser)]
#[clap(
name = "paneshell",
about= "paneshell-cmd",
author = build_info::AUTHOR,
version = build_info::VERSION,
long_version = build_info::LONG_VERSION)]
struct Cli {
    /// Settings file. Defaults to `<config dir>/settings.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root every paneshell path under this directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep layouts in memory for this run only.
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Mirror log events to stdout.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Show(ShowArgs),
    Resize(ResizeArgs),
    Drag(DragArgs),
    Layout(LayoutArgs),
}

#[derive(Debug, Clone, Args)]
#[command(flatten_help = true)]
#[command(long_about = r"

Mount the shell, restore the saved layout and print the frame.
Examples:

paneshell show
paneshell show --first-paint

")]
struct ShowArgs {
    /// Also print the frame painted before restoration.
    #[arg(long)]
    first_paint: bool,
}

impl ShowArgs {
    async fn run(&self, app: &App) -> Result<(), Whatever> {
        let mut session = app.session(ShellComponents::default());
        if self.first_paint {
            println!("{}", session.paint());
        }
        let outcome = session.restore().await;
        tracing::debug!(?outcome, "restored shell layout");
        println!("{}", session.paint());
        Ok(())
    }
}

#[derive(Debug, Clone, Args)]
#[command(flatten_help = true)]
#[command(long_about = r"

Settle the top-level panels at explicit percentages and save them.
Examples:

paneshell resize 20 60 20

")]
struct ResizeArgs {
    /// Drawer, editor area and aside sizes in percent.
    #[arg(required = true, num_args = 1..)]
    sizes: Vec<f64>,
}

impl ResizeArgs {
    async fn run(&self, app: &App) -> Result<(), Whatever> {
        let mut session = mounted(app).await;
        if !session.resize(self.sizes.clone()).await {
            snafu::whatever!(
                "{}",
                rejected_sizes(&self.sizes, session.controller().sizes().len())
            );
        }
        println!("{}", session.paint());
        Ok(())
    }
}

#[derive(Debug, Clone, Args)]
#[command(flatten_help = true)]
#[command(long_about = r"

Drag a top-level handle and save the settled layout. Handle 0 sits
between the drawer and the editor area, handle 1 before the aside.
Examples:

paneshell drag --handle 0 --delta 5
paneshell drag --handle 1 --delta -10

")]
struct DragArgs {
    #[arg(long)]
    handle: usize,

    /// Percent to move the handle; negative moves it left.
    #[arg(long, allow_negative_numbers = true)]
    delta: f64,
}

impl DragArgs {
    async fn run(&self, app: &App) -> Result<(), Whatever> {
        let mut session = mounted(app).await;
        let Some(sizes) = session.drag(self.handle, self.delta).await else {
            snafu::whatever!("no handle {}", self.handle);
        };
        println!("{sizes:?}");
        println!("{}", session.paint());
        Ok(())
    }
}

#[derive(Debug, Clone, Args)]
#[command(flatten_help = true)]
#[command(long_about = r"

Print the saved top-level layout record.
Examples:

paneshell layout

")]
struct LayoutArgs {}

impl LayoutArgs {
    async fn run(&self, app: &App) -> Result<(), Whatever> {
        match app.saved_layout().await {
            Some(record) => println!("{:?}", record.sizes()),
            None => println!("none"),
        }
        Ok(())
    }
}

/// Explains why a resize was refused: wrong count, or a negative or
/// non-finite value.
fn rejected_sizes(sizes: &[f64], expected: usize) -> String {
    if sizes.len() == expected {
        format!("rejected sizes {sizes:?}: every size must be a finite, non-negative number")
    } else {
        format!("rejected sizes {sizes:?}: expected {expected} sizes, got {}", sizes.len())
    }
}

/// A session that has already gone through restoration.
async fn mounted(app: &App) -> ShellSession {
    let mut session = app.session(ShellComponents::default());
    session.restore().await;
    session
}

fn load_config(cli: &Cli) -> Result<AppConfig, Whatever> {
    if let Some(dir) = &cli.data_dir {
        paneshell_paths::set_custom_data_dir(dir);
    }
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| paneshell_paths::settings_file().clone());

    let mut config = AppConfig::load(&path)
        .with_whatever_context(|_| format!("failed to load config {}", path.display()))?
        .resolve_paths(paneshell_paths::database_dir());

    if config.logging.dir.is_empty() {
        let logs_dir = paneshell_paths::logs_dir();
        std::fs::create_dir_all(logs_dir).log_err("create logs dir");
        config.logging.dir = logs_dir.display().to_string();
    }
    if !cli.verbose {
        config.logging.append_stdout = false;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Whatever> {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let _guards = logging::init_global_logging("paneshell", &config.logging)
        .whatever_context("failed to initialize logging")?;

    let mode = if cli.ephemeral {
        StorageMode::Ephemeral
    } else {
        StorageMode::Durable
    };
    let app = App::open(config, mode)
        .await
        .whatever_context("failed to open paneshell storage")?;

    let result = match &cli.commands {
        Commands::Show(args) => args.run(&app).await,
        Commands::Resize(args) => args.run(&app).await,
        Commands::Drag(args) => args.run(&app).await,
        Commands::Layout(args) => args.run(&app).await,
    };
    app.close().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_sizes_names_the_cause() {
        let message = rejected_sizes(&[20.0, -5.0, 85.0], 3);
        assert!(message.contains("non-negative"), "{message}");
        assert!(!message.contains("expected 3"), "{message}");

        let message = rejected_sizes(&[50.0, 50.0], 3);
        assert!(message.contains("expected 3 sizes, got 2"), "{message}");
    }

    #[test]
    fn cli_parses_negative_drag_delta() {
        let cli = Cli::try_parse_from(["paneshell", "drag", "--handle", "1", "--delta", "-10"])
            .unwrap();
        let Commands::Drag(args) = cli.commands else {
            panic!("expected drag");
        };
        assert_eq!(args.handle, 1);
        assert!((args.delta + 10.0).abs() < f64::EPSILON);
    }
}
