use clap::Parser;
use mycal::cli::{Cli, CliCommand};
use mycal::startup::{self, LogTarget};
use mycal::tui::{self, RenderContext, RunOptions, Theme};
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    if cli.command == Some(CliCommand::Themes) {
        println!("Available themes:");
        for name in Theme::names() {
            println!("  - {}", name);
        }
        return Ok(());
    }

    // Load configuration
    let config = startup::load_config()?;

    let theme_name = cli.theme.clone().unwrap_or_else(|| config.theme.clone());
    let theme = startup::resolve_theme(&theme_name)?;

    // Initialize logging
    let target = if cli.watch {
        LogTarget::File(config.log_path())
    } else {
        LogTarget::Stderr
    };
    // Held until exit so buffered log lines are flushed
    let _log_guard = startup::init_logging(target)?;

    info!("Starting mycal");

    if !cli.demo {
        if let Some(hint) = startup::credentials_hint(&config) {
            println!("{}", hint);
        }
    }

    let provider = startup::build_provider(&config, cli.demo)?;
    let user_name = if cli.demo {
        "acme-user".to_string()
    } else {
        config.user_name.clone()
    };
    let ctx = RenderContext::new(theme, user_name, config.hyperlinks_enabled());

    if cli.watch {
        let options = RunOptions {
            render: ctx,
            refresh_interval: config.refresh_interval,
        };
        tui::run(provider, options).await?;
    } else {
        startup::print_static(provider.as_ref(), &ctx).await;
    }

    Ok(())
}
