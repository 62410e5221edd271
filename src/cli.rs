use clap::{Parser, Subcommand};

/// Today's calendar and a countdown to your next meeting, in the terminal
#[derive(Debug, Parser)]
#[command(name = "mycal", version, about)]
pub struct Cli {
    /// Run in interactive watch mode
    #[arg(short, long)]
    pub watch: bool,

    /// Use demo data instead of your calendar (for screenshots)
    #[arg(long)]
    pub demo: bool,

    /// Color theme (default, catppuccin, dracula, nord, tokyonight, gruvbox)
    #[arg(long)]
    pub theme: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum CliCommand {
    /// List available themes
    Themes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_watch_flags() {
        let cli = Cli::try_parse_from(["mycal", "-w", "--theme", "nord"]).unwrap();
        assert!(cli.watch);
        assert!(!cli.demo);
        assert_eq!(cli.theme.as_deref(), Some("nord"));
        assert_eq!(cli.command, None);

        let cli = Cli::try_parse_from(["mycal", "--watch", "--demo"]).unwrap();
        assert!(cli.watch && cli.demo);
    }

    #[test]
    fn test_parse_themes_command() {
        let cli = Cli::try_parse_from(["mycal", "themes"]).unwrap();
        assert_eq!(cli.command, Some(CliCommand::Themes));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["mycal", "--frobnicate"]).is_err());
    }
}
