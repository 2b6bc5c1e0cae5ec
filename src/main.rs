use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotback::{
    cli::{self, ExportOptions},
    config::{self, Config},
    error,
    export::Format,
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

/// Exports your Spotify library. By default, opens a browser window to
/// authorize the Spotify Web API, but you can also manually specify an OAuth
/// token with the --token option.
#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  styles=styles(),
  args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Use a Spotify OAuth token (requires the `playlist-read-private`,
    /// `user-library-read` and `user-follow-read` permissions)
    #[clap(long, value_name = "OAUTH_TOKEN")]
    token: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Output file name prefix; prompted for when missing
    file: Option<String>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
struct CompletionsOption {
    shell: Shell,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Completions(opt)) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
        None => {
            let config = Config::from_env();
            let options = ExportOptions {
                token: cli.token,
                format: cli.format,
                file: cli.file,
            };
            if let Err(e) = cli::run(options, &config).await {
                error!("{}", e);
            }
        }
    }
}
