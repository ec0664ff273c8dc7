mod api;
mod app;
mod commands;
mod conversation;
mod filter;
mod storage;
mod ui;
mod utils;

use clap::{Parser, Subcommand};

use crate::commands::{
    AccountKind, Context, JobsCommand, MessagesCommand, ProfileCommand, UsersCommand,
};

#[derive(Parser)]
#[command(
    name = "jobmatch-client",
    version,
    about = "Browse jobs, manage your profile and message other users"
)]
struct Cli {
    /// Backend base URL; overrides the one saved at login
    #[arg(long, global = true, env = "JOBMATCH_API_URL", value_name = "URL")]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "JOBMATCH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show the logged-in user
    Whoami,
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "JOBMATCH_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, value_enum, default_value = "student")]
        kind: AccountKind,
    },
    Jobs {
        #[command(subcommand)]
        action: JobsCommand,
    },
    Users {
        #[command(subcommand)]
        action: UsersCommand,
    },
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    Messages {
        #[command(subcommand)]
        action: MessagesCommand,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut ctx = Context {
        state: app::AppState::load(),
        api_url: cli.api_url,
    };

    let result = match cli.command {
        Command::Login { email, password } => commands::login(&mut ctx, &email, &password),
        Command::Logout => commands::logout(&mut ctx),
        Command::Whoami => commands::whoami(&ctx),
        Command::Register { name, email, password, kind } => {
            commands::register(&ctx, name, email, password, kind)
        }
        Command::Jobs { action } => commands::jobs(&ctx, action),
        Command::Users { action } => commands::users(&ctx, action),
        Command::Profile { action } => commands::profile(&ctx, action),
        Command::Messages { action } => commands::messages(&ctx, action),
    };

    if let Err(err) = result {
        log::debug!("command failed: {:?}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
