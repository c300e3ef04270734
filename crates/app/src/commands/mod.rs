//! Command handlers.

mod account;
mod manuscripts;
mod users;
mod workspaces;

use folio_application::ApiClient;

use crate::cli::Command;
use crate::output::Printer;

/// Runs one command against the API.
pub async fn run(command: Command, client: &ApiClient, printer: Printer) -> anyhow::Result<()> {
    match command {
        Command::Login(args) => account::login(client, printer, args).await,
        Command::GoogleLogin {
            access_token,
            id_token,
        } => account::google_login(client, printer, access_token, id_token).await,
        Command::Register(args) => account::register(client, printer, args).await,
        Command::Logout => account::logout(client, printer).await,
        Command::Whoami => account::whoami(client, printer).await,
        Command::Users(cmd) => users::run(client, printer, cmd).await,
        Command::Profile(args) => account::profile(client, printer, args).await,
        Command::Password(cmd) => account::password(client, printer, cmd).await,
        Command::Workspaces(cmd) => workspaces::run(client, printer, cmd).await,
        Command::Manuscripts(cmd) => manuscripts::manuscripts(client, printer, cmd).await,
        Command::Chapters(cmd) => manuscripts::chapters(client, printer, cmd).await,
        Command::Documents(cmd) => manuscripts::documents(client, printer, cmd).await,
    }
}
