//! Sign-in, sign-out, profile and password commands.

use folio_application::ApiClient;
use folio_domain::{
    GoogleAuthRequest, LoginRequest, PasswordChange, PasswordResetConfirm, ProfileUpdate,
    RegisterRequest,
};

use crate::cli::{LoginArgs, PasswordCommand, ProfileArgs, RegisterArgs};
use crate::output::Printer;

pub async fn login(client: &ApiClient, printer: Printer, args: LoginArgs) -> anyhow::Result<()> {
    let request = LoginRequest::from_identifier(args.identifier, args.password);
    let user = client.auth().login(&request).await?;
    printer.one(&user)
}

pub async fn google_login(
    client: &ApiClient,
    printer: Printer,
    access_token: String,
    id_token: Option<String>,
) -> anyhow::Result<()> {
    let request = GoogleAuthRequest {
        access_token,
        id_token,
    };
    let user = client.auth().google_login(&request).await?;
    printer.one(&user)
}

pub async fn register(
    client: &ApiClient,
    printer: Printer,
    args: RegisterArgs,
) -> anyhow::Result<()> {
    let confirm = args.confirm.unwrap_or_else(|| args.password.clone());
    let request = RegisterRequest::new(args.username, args.email, args.password, confirm)?;
    let user = client.auth().register(&request).await?;
    printer.one(&user)
}

pub async fn logout(client: &ApiClient, printer: Printer) -> anyhow::Result<()> {
    client.auth().logout().await?;
    printer.done("Signed out.");
    Ok(())
}

/// Asks the server who the stored session belongs to.
pub async fn whoami(client: &ApiClient, printer: Printer) -> anyhow::Result<()> {
    if !client.session().is_authenticated().await {
        anyhow::bail!("not signed in; run `folio login` first");
    }
    let user = client.auth().current_user().await?;
    printer.one(&user)
}

pub async fn profile(client: &ApiClient, printer: Printer, args: ProfileArgs) -> anyhow::Result<()> {
    let update = ProfileUpdate {
        username: args.username,
        email: args.email,
        avatar_url: args.avatar_url,
    };
    let user = client.auth().update_profile(&update).await?;
    printer.one(&user)
}

pub async fn password(
    client: &ApiClient,
    printer: Printer,
    command: PasswordCommand,
) -> anyhow::Result<()> {
    let auth = client.auth();
    match command {
        PasswordCommand::Reset { email } => {
            auth.request_password_reset(&email).await?;
            printer.done("If the address is registered, a reset link is on its way.");
        }
        PasswordCommand::Confirm {
            uid,
            token,
            new_password,
            confirm,
        } => {
            let confirm = PasswordResetConfirm {
                uid,
                token,
                new_password2: confirm.unwrap_or_else(|| new_password.clone()),
                new_password1: new_password,
            };
            auth.confirm_password_reset(&confirm).await?;
            printer.done("Password has been reset.");
        }
        PasswordCommand::Change {
            old_password,
            new_password,
            confirm,
        } => {
            let change = PasswordChange {
                old_password,
                new_password2: confirm.unwrap_or_else(|| new_password.clone()),
                new_password1: new_password,
            };
            auth.change_password(&change).await?;
            printer.done("Password changed.");
        }
    }
    Ok(())
}
