//! User directory and administration commands.

use folio_application::ApiClient;
use folio_domain::{CreateUserRequest, InviteUserRequest, UpdateUserRequest};

use crate::cli::UserCommand;
use crate::output::Printer;

pub async fn run(
    client: &ApiClient,
    printer: Printer,
    command: UserCommand,
) -> anyhow::Result<()> {
    let users = client.users();
    match command {
        UserCommand::List => printer.list(&client.auth().all_users().await?),
        UserCommand::Show { id } => printer.one(&users.get(id).await?),
        UserCommand::Create {
            username,
            email,
            role,
            first_name,
            last_name,
            phone,
            password,
        } => {
            let request = CreateUserRequest {
                first_name,
                last_name,
                username,
                email,
                phone_number: phone,
                role,
                password,
            };
            printer.one(&users.create(&request).await?)
        }
        UserCommand::Update {
            id,
            username,
            email,
            first_name,
            last_name,
            phone,
            role,
            status,
        } => {
            let update = UpdateUserRequest {
                first_name,
                last_name,
                username,
                email,
                phone_number: phone,
                role,
                password: None,
                status,
            };
            printer.one(&users.update(id, &update).await?)
        }
        UserCommand::Delete { id } => {
            users.delete(id).await?;
            printer.done("User deleted.");
            Ok(())
        }
        UserCommand::Invite { email, role } => {
            let invite = InviteUserRequest::new(email, role)?;
            users.invite(&invite).await?;
            printer.done(&format!("Invitation sent to {}.", invite.email));
            Ok(())
        }
    }
}
