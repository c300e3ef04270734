//! Workspace and membership commands.

use folio_application::ApiClient;

use crate::cli::WorkspaceCommand;
use crate::output::Printer;

pub async fn run(
    client: &ApiClient,
    printer: Printer,
    command: WorkspaceCommand,
) -> anyhow::Result<()> {
    let api = client.workspaces();
    match command {
        WorkspaceCommand::List => printer.list(&api.list().await?),
        WorkspaceCommand::Show { id } => printer.one(&api.get(id).await?),
        WorkspaceCommand::Create { name } => printer.one(&api.create(&name).await?),
        WorkspaceCommand::Rename { id, name } => printer.one(&api.rename(id, &name).await?),
        WorkspaceCommand::Delete { id } => {
            api.delete(id).await?;
            printer.done("Workspace deleted.");
            Ok(())
        }
        WorkspaceCommand::Members { id } => printer.list(&api.members(id).await?),
        WorkspaceCommand::AddMember {
            workspace,
            user,
            role,
        } => printer.one(&api.add_member(workspace, user, role).await?),
        WorkspaceCommand::SetRole {
            workspace,
            membership,
            role,
        } => printer.one(&api.update_member_role(workspace, membership, role).await?),
        WorkspaceCommand::RemoveMember {
            workspace,
            membership,
        } => {
            api.remove_member(workspace, membership).await?;
            printer.done("Member removed.");
            Ok(())
        }
    }
}
