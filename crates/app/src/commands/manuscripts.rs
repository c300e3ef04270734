//! Manuscript, chapter and document commands.

use folio_application::ApiClient;
use folio_domain::{CreateChapter, CreateManuscript, UpdateChapter, UpdateManuscript};

use crate::cli::{ChapterCommand, DocumentCommand, ManuscriptCommand};
use crate::output::Printer;

pub async fn manuscripts(
    client: &ApiClient,
    printer: Printer,
    command: ManuscriptCommand,
) -> anyhow::Result<()> {
    let api = client.manuscripts();
    match command {
        ManuscriptCommand::List { workspace } => printer.list(&api.list(workspace).await?),
        ManuscriptCommand::Show { id } => printer.one(&api.get(id).await?),
        ManuscriptCommand::Create {
            workspace,
            title,
            description,
            status,
        } => {
            let mut manuscript = CreateManuscript::new(workspace, title)?;
            if let Some(description) = description {
                manuscript = manuscript.with_description(description);
            }
            if let Some(status) = status {
                manuscript = manuscript.with_status(status);
            }
            printer.one(&api.create(&manuscript).await?)
        }
        ManuscriptCommand::Update {
            id,
            title,
            description,
            status,
        } => {
            let update = UpdateManuscript {
                title,
                description,
                status,
            };
            printer.one(&api.update(id, &update).await?)
        }
        ManuscriptCommand::Delete { id } => {
            api.delete(id).await?;
            printer.done("Manuscript deleted.");
            Ok(())
        }
    }
}

pub async fn chapters(
    client: &ApiClient,
    printer: Printer,
    command: ChapterCommand,
) -> anyhow::Result<()> {
    let api = client.manuscripts();
    match command {
        ChapterCommand::List { manuscript } => printer.list(&api.chapters(manuscript).await?),
        ChapterCommand::Create {
            manuscript,
            title,
            order,
        } => {
            let chapter = CreateChapter::new(title, order)?;
            printer.one(&api.create_chapter(manuscript, &chapter).await?)
        }
        ChapterCommand::Update {
            manuscript,
            chapter,
            title,
            order,
        } => {
            let update = UpdateChapter {
                title,
                order_index: order,
            };
            printer.one(&api.update_chapter(manuscript, chapter, &update).await?)
        }
        ChapterCommand::Delete {
            manuscript,
            chapter,
        } => {
            api.delete_chapter(manuscript, chapter).await?;
            printer.done("Chapter deleted.");
            Ok(())
        }
    }
}

pub async fn documents(
    client: &ApiClient,
    printer: Printer,
    command: DocumentCommand,
) -> anyhow::Result<()> {
    let api = client.manuscripts();
    match command {
        DocumentCommand::List {
            manuscript,
            chapter,
        } => printer.list(&api.chapter_documents(manuscript, chapter).await?),
        DocumentCommand::EditorConfig { document } => {
            printer.value(&api.editor_config(document).await?)
        }
    }
}
