use crate::context::{finish, Context};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lander_common::WebsiteId;

pub async fn list(ctx: &Context) -> Result<()> {
    let websites = ctx.store.list().await?;
    if websites.is_empty() {
        println!("No pages yet. Run {} to make one.", "lander create".bright_white());
        return Ok(());
    }

    for website in websites {
        let edited: Vec<String> = website
            .localized_html
            .iter()
            .filter(|doc| !doc.content.is_empty())
            .map(|doc| doc.language.to_string())
            .collect();

        println!(
            "{:>4}  {}  {}  {}",
            website.id.to_string().bright_blue(),
            website.title.bold(),
            website.updated_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            if edited.is_empty() {
                "(empty)".dimmed().to_string()
            } else {
                edited.join(", ")
            }
        );
    }
    Ok(())
}

pub async fn create(ctx: &Context) -> Result<()> {
    let website = ctx.store.create().await?;
    println!(
        "  {} Created page {} ({})",
        "✓".green(),
        website.id.to_string().bright_white(),
        website.title
    );
    Ok(())
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Page id
    pub id: WebsiteId,

    /// New title
    pub title: String,
}

pub async fn rename(args: RenameArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.open_session(args.id, ctx.language(None)).await?;
    session.set_title(args.title);
    finish(&session).await?;

    println!("  {} Renamed page {} to {}", "✓".green(), args.id, session.title().bold());
    Ok(())
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Page id
    pub id: WebsiteId,
}

pub async fn delete(args: DeleteArgs, ctx: &Context) -> Result<()> {
    let website = ctx.store.delete(args.id).await?;
    println!("  {} Deleted page {} ({})", "✓".green(), website.id, website.title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::memory_context;
    use lander_editor::StoreError;

    #[tokio::test]
    async fn test_create_rename_delete() {
        let (store, ctx) = memory_context();

        create(&ctx).await.unwrap();
        list(&ctx).await.unwrap();

        rename(RenameArgs { id: 1, title: "Autumn".into() }, &ctx).await.unwrap();
        assert_eq!(store.get(1).unwrap().title, "Autumn");
        assert!(store.content_writes().is_empty());

        delete(DeleteArgs { id: 1 }, &ctx).await.unwrap();
        assert!(store.get(1).is_none());

        let error = delete(DeleteArgs { id: 1 }, &ctx).await.unwrap_err();
        assert_eq!(error.downcast_ref::<StoreError>(), Some(&StoreError::NotFound(1)));
    }
}
