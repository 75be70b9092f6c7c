use crate::context::Context;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lander_common::{Language, WebsiteId};
use lander_editor::label_for_tag;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Page id
    pub id: WebsiteId,

    /// Language to show (defaults to the configured language)
    #[arg(short, long)]
    pub language: Option<Language>,

    /// List the top-level elements instead of the HTML
    #[arg(short, long)]
    pub elements: bool,
}

pub async fn show(args: ShowArgs, ctx: &Context) -> Result<()> {
    let language = ctx.language(args.language);
    let website = ctx.store.fetch(args.id).await?;
    let session = lander_editor::EditorSession::open(&website, language, (&ctx.config).into());

    println!("{} {} ({})", website.id.to_string().bright_blue(), session.title().bold(), language);
    println!();

    if args.elements {
        for (index, element) in session.elements().iter().enumerate() {
            println!(
                "  {:>3}  {:<8} {}",
                index + 1,
                label_for_tag(&element.tag).cyan(),
                element.text()
            );
        }
        return Ok(());
    }

    let numbers = session.line_numbers();
    let width = numbers.last().map_or(1, |n| n.len());
    for (number, line) in numbers.iter().zip(session.html().split('\n')) {
        println!("{:>width$} │ {}", number.dimmed(), line, width = width);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::memory_context;
    use lander_editor::PageStore;

    #[tokio::test]
    async fn test_show_missing_page_fails() {
        let (store, ctx) = memory_context();
        let id = store.create().await.unwrap().id;

        let ok = ShowArgs { id, language: None, elements: true };
        assert!(show(ok, &ctx).await.is_ok());

        let missing = ShowArgs { id: id + 1, language: None, elements: false };
        assert!(show(missing, &ctx).await.is_err());
    }
}
