use crate::context::{finish, Context};
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use lander_common::{Language, WebsiteId};
use lander_editor::{PaletteItem, Selection};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Page id
    pub id: WebsiteId,

    /// Items to append: heading, paragraph or image
    #[arg(required = true, value_parser = parse_item)]
    pub items: Vec<PaletteItem>,

    /// Language to edit (defaults to the configured language)
    #[arg(short, long)]
    pub language: Option<Language>,
}

fn parse_item(value: &str) -> Result<PaletteItem, String> {
    match value.to_ascii_lowercase().as_str() {
        "heading" => Ok(PaletteItem::Heading),
        "paragraph" => Ok(PaletteItem::Paragraph),
        "image" => Ok(PaletteItem::Image),
        tag => PaletteItem::from_tag(tag).ok_or_else(|| format!("unknown item `{}`", value)),
    }
}

/// Append palette items to a page, as if dropped onto the canvas
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let language = ctx.language(args.language);
    let mut session = ctx.open_session(args.id, language).await?;

    for item in &args.items {
        session.drop_palette_item(*item)?;
        println!("  {} Added {}", "+".green(), item);
    }
    finish(&session).await?;

    println!("  {} Saved {} ({})", "✓".green(), args.id, language);
    Ok(())
}

#[derive(Debug, Args)]
pub struct PushArgs {
    /// Page id
    pub id: WebsiteId,

    /// HTML file to upload
    pub file: PathBuf,

    /// Language to replace (defaults to the configured language)
    #[arg(short, long)]
    pub language: Option<Language>,
}

/// Replace a language's document with a local HTML file. The file goes
/// through the code editor, so what is stored is the normalized markup.
pub async fn push(args: PushArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve(&args.file);
    let source = std::fs::read_to_string(&path)?;
    if let Err(e) = lander_parser::try_parse(&source) {
        bail!("{}: {}", path.display(), e);
    }

    let language = ctx.language(args.language);
    let mut session = ctx.open_session(args.id, language).await?;
    session.enter_code_mode();
    let caret = Selection::caret(source.chars().count());
    session.code_input(source, caret)?;
    session.enter_visual_mode();
    finish(&session).await?;

    println!(
        "  {} Pushed {} to page {} ({}, {} elements)",
        "✓".green(),
        args.file.display(),
        args.id,
        language,
        session.elements().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::{memory_context, memory_context_in};
    use lander_editor::PageStore;

    #[test]
    fn test_parse_item_accepts_names_and_tags() {
        assert_eq!(parse_item("Heading"), Ok(PaletteItem::Heading));
        assert_eq!(parse_item("p"), Ok(PaletteItem::Paragraph));
        assert_eq!(parse_item("IMG"), Ok(PaletteItem::Image));
        assert!(parse_item("video").is_err());
    }

    #[tokio::test]
    async fn test_add_saves_serialized_items() {
        let (store, ctx) = memory_context();
        let id = store.create().await.unwrap().id;

        let args = AddArgs {
            id,
            items: vec![PaletteItem::Heading, PaletteItem::Image],
            language: Some(Language::EN),
        };
        add(args, &ctx).await.unwrap();

        let website = store.get(id).unwrap();
        assert_eq!(
            website.content(Language::EN),
            "<h1>ここにテキスト</h1><img src=\"/noimage.png\" />"
        );
        assert_eq!(website.content(Language::JP), "");
    }

    #[tokio::test]
    async fn test_push_normalizes_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.html"), "<H1 CLASS=title>Hi</H1>\n<p>there").unwrap();

        let (store, ctx) = memory_context_in(dir.path());
        let id = store.create().await.unwrap().id;

        let args = PushArgs {
            id,
            file: "page.html".into(),
            language: None,
        };
        push(args, &ctx).await.unwrap();

        assert_eq!(
            store.get(id).unwrap().content(Language::JP),
            "<h1 class=\"title\">Hi</h1><p>there</p>"
        );
    }

    #[tokio::test]
    async fn test_push_rejects_text_only_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("note.txt"), "just words").unwrap();

        let (store, ctx) = memory_context_in(dir.path());
        let id = store.create().await.unwrap().id;

        let args = PushArgs {
            id,
            file: "note.txt".into(),
            language: None,
        };
        assert!(push(args, &ctx).await.is_err());
        assert!(store.content_writes().is_empty());
    }
}
