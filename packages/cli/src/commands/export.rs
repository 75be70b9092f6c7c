use crate::context::Context;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lander_common::{Language, WebsiteId};
use lander_editor::export_download;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Page id
    pub id: WebsiteId,

    /// Language to export (defaults to the configured language)
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Write the stored HTML of one language as `index.html`
pub async fn export(args: ExportArgs, ctx: &Context) -> Result<()> {
    let language = ctx.language(args.language);
    let website = ctx.store.fetch(args.id).await?;

    let out_dir = ctx.resolve(&args.out_dir);
    std::fs::create_dir_all(&out_dir)?;
    let download = export_download(&website, language);
    let path = download.write_to(&out_dir)?;

    println!(
        "  {} Exported {} ({}) → {} [{}, {} bytes]",
        "✓".green(),
        website.title,
        language,
        path.display(),
        download.mime,
        download.bytes.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::memory_context_in;
    use lander_editor::PageStore;

    #[tokio::test]
    async fn test_export_writes_index_html() {
        let dir = tempfile::tempdir().unwrap();
        let (store, ctx) = memory_context_in(dir.path());
        let id = store.create().await.unwrap().id;
        store.update_content(id, Language::CN, "<p>你好</p>").await.unwrap();

        let args = ExportArgs {
            id,
            language: Some(Language::CN),
            out_dir: "dist".into(),
        };
        export(args, &ctx).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("dist").join("index.html")).unwrap();
        assert_eq!(written, "<p>你好</p>");
    }
}
