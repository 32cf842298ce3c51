use super::App;
use anyhow::{Result, bail};
use letterpad_core::Document;
use letterpad_core::document::{CollectionQuery, SortOrder};

const PREVIEW_CHARS: usize = 120;

pub async fn list(app: &App, search: Option<&str>, asc: bool) -> Result<()> {
    app.store.list().await?;

    let mut query = CollectionQuery::new();
    if let Some(search) = search {
        query = query.with_search(search);
    }
    if asc {
        query = query.with_order(SortOrder::Asc);
    }

    let documents = app.store.query(&query).await;
    if documents.is_empty() {
        println!("No letters");
        return Ok(());
    }
    for doc in &documents {
        println!(
            "{}  {}  {}",
            doc.id.as_deref().unwrap_or("-"),
            updated(doc),
            doc.title
        );
        let preview = doc.preview(PREVIEW_CHARS);
        if !preview.is_empty() {
            println!("    {}", preview.replace('\n', " "));
        }
        if let Some(url) = doc.external_url() {
            println!("    Google Drive: {}", url);
        }
    }
    Ok(())
}

pub async fn show(app: &App, id: &str) -> Result<()> {
    let doc = app.store.get(id).await?;
    let stats = doc.stats();

    println!("{}", doc.title);
    println!("updated {}  |  {} words, {} characters", updated(&doc), stats.words, stats.characters);
    if let Some(url) = doc.external_url() {
        println!("Google Drive: {}", url);
    }
    println!();
    println!("{}", doc.plain_text());
    Ok(())
}

pub async fn delete(app: &App, id: &str) -> Result<()> {
    if !app.store.delete(id).await {
        bail!("Letter {} was not deleted", id);
    }
    Ok(())
}

fn updated(doc: &Document) -> String {
    doc.updated_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
