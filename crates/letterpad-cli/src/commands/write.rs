use super::App;
use anyhow::{Context, Result};
use letterpad_application::EditorSurface;
use std::path::Path;

/// Opens an editor, applies the edits and closes it, which saves.
pub async fn run(
    app: &App,
    id: Option<&str>,
    title: &str,
    body: Option<String>,
    body_file: Option<&Path>,
) -> Result<()> {
    let body = match body_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => body,
    };

    let editor = match id {
        Some(id) => EditorSurface::open(app.store.clone(), id, app.editor_options).await?,
        None => EditorSurface::new_document(app.store.clone(), app.editor_options),
    };

    editor.set_title(title);
    if let Some(body) = body {
        editor.set_body(body);
    }
    tracing::debug!("[write] {} after edits", editor.state());

    let document = editor.close().await?;
    let stats = document.stats();
    println!(
        "{}  ({} words, {} characters)",
        document.id.as_deref().unwrap_or("-"),
        stats.words,
        stats.characters
    );
    Ok(())
}
