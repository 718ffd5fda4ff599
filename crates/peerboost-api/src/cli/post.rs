//! Post moderation commands: list, feed, delete, clear.

use anyhow::Result;
use comfy_table::{presets, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use peerboost_types::post::{Category, Post, PostId};

use crate::state::AppState;

fn format_created(post: &Post) -> String {
    match post.created_at {
        Some(ts) => ts.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "-".to_string(),
    }
}

fn post_table(posts: &[Post]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Author", "Category", "Title", "URL", "Created"]);
    for post in posts {
        table.add_row(vec![
            post.id.to_string(),
            post.author_id.to_string(),
            post.category.to_string(),
            post.title.clone(),
            post.url.clone(),
            format_created(post),
        ]);
    }
    table
}

/// List all posts, optionally filtered by category.
pub async fn list_posts(state: &AppState, category: Option<String>, json: bool) -> Result<()> {
    let filter = category
        .map(|raw| raw.parse::<Category>().map_err(|e| anyhow::anyhow!(e)))
        .transpose()?;

    let mut posts = state.engine.posts().await;
    if let Some(category) = filter {
        posts.retain(|post| post.category == category);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    if posts.is_empty() {
        println!("No posts.");
        return Ok(());
    }
    println!("{}", post_table(&posts));
    println!("  {} post(s)", posts.len());
    Ok(())
}

/// Show the bounded per-category reciprocation feed.
pub async fn show_feed(state: &AppState, json: bool) -> Result<()> {
    let feed = state.engine.recent_feed().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&feed)?);
        return Ok(());
    }

    if feed.is_empty() {
        println!("The feed is empty.");
        return Ok(());
    }

    for (category, posts) in &feed {
        println!("{}", style(category.to_string()).cyan().bold());
        for (i, post) in posts.iter().enumerate() {
            println!("  {}. {} - {}", i + 1, post.title, post.url);
        }
        println!();
    }
    Ok(())
}

/// Delete a single post by id.
pub async fn delete_post(state: &AppState, id: PostId, force: bool, json: bool) -> Result<()> {
    if !force
        && !json
        && !Confirm::new()
            .with_prompt(format!("Delete post #{id}?"))
            .default(false)
            .interact()?
    {
        println!("Aborted.");
        return Ok(());
    }

    let removed = state.engine.delete_post(id).await?;

    if json {
        println!("{}", serde_json::json!({ "deleted": removed, "id": id }));
        return Ok(());
    }

    if removed {
        println!("  {} Post #{id} deleted.", style("✓").green().bold());
    } else {
        println!("  {} No post with id {id}.", style("✗").red().bold());
    }
    Ok(())
}

/// Delete every post.
pub async fn clear_posts(state: &AppState, force: bool, json: bool) -> Result<()> {
    if !force
        && !json
        && !Confirm::new()
            .with_prompt("Delete ALL posts? This cannot be undone")
            .default(false)
            .interact()?
    {
        println!("Aborted.");
        return Ok(());
    }

    let count = state.engine.clear_posts().await?;

    if json {
        println!("{}", serde_json::json!({ "deleted": count }));
        return Ok(());
    }

    println!(
        "  {} Deleted {count} post(s).",
        style("✓").green().bold()
    );
    Ok(())
}
