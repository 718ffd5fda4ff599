//! Hub status dashboard command.

use anyhow::Result;
use console::style;

use peerboost_types::post::Category;

use crate::state::AppState;

/// Display hub status: post/user/session counts, per-category breakdown,
/// data location, and the effective feed limits.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let posts = state.engine.posts().await;
    let users = state.engine.users().await;
    let sessions = state.engine.sessions().await;

    let by_category: Vec<(Category, usize)> = Category::ALL
        .iter()
        .map(|&category| {
            let count = posts.iter().filter(|p| p.category == category).count();
            (category, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "data_file": state.config.data_file,
            "posts": {
                "total": posts.len(),
                "by_category": by_category
                    .iter()
                    .map(|(c, n)| (c.to_string(), n))
                    .collect::<std::collections::BTreeMap<_, _>>(),
            },
            "users": users.len(),
            "sessions": sessions.len(),
            "admins": state.config.admin_ids.len(),
            "feed_limit_per_category": state.config.feed_limit_per_category,
            "feed_max_total": state.config.feed_max_total,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("Peerboost hub").bold());
    println!("  data: {}", state.data_dir.join(&state.config.data_file).display());
    println!();
    println!(
        "  posts: {}   users: {}   active sessions: {}   admins: {}",
        style(posts.len()).cyan(),
        style(users.len()).cyan(),
        style(sessions.len()).cyan(),
        style(state.config.admin_ids.len()).cyan(),
    );
    if !by_category.is_empty() {
        println!();
        for (category, count) in by_category {
            println!("    {category}: {count}");
        }
    }
    println!();
    println!(
        "  feed: {} per category, {} total",
        state.config.feed_limit_per_category,
        if state.config.feed_max_total == 0 {
            "uncapped".to_string()
        } else {
            state.config.feed_max_total.to_string()
        }
    );
    println!();
    Ok(())
}
