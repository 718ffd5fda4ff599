//! Session inspection commands.

use anyhow::Result;
use comfy_table::{presets, ContentArrangement, Table};

use peerboost_types::session::SessionState;

use crate::state::AppState;

fn collected_fields(state: &SessionState) -> String {
    match state {
        SessionState::AwaitingTitle { category } => format!("category={category}"),
        SessionState::AwaitingUrl { category, title } => {
            format!("category={category}, title={title:?}")
        }
        _ => String::new(),
    }
}

/// List active conversation sessions with their collected data.
pub async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    let sessions = state.engine.sessions().await;

    if json {
        let entries: Vec<_> = sessions
            .iter()
            .map(|(user, session)| {
                serde_json::json!({
                    "user_id": user,
                    "session": session,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No active sessions.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["User", "State", "Collected"]);
    for (user, session) in &sessions {
        table.add_row(vec![
            user.to_string(),
            session.to_string(),
            collected_fields(session),
        ]);
    }
    println!("{table}");
    Ok(())
}
