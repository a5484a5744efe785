use std::env;

use coop_decide::{
    config::Config,
    models::{DEFAULT_ELEMENT_TYPE, NewElement},
    store::{PgStore, Store},
};

/// Parses one `title` or `title|type` line. Blank lines and `#` comments
/// yield nothing.
fn parse_line(line: &str) -> Option<NewElement> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (title, element_type) = match line.split_once('|') {
        Some((title, kind)) if !kind.trim().is_empty() => (title.trim(), kind.trim()),
        Some((title, _)) => (title.trim(), DEFAULT_ELEMENT_TYPE),
        None => (line, DEFAULT_ELEMENT_TYPE),
    };
    if title.is_empty() {
        return None;
    }

    Some(NewElement {
        title: title.to_string(),
        element_type: element_type.to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    coop_decide::init_tracing();

    let config = Config::load()?;
    let database_url = config
        .database_url
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;

    let store = PgStore::connect(&database_url, config.max_connections).await?;
    println!("Connected to database!");

    let path = env::args().nth(1).unwrap_or_else(|| "elements.txt".to_string());
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {path} - make sure it exists! ({e})"))?;

    let mut count = 0;
    let mut skipped = 0;

    for new in content.lines().filter_map(parse_line) {
        if store.element_title_exists(&new.title).await? {
            println!("⊘ Skipped (duplicate): {}", new.title);
            skipped += 1;
            continue;
        }

        let element = store.create_element(new).await?;
        count += 1;
        println!("✓ Loaded: {} [{}]", element.title, element.element_type);
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Successfully loaded {} new elements!", count);
    if skipped > 0 {
        println!("⊘ Skipped {} duplicate elements", skipped);
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    Ok(())
}
