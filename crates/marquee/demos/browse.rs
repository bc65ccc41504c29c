//! Browse popular movies, open one and leave a comment
//!
//! Needs `MARQUEE_TMDB_API_KEY`; state is kept in `./marquee-state.json`.

use marquee::prelude::*;
use marquee::{CatalogKey, TracingMetrics};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = TypedStore::new(FileStore::open("marquee-state.json")?);
    let context = Arc::new(AppContext::hydrate(store.clone()));
    if !context.is_authenticated() {
        context.login("guest", "guest@example.com")?;
    }

    let config = CatalogConfig::from_env()?;
    let catalog = Catalog::with_metrics(
        marquee::TmdbClient::new(&config)?,
        &config,
        TracingMetrics::new().with_cache_name("catalog"),
    );

    let mut browse = BrowseState::new();
    let state = catalog.popular(browse.page(), context.language()).await;
    let Some(page) = state.value() else {
        println!("nothing to show");
        return Ok(());
    };

    for movie in browse.visible(&page.results) {
        println!("{:>8}  {} ({}) {}%", movie.id, movie.title, movie.year, movie.match_score);
    }
    let window = browse.window(page.total_pages);
    println!("page {} of {}", window.current(), window.total());

    browse.change_page(2, page.total_pages);
    catalog.popular(browse.page(), context.language()).await;
    let cached = catalog.list_snapshot(&CatalogKey::Popular {
        page: 2,
        language: context.language(),
    });
    println!("page 2 cached: {}", cached.is_success());

    let Some(first) = page.results.first() else {
        return Ok(());
    };

    let engagement = EngagementStore::new(store);
    let mount = engagement.mount(first.id.clone());
    let record = mount.record_view()?;
    println!(
        "{}: {} likes, {} views",
        first.title,
        marquee::engagement::format_count(record.likes),
        marquee::engagement::format_count(record.views)
    );

    let comments = CommentAggregator::from_config(context.clone(), &CommentConfig::from_env())?;
    comments.post(&first.id, "Watched it again tonight")?;
    for comment in comments.feed(&first.id).await? {
        println!("[{}] {}: {}", comment.created_at.format("%Y-%m-%d"), comment.username, comment.text);
    }

    Ok(())
}
