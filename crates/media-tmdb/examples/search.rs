//! Search TMDB from the command line
//!
//! ```bash
//! export TMDB_API_KEY="your-key"
//! cargo run -p media-tmdb --example search -- "Dune"
//! ```

use media_core::{MediaKind, SearchService};
use media_tmdb::TmdbClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let query = std::env::args().nth(1).unwrap_or_else(|| "Dune".to_string());
    let client = TmdbClient::from_env()?;

    for kind in MediaKind::ALL {
        println!("== {kind}");
        for (i, item) in client.search(&query, kind).await?.iter().enumerate() {
            println!("{:>3}. {} ⭐ {:.1}", i + 1, item.formatted_title(), item.rating);
        }
    }

    Ok(())
}
