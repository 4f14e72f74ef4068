//! Catalog browsing and cache maintenance commands.

use atlas_client::catalog::{CatalogClient, CatalogError};
use atlas_core::{Character, CharacterId};

/// Fetch and print one catalog page.
pub async fn page(catalog: &CatalogClient, number: u32) -> Result<(), CatalogError> {
    let page = catalog.fetch_page(number).await?;
    println!(
        "Page {number} of {} ({} characters total)",
        page.info.pages, page.info.count
    );
    for character in &page.results {
        print_row(character);
    }
    Ok(())
}

/// Fetch and print one or more characters by ID.
pub async fn characters(catalog: &CatalogClient, ids: &[u32]) -> Result<(), CatalogError> {
    let ids: Vec<CharacterId> = ids.iter().copied().map(CharacterId::new).collect();
    let characters = catalog.fetch_by_ids(&ids).await?;
    if characters.len() < ids.len() {
        eprintln!("{} of {} IDs could not be fetched", ids.len() - characters.len(), ids.len());
    }
    for character in &characters {
        print_detail(character);
    }
    Ok(())
}

/// Search the catalog by name and print the first page of matches.
pub async fn search(catalog: &CatalogClient, name: &str) -> Result<(), CatalogError> {
    let page = catalog.search(name).await?;
    if page.results.is_empty() {
        println!("No characters match {name:?}");
        return Ok(());
    }
    println!("{} matches across {} pages", page.info.count, page.info.pages);
    for character in &page.results {
        print_row(character);
    }
    Ok(())
}

/// Print cache entry counts.
pub fn cache_stats(catalog: &CatalogClient) {
    let stats = catalog.cache_stats();
    println!(
        "Cache: {} entries ({} valid, {} expired)",
        stats.total, stats.valid, stats.expired
    );
}

/// Drop expired cache entries and report the count.
pub fn cache_sweep(catalog: &CatalogClient) {
    let removed = catalog.sweep_expired();
    println!("Removed {removed} expired entries");
}

/// Drop every cache entry.
pub fn cache_clear(catalog: &CatalogClient) {
    catalog.clear_cache();
    println!("Cache cleared");
}

fn print_row(character: &Character) {
    println!(
        "{:>5}  {:<30} {:<8} {}",
        character.id.as_u32(),
        character.name,
        character.status.to_string(),
        character.species
    );
}

fn print_detail(character: &Character) {
    println!("#{} {}", character.id, character.name);
    println!("  status:   {}", character.status);
    println!("  species:  {}", character.species);
    println!("  origin:   {}", character.origin.name);
    println!("  episodes: {}", character.episode.len());
}
