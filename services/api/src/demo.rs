use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use brand_board::brands::{BrandForm, BrandService};
use brand_board::error::{ApiError, AppError};
use brand_board::leaderboard::{LeaderboardRow, LeaderboardService};
use brand_board::lists::{ListService, NewBrandList, NewListItem};
use brand_board::media::ImageUpload;
use brand_board::normalizer::{normalize_document, DisplayBrand};
use brand_board::ratings::{RatingService, RatingSubmission, VoterId};
use brand_board::store::{MemoryImageStore, MemoryStore};
use clap::Args;
use serde_json::{json, Value};

const DEMO_BRANDS: [(&str, &str, &str); 5] = [
    ("Aurora Farms", "Sun-grown flower from the coast", "Flower, Pre-rolls"),
    ("Borealis Labs", "Solventless concentrates", "Concentrates, featured"),
    ("Cedar & Smoke", "Small-batch edibles", "Edibles"),
    ("Driftwood", "Everyday vapes", "Vapes, Cartridges"),
    ("Evergreen Co.", "Heritage strains", "Flower, featured"),
];

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// JSON file holding one record or an array of records
    pub(crate) path: PathBuf,
    /// Pretty-print the display cards
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of distinct voters casting ratings
    #[arg(long, default_value_t = 6)]
    pub(crate) voters: usize,
    /// Print the leaderboard as display cards (JSON) instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_normalize(args: NormalizeArgs) -> Result<(), AppError> {
    let raw = fs::read_to_string(&args.path)?;
    let document: Value = serde_json::from_str(&raw)?;
    let cards = normalize_document(&document)?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&cards)?
    } else {
        serde_json::to_string(&cards)?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let seeded = seed_demo(args.voters)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&seeded.cards)?);
        return Ok(());
    }

    println!("Brand leaderboard demo ({} voters)", args.voters);
    println!(
        "{:<4} {:<16} {:>7} {:>7} {:>7} {:>7} {:>7} {:>6}",
        "#", "brand", "overall", "potency", "flavor", "effects", "value", "votes"
    );
    for (position, row) in seeded.rows.iter().enumerate() {
        println!(
            "{:<4} {:<16} {:>7.2} {:>7.2} {:>7.2} {:>7.2} {:>7.2} {:>6}",
            position + 1,
            row.name,
            row.avg_overall,
            row.avg_potency,
            row.avg_flavor,
            row.avg_effects,
            row.avg_value,
            row.total_ratings
        );
    }

    let featured: Vec<&str> = seeded
        .cards
        .iter()
        .filter(|card| card.featured)
        .map(|card| card.name.as_str())
        .collect();
    println!("\nFeatured: {}", featured.join(", "));
    println!(
        "Staff picks pulse: {} up / {} down",
        seeded.pulse.0, seeded.pulse.1
    );
    Ok(())
}

pub(crate) struct SeededDemo {
    pub(crate) rows: Vec<LeaderboardRow>,
    pub(crate) cards: Vec<DisplayBrand>,
    pub(crate) pulse: (u64, u64),
}

/// Build an in-memory directory, let `voters` clients rate every brand, and
/// collect the resulting leaderboard.
pub(crate) fn seed_demo(voters: usize) -> Result<SeededDemo, AppError> {
    let store = Arc::new(MemoryStore::new());
    let images = Arc::new(MemoryImageStore::default());
    let brands = BrandService::new(store.clone(), images);
    let ratings = RatingService::new(store.clone());
    let lists = ListService::new(store.clone());
    let board = LeaderboardService::new(store);

    let mut created = Vec::new();
    for (name, description, categories) in DEMO_BRANDS {
        let draft = BrandForm::default()
            .with_field("name", name)
            .with_field("description", description)
            .with_field("categories", categories)
            .draft()
            .map_err(|err| ApiError::validation(err.to_string()))?;
        let logo = ImageUpload {
            file_name: format!("{name}.png"),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        };
        created.push(brands.create(draft, Some(logo)).map_err(ApiError::from)?);
    }

    for voter in 0..voters {
        let voter_id = VoterId(format!("203.0.113.{}", voter + 1));
        for (index, brand) in created.iter().enumerate() {
            let submission: RatingSubmission = serde_json::from_value(json!({
                "potency_rating": demo_score(index, voter, 0),
                "flavor_rating": demo_score(index, voter, 1),
                "effects_rating": demo_score(index, voter, 2),
                "value_rating": demo_score(index, voter, 3),
                "overall_rating": demo_score(index, voter, 4),
            }))?;
            ratings
                .rate(brand.id, &voter_id, &submission)
                .map_err(ApiError::from)?;
        }
    }

    let list = lists
        .create_list(NewBrandList {
            title: "Staff picks".to_string(),
            description: Some("Rotating favourites".to_string()),
            is_active: true,
        })
        .map_err(ApiError::from)?;
    let mut pulse = (0, 0);
    if let Some(first) = created.first() {
        let item = lists
            .add_item(
                list.id,
                NewListItem {
                    brand_id: first.id,
                    position: None,
                },
            )
            .map_err(ApiError::from)?;
        for direction in ["up", "up", "down"] {
            let updated = lists
                .vote(list.id, item.id, direction)
                .map_err(ApiError::from)?;
            pulse = (updated.upvotes, updated.downvotes);
        }
    }

    Ok(SeededDemo {
        rows: board.rows().map_err(ApiError::from)?,
        cards: board.display().map_err(ApiError::from)?,
        pulse,
    })
}

/// Deterministic score in 1..=10 so demo output is stable between runs.
fn demo_score(brand: usize, voter: usize, dimension: usize) -> i64 {
    let spread = (brand * 7 + voter * 3 + dimension * 5) % 6;
    (10 - brand as i64).clamp(4, 10) - spread as i64 / 2
}
