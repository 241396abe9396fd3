use data_loader::{load_records, Delimiter, RatingIndex};
use std::path::Path;
use std::time::Instant;

fn main() {
    let path = Path::new("data/ml-100k/u.data");

    println!("Loading MovieLens 100k ratings...\n");

    let start = Instant::now();
    let records = load_records(path, Delimiter::Tab).expect("Failed to load dataset");
    let loaded = start.elapsed();
    let index = RatingIndex::build_parallel(&records, 10_000);
    let elapsed = start.elapsed();

    let (users, items, ratings) = index.counts();

    println!("\n=== Load Complete ===");
    println!("Parse time: {:?}", loaded);
    println!("Parse + index time: {:?}", elapsed);
    println!("Users: {}", users);
    println!("Items: {}", items);
    println!("Ratings: {}", ratings);
    println!("\nPerformance: {:.0} ratings/second",
             ratings as f64 / elapsed.as_secs_f64());
}
