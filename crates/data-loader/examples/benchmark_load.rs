use data_loader::SimilarityStore;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data");

    println!("Loading movie list and similarity blocks...\n");

    let start = Instant::now();
    let store = SimilarityStore::load_from_files(data_dir)
        .expect("Failed to load similarity data");
    let elapsed = start.elapsed();

    let cells = store.dimension() * store.dimension();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", store.len());
    println!("Matrix: {}x{}", store.dimension(), store.dimension());
    println!("\nPerformance: {:.0} scores/second",
             cells as f64 / elapsed.as_secs_f64());

    let start = Instant::now();
    for index in 0..store.len() {
        std::hint::black_box(store.rank_similar(index, 8));
    }
    println!("Ranked every movie in {:?}", start.elapsed());
}
