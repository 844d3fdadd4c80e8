//! ASCII preview of a generated map, for eyeballing terrain tuning.
//! Run with: cargo run --bin map_preview -- [seed] [radius]

use hexstead::constants::WORLD_SEED;
use hexstead::hex::HexCoord;
use hexstead::map::{HexMap, Terrain};

const LEGEND: [(Terrain, char, &str); 7] = [
    (Terrain::Water, '~', "water"),
    (Terrain::Coast, ',', "coast"),
    (Terrain::Grass, '.', "grass"),
    (Terrain::Road, '=', "road"),
    (Terrain::River, '%', "river"),
    (Terrain::Hill, '^', "hill"),
    (Terrain::Mountain, 'A', "mountain"),
];

fn main() {
    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .map(|arg| arg.parse().expect("seed must be an integer"))
        .unwrap_or(WORLD_SEED);
    let radius: i32 = args
        .next()
        .map(|arg| arg.parse().expect("radius must be an integer"))
        .unwrap_or(24);

    println!("Generating seed {seed} out to radius {radius}...");
    let mut map = HexMap::new(seed);
    map.generate_area(HexCoord::ZERO, radius);

    let mut counts = [0usize; LEGEND.len()];
    for r in -radius..=radius {
        let mut row = String::new();
        for q in -radius..=radius {
            match map.tile(HexCoord::new(q, r)) {
                Some(tile) => {
                    let index = LEGEND
                        .iter()
                        .position(|(terrain, _, _)| *terrain == tile.terrain)
                        .unwrap_or(0);
                    counts[index] += 1;
                    row.push(LEGEND[index].1);
                }
                None => row.push(' '),
            }
            row.push(' ');
        }
        // One extra half-cell indent per row mirrors the axial shear.
        let indent = (r + radius) as usize;
        println!("{}{}", " ".repeat(indent), row.trim_end());
    }

    println!();
    let total: usize = counts.iter().sum();
    for (index, (_, glyph, name)) in LEGEND.iter().enumerate() {
        let share = 100.0 * counts[index] as f64 / total.max(1) as f64;
        println!("{glyph} {name:<9} {:>7} ({share:.1}%)", counts[index]);
    }
    println!("total tiles: {total} across {} chunks", map.chunk_count());
}
