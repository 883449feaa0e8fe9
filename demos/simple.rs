//! Basic encoding and decoding, with a re-encode check.
//!
//! Run with: cargo run --example simple

use refjson::{from_str, impl_object, to_string};
use std::error::Error;

#[derive(Debug, PartialEq)]
struct Matrix {
    row: Vec<i32>,
    empty_row: Vec<i32>,
    grid: Vec<Vec<i32>>,
    empty_grid: Vec<Vec<i32>>,
    label: String,
    cached_sum: i64,
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix {
            row: Vec::new(),
            empty_row: Vec::new(),
            grid: Vec::new(),
            empty_grid: Vec::new(),
            label: String::new(),
            cached_sum: -1,
        }
    }
}

impl_object!(Matrix {
    row: Vec<i32>,
    empty_row: Vec<i32>,
    grid: Vec<Vec<i32>>,
    empty_grid: Vec<Vec<i32>>,
    label: String,
    #[ignore]
    cached_sum: i64,
});

/// Every character position where the two encodings differ.
fn differences(a: &str, b: &str) -> Vec<(usize, char, char)> {
    a.chars()
        .zip(b.chars())
        .enumerate()
        .filter(|(_, (x, y))| x != y)
        .map(|(i, (x, y))| (i, x, y))
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    let matrix = Matrix {
        row: vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0],
        grid: vec![
            vec![1, 2, 3, 4, 5],
            vec![5, 4, 3, 2, 1],
            vec![2, 4, 6],
            vec![],
        ],
        label: "a \"quoted\" label".to_string(),
        cached_sum: 42,
        ..Default::default()
    };

    let first = to_string(&matrix)?;
    println!("Encoded:\n{}\n", first);

    let decoded: Matrix = from_str(&first)?;
    let second = to_string(&decoded)?;
    println!("Re-encoded:\n{}\n", second);

    for (i, a, b) in differences(&first, &second) {
        println!("  offset {}: {:?} vs {:?}", i, a, b);
    }
    println!("original = decoded: {}", first == second);
    println!("ignored member after decoding: {}", decoded.cached_sum);

    Ok(())
}
