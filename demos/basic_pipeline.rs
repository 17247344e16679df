//! Basic example demonstrating co-occurrence matrix construction.
//!
//! This example shows how to:
//! 1. Create synthetic co-occurrence triples
//! 2. Profile the frequency distribution
//! 3. Run the construction pipeline
//! 4. Examine the resulting matrix

use cooc_matrix::prelude::*;

fn main() -> Result<()> {
    println!("=== Co-occurrence Matrix Example ===\n");

    let triples = create_example_triples();
    println!("Loaded {} triples\n", triples.len());

    // Profile the data
    println!("=== Data Profiling ===\n");
    let profile = profile_frequencies(&triples);
    println!("{}", profile);

    // Run the pipeline
    println!("=== Running Construction Pipeline ===\n");

    let (matrix, report) = Pipeline::new()
        .name("example")
        .percentile(0.25) // Drop the weakest quarter of pairs
        .lowercase(true)
        .exclude_rows(vec!["current".to_string()])
        .run(&triples)?;

    println!("{}", report);

    // Examine the matrix
    println!("=== Final Matrix ===\n");
    let sparsity = profile_sparsity(&matrix);
    println!("{}", sparsity);

    print!("{:>12}", "");
    for col_label in matrix.col_labels() {
        print!("{:>12}", col_label);
    }
    println!();
    for (row, row_label) in matrix.row_labels().iter().enumerate() {
        print!("{:>12}", row_label);
        for col in 0..matrix.n_cols() {
            print!("{:>12}", matrix.get(row, col));
        }
        println!();
    }

    Ok(())
}

/// Synthetic environment-disease co-occurrence counts.
fn create_example_triples() -> TripleTable {
    TripleTable::new(vec![
        Triple::new("cancer", "current", 50112),
        Triple::new("depression", "current", 32291),
        Triple::new("anxiety", "current", 23458),
        Triple::new("asthma", "wildfire", 17442),
        Triple::new("Asthma", "Wildfire", 310),
        Triple::new("cholera", "flood", 9120),
        Triple::new("malaria", "flood", 7211),
        Triple::new("stress", "heatwave", 5030),
        Triple::new("stress", "heatwave", 412),
        Triple::new("diarrhea", "flood", 1600),
        Triple::new("dengue", "drought", 12),
        Triple::new("zika", "drought", 3),
    ])
}
