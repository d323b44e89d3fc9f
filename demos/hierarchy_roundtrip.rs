//! Parse bracket text, contract it as tensors and write the result back.
//!
//! Run with `RUST_LOG=sparsetensor=debug` to see parser and contraction events.

use sparsetensor::{Hierarchy, Standard, Tensor};
use tracing_subscriber::EnvFilter;

type T64 = Tensor<Standard<f64>>;

fn main() -> sparsetensor::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Hierarchy Round Trip ===\n");

    let a: Hierarchy<f64> = "{{1, 2, 0}, {0, 1, 3}, {4, 0, 1}}".parse()?;
    let b: Hierarchy<f64> = "{{2, 0, 1}, {1, 3, 0}, {0, 1, 5}}".parse()?;
    println!("A = {}", a);
    println!("B = {}\n", b);

    let ta = T64::from_hierarchy(&a)?;
    let tb = T64::from_hierarchy(&b)?;
    println!("A stores {} of {} entries", ta.nnz(), 9);

    // C[i,k] = Σ_j A[i,j] × B[j,k]
    let tc = ta.contract_top(&tb, 1, 0)?;
    println!("A·B = {}", tc.to_hierarchy()?);
    println!("tr(A·B) = {}\n", tc.trace()?);

    let jagged: Hierarchy<f64> = "{{1, 2}, {3}}".parse()?;
    match jagged.to_array() {
        Ok(_) => println!("unexpected: jagged text converted"),
        Err(e) => println!("{} -> {}", jagged, e),
    }

    tc.to_hierarchy()?.write_to(std::io::stdout())?;
    println!();
    Ok(())
}
