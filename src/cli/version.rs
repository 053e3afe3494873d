/// Display version information
pub fn execute() {
    println!("dao-results {}", env!("CARGO_PKG_VERSION"));
    println!("Vote result aggregation for DAO governance proposals");
}
