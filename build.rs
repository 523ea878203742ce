use anyhow::Result;
use vergen::EmitBuilder;

// Build metadata for the verbose version banner
fn main() -> Result<()> {
    EmitBuilder::builder()
        .git_sha(true)
        .git_commit_date()
        .cargo_target_triple()
        .emit()?;
    Ok(())
}
