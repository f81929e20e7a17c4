use std::io::BufRead;

use crate::auth::PasswordHasher;
use crate::config::AppConfig;

/// Read one line from stdin and print its digest, for seeding the `users` table
pub async fn handle(config: &AppConfig, cost: Option<u32>) -> anyhow::Result<()> {
    let cost = cost.unwrap_or(config.security.hash_cost);
    let hasher = PasswordHasher::new(cost, 1)?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    println!("{}", digest_line(&hasher, &line).await?);
    Ok(())
}

async fn digest_line(hasher: &PasswordHasher, line: &str) -> anyhow::Result<String> {
    let password = line.trim_end_matches(|c| c == '\r' || c == '\n');
    if password.is_empty() {
        anyhow::bail!("no password given on stdin");
    }
    Ok(hasher.hash_bounded(password).await?)
}
