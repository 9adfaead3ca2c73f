//! Prints an argon2 hash suitable for `ADMIN_PASSWORD_HASH`.

use furniture_inventory::services::auth_service::hash_password;

fn main() -> anyhow::Result<()> {
    let password = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: hash-password <password>"))?;
    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    println!("{hash}");
    Ok(())
}
