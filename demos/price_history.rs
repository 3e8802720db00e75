use steam_auth_manager::{Account, AuthManager, MarketAPI};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let username = std::env::var("USERNAME").expect("USERNAME missing");
    let password = std::env::var("PASSWORD").expect("PASSWORD missing");
    let manager = AuthManager::new();

    manager.add_account(&username, Account::new(password))?;
    manager.login(&username).await?;

    let market = MarketAPI::new(manager);
    let history = market.price_history(&username, 440, "Mann Co. Supply Crate Key").await?;

    // The most recent points aggregate an hour of sales each.
    for point in history.prices.iter().rev().take(5) {
        println!(
            "{}: {}{}{} ({} sold)",
            point.date.format("%b %d %Y %H:%M"),
            history.price_prefix,
            point.price,
            history.price_suffix,
            point.volume,
        );
    }

    Ok(())
}
