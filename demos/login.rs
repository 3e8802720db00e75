use steam_auth_manager::{Account, AuthManager, Authenticator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let username = std::env::var("USERNAME").expect("USERNAME missing");
    let password = std::env::var("PASSWORD").expect("PASSWORD missing");
    let manager = AuthManager::new();
    let mut account = Account::new(password);

    // With an authenticator attached two-factor challenges are answered
    // automatically.
    if let Ok(shared_secret) = std::env::var("SHARED_SECRET") {
        account = account.with_authenticator(Authenticator {
            shared_secret,
            device_id: std::env::var("DEVICE_ID").expect("DEVICE_ID missing"),
            identity_secret: std::env::var("IDENTITY_SECRET").expect("IDENTITY_SECRET missing"),
        });
    }

    manager.add_account(&username, account)?;
    manager.login(&username).await?;

    let steamid = manager.registry().steamid(&username)?;
    let sessionid = manager.sessionid(&username).await?;

    println!("logged in as {}", u64::from(steamid));
    println!("sessionid: {sessionid}");

    Ok(())
}
