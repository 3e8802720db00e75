use steam_auth_manager::{Account, AuthManager, Authenticator, ConfirmationType};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (username, account) = get_account();
    let manager = AuthManager::new();

    manager.add_account(&username, account)?;
    manager.login(&username).await?;

    let confirmations = manager.get_confirmations(&username).await?;

    if confirmations.is_empty() {
        println!("nothing to confirm");
    }

    for confirmation in confirmations {
        println!("{confirmation}");

        if confirmation.conf_type == ConfirmationType::Trade {
            let accepted = manager.accept_confirmation(&username, &confirmation).await?;

            println!("accepted: {accepted}");
        }
    }

    Ok(())
}

/// Gets the account from environment variables. Confirmations need the full
/// authenticator, not just the shared secret.
fn get_account() -> (String, Account) {
    dotenv::dotenv().ok();

    let username = std::env::var("USERNAME").expect("USERNAME missing");
    let account = Account::new(std::env::var("PASSWORD").expect("PASSWORD missing"))
        .with_authenticator(Authenticator {
            shared_secret: std::env::var("SHARED_SECRET").expect("SHARED_SECRET missing"),
            device_id: std::env::var("DEVICE_ID").expect("DEVICE_ID missing"),
            identity_secret: std::env::var("IDENTITY_SECRET").expect("IDENTITY_SECRET missing"),
        });

    (username, account)
}
