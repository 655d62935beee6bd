use std::time::Duration;

use agcod::payload::generate_creation_request_id;
use agcod::{Client, CreateResponse, Error};
use anyhow::{anyhow, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Reads AWS_GIFT_CARD_KEY, AWS_GIFT_CARD_SECRET, AWS_GIFT_CARD_PARTNER_ID,
    // AWS_GIFT_CARD_ENDPOINT and AWS_GIFT_CARD_CURRENCY.
    let _ = dotenv::dotenv();
    let client = Client::from_env()?;
    println!("Using {} in {}", client.endpoint(), client.region());

    let funds = client.get_available_funds().await?;
    println!("Available funds: {} {}", funds.amount(), funds.currency());

    let partner_id = client
        .config()
        .partner_id
        .clone()
        .ok_or_else(|| anyhow!("AWS_GIFT_CARD_PARTNER_ID must be set"))?;
    // Resending with the same id never buys a second card.
    let request_id = generate_creation_request_id(&partner_id);
    let card = buy(&client, &request_id).await?;
    println!(
        "Bought {} {} card {} with claim code {}",
        card.value(),
        card.currency(),
        card.id(),
        card.claim_code()
    );

    let cancelled = client
        .cancel_gift_card(card.creation_request_id(), card.id())
        .await
        .map_err(report)?;
    println!("Cancelled card {}: {}", cancelled.id(), cancelled.status());

    Ok(())
}

async fn buy(client: &Client, request_id: &str) -> Result<CreateResponse> {
    match client.buy_gift_card(1000.0, Some(request_id)).await {
        Ok(card) => Ok(card),
        Err(err) if err.is_retryable() => {
            eprintln!("AGCOD asked to resend: {}", err.message());
            tokio::time::sleep(Duration::from_secs(1)).await;
            client
                .buy_gift_card(1000.0, Some(request_id))
                .await
                .map_err(report)
        }
        Err(err) => Err(report(err)),
    }
}

fn report(err: Error) -> anyhow::Error {
    eprintln!("{}", err.to_json());
    err.into()
}
