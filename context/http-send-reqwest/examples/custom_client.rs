use agcod_core::Context;
use agcod_http_send_reqwest::ReqwestHttpSend;
use anyhow::Result;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Create a custom reqwest client with specific configuration
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .user_agent("agcod-example/1.0")
        .build()?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    // An unsigned call is rejected by the endpoint, which is enough to show
    // how transport and vendor failures are told apart.
    let req = http::Request::builder()
        .method("POST")
        .uri("https://agcod-v2-gamma.amazon.com/GetAvailableFunds")
        .header("content-type", "application/json")
        .body(Bytes::from_static(br#"{"partnerId":"Test"}"#))?;

    match ctx.http_send_as_string(req).await {
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            println!("Response body: {}", resp.body());
        }
        Err(e) => {
            eprintln!("Transport failed ({}): {e}", e.kind());
        }
    }

    Ok(())
}
