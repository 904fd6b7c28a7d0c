use anyhow::{anyhow, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

const MAX_RETRIES: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Seed data pulled from the provisioning endpoint: raw master and ZIP
/// reference CSV text, ready for `Table::parse`.
pub struct SeedData {
    pub master_csv: String,
    pub zips_csv: String,
}

/// Fetch the master and ZIP seed files from `<base>/api/file1` and
/// `<base>/api/file2`.
pub async fn fetch_seed(client: &Client, base_url: &str) -> Result<SeedData> {
    let base = base_url.trim_end_matches('/');
    let master_csv = fetch_text(client, &format!("{base}/api/file1")).await?;
    let zips_csv = fetch_text(client, &format!("{base}/api/file2")).await?;
    info!(
        "fetched seed data: master {} bytes, zips {} bytes",
        master_csv.len(),
        zips_csv.len()
    );
    Ok(SeedData {
        master_csv,
        zips_csv,
    })
}

/// GET one URL as text, retrying transient failures.
async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let mut attempt = 0;

    // retry loop
    loop {
        attempt += 1;

        let resp = client.get(url).send().await;
        match resp {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(text) => return Ok(text),
                Err(_) if attempt < MAX_RETRIES => {
                    sleep(RETRY_DELAY).await;
                    continue;
                }
                Err(e) => return Err(e.into()),
            },
            Err(_) if attempt < MAX_RETRIES => {
                sleep(RETRY_DELAY).await;
                continue;
            }
            Ok(resp) => return Err(anyhow!("HTTP error fetching {}: {}", url, resp.status())),
            Err(e) => return Err(e.into()),
        }
    }
}
