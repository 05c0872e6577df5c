use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use log::{info, warn};
use snapshot_core::ledger::artifact::resolve_token_address;
use snapshot_core::ledger::{JsonRpcLedger, RpcClient};
use snapshot_core::sheets::{GoogleOAuth, TokenStorage};

use crate::config::Config;

fn prompt(question: &str) -> Result<String> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    let answer = answer.trim().to_string();
    if answer.is_empty() {
        bail!("No input given");
    }
    Ok(answer)
}

/// Connect to the local node, falling back to a remote endpoint (configured or prompted).
pub async fn connect_node(config: &Config) -> Result<RpcClient> {
    let local = RpcClient::new(&config.local_node_url, config.rpc_timeout)?;
    if local.is_listening().await {
        info!("Node connected successfully at {}", local.url());
        return Ok(local);
    }

    warn!(
        "No local node found at {}, using remote endpoint...",
        config.local_node_url
    );

    let endpoint = match &config.remote_node_url {
        Some(endpoint) => endpoint.clone(),
        None => prompt("Provide a remote node endpoint: ")?,
    };

    let remote = RpcClient::new(&endpoint, config.rpc_timeout)?;
    if !remote.is_listening().await {
        bail!("Node connection error at {}, exiting", endpoint);
    }

    info!("Node connected successfully at {}", remote.url());
    Ok(remote)
}

/// Wrap the connected node as a ledger for the configured or artifact-recorded token.
pub async fn open_ledger(config: &Config, rpc: RpcClient) -> Result<JsonRpcLedger> {
    let token = match config.token_address {
        Some(address) => address,
        None => resolve_token_address(&rpc, &config.token_artifact).await?,
    };

    Ok(JsonRpcLedger::new(rpc, token))
}

/// Produce an access token for the spreadsheet API, prompting for an authorization code
/// only when no token has been stored yet.
pub async fn authorize_sheets(config: &Config) -> Result<String> {
    let oauth = GoogleOAuth::from_file(&config.credentials_path)?;
    let storage = TokenStorage::new(&config.token_path);

    let token = match storage.load()? {
        Some(token) => {
            let (token, refreshed) = oauth.ensure_fresh(token).await?;
            if refreshed {
                storage.store(&token)?;
            }
            token
        }
        None => {
            println!(
                "Authorize this app by visiting this url: {}",
                oauth.auth_url()
            );
            let code = prompt("Enter the code from that page here: ")?;
            let token = oauth.exchange_code(&code).await?;
            storage.store(&token)?;
            token
        }
    };

    Ok(token.access_token)
}
