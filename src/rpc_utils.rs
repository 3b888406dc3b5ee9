use crate::net::{backoff_delay_ms, is_transient_status};
use crate::types::{BlockRecord, HeaderRecord, TxRecord};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;

/// Anything that can answer node JSON-RPC requests.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Issue `method` with positional `params` and return the envelope's
    /// `result` member.
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RpcAuth {
    pub user: String,
    pub password: String,
}

/// JSON-RPC 1.0 client over HTTP with basic auth and bounded retry.
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    auth: Option<RpcAuth>,
    timeout: Duration,
    retries: u32,
}

impl RpcClient {
    pub fn new(url: &str, auth: Option<RpcAuth>, timeout_ms: u64, retries: u32) -> Result<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            url: url.to_string(),
            auth,
            timeout: Duration::from_millis(timeout_ms),
            retries,
        })
    }

    /// Post one request and return the whole response envelope, including
    /// RPC-level errors. Transport failures and transient HTTP statuses are
    /// retried up to `retries` times.
    pub async fn call_raw(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let body = json!({"jsonrpc": "1.0", "id": "chainmon", "method": method, "params": params});
        let mut attempt = 0u32;
        loop {
            let mut req = self.http.post(&self.url).json(&body).timeout(self.timeout);
            if let Some(auth) = &self.auth {
                req = req.basic_auth(&auth.user, Some(&auth.password));
            }

            match req.send().await {
                Ok(res) => {
                    let status = res.status();
                    if status.is_success() {
                        return res
                            .json::<Value>()
                            .await
                            .with_context(|| format!("invalid JSON from {method}"));
                    }
                    // The node reports RPC failures as HTTP 500 with a JSON error body.
                    let text = res.text().await.unwrap_or_default();
                    if let Ok(v) = serde_json::from_str::<Value>(&text) {
                        if has_error(&v) {
                            return Ok(v);
                        }
                    }
                    if is_transient_status(status.as_u16()) && attempt < self.retries {
                        attempt += 1;
                        let delay = backoff_delay_ms(attempt);
                        log::debug!("{method}: http {status}, retry {attempt} in {delay}ms");
                        sleep(Duration::from_millis(delay)).await;
                        continue;
                    }
                    return Err(anyhow!("http {status} from {method}"));
                }
                Err(e) => {
                    if attempt < self.retries {
                        attempt += 1;
                        let delay = backoff_delay_ms(attempt);
                        log::debug!("{method}: {e}, retry {attempt} in {delay}ms");
                        sleep(Duration::from_millis(delay)).await;
                        continue;
                    }
                    return Err(e).with_context(|| format!("{method} request to {} failed", self.url));
                }
            }
        }
    }
}

#[async_trait]
impl ChainSource for RpcClient {
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let envelope = self.call_raw(method, params).await?;
        unwrap_result(envelope).with_context(|| format!("{method} failed"))
    }
}

fn has_error(envelope: &Value) -> bool {
    envelope.get("error").is_some_and(|e| !e.is_null())
}

/// Extract `result` from a response envelope, turning an `error` member into
/// an `Err`. Nodes send `"error": null` on success.
pub fn unwrap_result(envelope: Value) -> Result<Value> {
    if has_error(&envelope) {
        let err = &envelope["error"];
        let code = err.get("code").and_then(|c| c.as_i64()).unwrap_or_default();
        let msg = err
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("rpc error");
        return Err(anyhow!("rpc {code} {msg}"));
    }
    match envelope.get("result") {
        Some(r) => Ok(r.clone()),
        None => Err(anyhow!("invalid rpc payload (no result)")),
    }
}

pub async fn fetch_header(source: &dyn ChainSource, hash: &str) -> Result<HeaderRecord> {
    let v = source.request("getblockheader", vec![json!(hash)]).await?;
    serde_json::from_value(v).context("unexpected getblockheader shape")
}

pub async fn fetch_block(source: &dyn ChainSource, hash: &str) -> Result<BlockRecord> {
    let v = source.request("getblock", vec![json!(hash)]).await?;
    serde_json::from_value(v).context("unexpected getblock shape")
}

/// Verbose transaction lookup.
pub async fn fetch_tx(source: &dyn ChainSource, txid: &str) -> Result<TxRecord> {
    let v = source.request("getrawtransaction", vec![json!(txid), json!(1)]).await?;
    serde_json::from_value(v).context("unexpected getrawtransaction shape")
}
