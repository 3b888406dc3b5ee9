#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chainmon::rpc_utils::ChainSource;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// In-memory node answering `getblockheader`, `getblock` and
/// `getrawtransaction` from scripted records.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<HashMap<(String, String), Value>>,
    calls: Mutex<Vec<(String, String)>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

pub fn coinbase_txid(hash: &str) -> String {
    format!("cb-{hash}")
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script a block with `n_tx` transactions whose coinbase pays `reward`.
    pub fn add_block(&self, hash: &str, height: u64, n_tx: usize, time: i64, reward: f64) {
        let mut txs = vec![coinbase_txid(hash)];
        txs.extend((1..n_tx).map(|i| format!("{hash}-tx{i}")));
        let mut r = self.responses.lock().unwrap();
        r.insert(
            ("getblockheader".into(), hash.into()),
            json!({"hash": hash, "height": height, "confirmations": 1}),
        );
        r.insert(
            ("getblock".into(), hash.into()),
            json!({
                "hash": hash,
                "height": height,
                "size": 1_000_000,
                "weight": 3_993_000,
                "time": time,
                "tx": txs,
                "difficulty": 18_415_156_832_118.24,
                "chainwork": "0000000000000000000000000000000000000000000000000000000000010000",
            }),
        );
        r.insert(
            ("getrawtransaction".into(), coinbase_txid(hash)),
            json!({"txid": coinbase_txid(hash), "size": 250, "vout": [{"value": reward}]}),
        );
    }

    /// Make one scripted request fail from now on.
    pub fn remove(&self, method: &str, key: &str) {
        self.responses
            .lock()
            .unwrap()
            .remove(&(method.to_string(), key.to_string()));
    }

    /// Hold every `method` request until the returned notify is signalled
    /// (one permit per request).
    pub fn gate(&self, method: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(method.to_string(), notify.clone());
        notify
    }

    pub fn ungate(&self, method: &str) {
        self.gates.lock().unwrap().remove(method);
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|(m, _)| m == method).count()
    }
}

#[async_trait]
impl ChainSource for ScriptedSource {
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let key = params
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), key.clone()));

        let gate = self.gates.lock().unwrap().get(method).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), key.clone()))
            .cloned()
            .ok_or_else(|| anyhow!("rpc -5 no scripted response for {method}({key})"))
    }
}

pub fn envelope(hash: &str) -> Value {
    json!({"result": hash, "error": null, "id": "chainmon"})
}

/// Let spawned tasks run until `cond` holds (bounded).
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}
