//! Memoizer demo
//!
//! Times a SHA3-512 digest computed directly and through a [`Memoizer`],
//! then hammers the memoized digester from several threads and prints the
//! cache statistics as JSON.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use sha3::{Digest, Sha3_512};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memoizer::{op_id, Memoizer, MemoizerConfig};

const TOTAL: usize = 100_000;
const TEST_TEXT: &str = "hello world";
const WORKERS: usize = 4;

/// Something that turns text into a printable digest.
trait Digester {
    fn digest(&self, input: &str) -> String;
}

/// The slow implementation being memoized.
struct Sha3Digester;

impl Digester for Sha3Digester {
    fn digest(&self, input: &str) -> String {
        BASE64_STANDARD.encode(Sha3_512::digest(input.as_bytes()))
    }
}

impl<T: Digester> Digester for Memoizer<T> {
    fn digest(&self, input: &str) -> String {
        self.call_infallible(op_id!(digest), input.to_owned(), |target| {
            target.digest(input)
        })
    }
}

/// Runs `TOTAL` digests and reports how long they took.
fn bench(label: &str, digester: &dyn Digester) -> String {
    let start = Instant::now();
    for _ in 0..TOTAL {
        digester.digest(TEST_TEXT);
    }
    let elapsed = start.elapsed();

    let output = digester.digest(TEST_TEXT);
    info!(
        "{}\tdiff={}ms\t{}",
        label,
        elapsed.as_millis(),
        output
    );
    output
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memoizer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MemoizerConfig::from_env().context("loading memoizer configuration")?;
    info!(
        "Configuration loaded: max_elements={}, ttl={}ms",
        config.max_elements, config.ttl_ms
    );

    let direct = bench("Sha3Digester:direct", &Sha3Digester);

    let memoized = Arc::new(Memoizer::with_config(Sha3Digester, config));
    let cached = bench("Sha3Digester:memoize", &*memoized);
    anyhow::ensure!(direct == cached, "memoized digest differs from the direct one");

    // Concurrent callers share one cache
    let mut handles = Vec::with_capacity(WORKERS);
    for worker in 0..WORKERS {
        let memoized = Arc::clone(&memoized);
        handles.push(tokio::task::spawn_blocking(move || {
            for i in 0..TOTAL / WORKERS {
                memoized.digest(&format!("{}-{}", TEST_TEXT, i % 64));
            }
            worker
        }));
    }
    for handle in handles {
        let worker = handle.await.context("digest worker panicked")?;
        info!("Worker {} finished", worker);
    }

    let stats = memoized.stats();
    info!("Hit rate: {:.4}", stats.hit_rate());
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
