use remcache::prelude::*;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type QuoteKey = (String, String);

fn quote_key(symbol: &str, date: &str) -> QuoteKey {
    (symbol.to_string(), date.to_string())
}

fn report(cache: &LruCache<QuoteKey, u64>, key: &QuoteKey) {
    match cache.find(key) {
        Some(value) => println!("Item found. Value : {}", value),
        None => println!("Item not found in cache."),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cache: LruCache<QuoteKey, u64> = CacheOptions::new().capacity(10).build()?;

    for day in 1..=9u64 {
        cache.insert(quote_key("BTCUSD", &format!("2019-01-{:02}", day)), 9999 + day);
    }
    // duplicate, only refreshes the key
    cache.insert(quote_key("BTCUSD", "2019-01-09"), 10008);

    report(&cache, &quote_key("BTCUSD", "2019-01-05"));
    report(&cache, &quote_key("BTCUSD", "2019-02-05"));
    println!();

    cache.debug_dump(|k| format!("{},{}", k.0, k.1), |v| v.to_string())?;
    println!();

    let latest: LruCache<String, u64> = LruCache::new(2)?;
    for (symbol, price) in [("BTCUSD", 10008), ("ETHUSD", 140), ("XRPUSD", 1)] {
        latest.insert(symbol.to_string(), price);
    }
    latest.debug_dump_display()
}
