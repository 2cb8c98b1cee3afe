//! Benchmark for BCS serialization using a synthetic order book.
//!
//! Builds the schema at runtime, encodes and decodes a batch of orders, and
//! compares the wire size against JSON.

use std::time::Instant;

use bcs_codec::{Bcs, TypeTag, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

// =============================================================================
// NATIVE DATA STRUCTURES
// =============================================================================

#[derive(Debug, Clone, Serialize)]
enum Side {
    Bid,
    Ask { limit: u64 },
}

#[derive(Debug, Clone, Serialize)]
struct Order {
    id: u64,
    owner: [u8; 32],
    price: u64,
    quantity: u128,
    side: Side,
    expiry: Option<u64>,
    client_tag: String,
    fills: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
struct OrderBook {
    market: String,
    orders: Vec<Order>,
}

/// Seed for the generated order book.
const SEED: u64 = 12345;

// =============================================================================
// GENERATION
// =============================================================================

fn make_orders(count: usize, seed: u64) -> OrderBook {
    let mut rng = StdRng::seed_from_u64(seed);
    let orders = (0..count as u64)
        .map(|id| {
            let mut owner = [0u8; 32];
            rng.fill(&mut owner);
            let price = rng.gen_range(1_000..51_000u64);
            let side = if rng.gen_bool(0.5) {
                Side::Bid
            } else {
                Side::Ask {
                    limit: price + rng.gen_range(0..500u64),
                }
            };
            let fill_count = rng.gen_range(0..6usize);
            Order {
                id,
                owner,
                price,
                quantity: u128::from(rng.gen_range(0..1_000_000u64)) * 1_000_000_000,
                side,
                expiry: rng
                    .gen_bool(2.0 / 3.0)
                    .then(|| 1_704_067_200 + rng.gen_range(0..86_400u64)),
                client_tag: format!("client-{}", rng.gen_range(0..10_000u32)),
                fills: (0..fill_count).map(|_| rng.gen_range(0..100_000u32)).collect(),
            }
        })
        .collect();

    OrderBook {
        market: "SUI/USDC".to_string(),
        orders,
    }
}

// =============================================================================
// SCHEMA AND CONVERSION
// =============================================================================

fn build_engine() -> Bcs {
    let mut bcs = Bcs::with_move_prelude();
    bcs.register_enum_str("Side", &[], &[("Bid", None), ("Ask", Some("u64"))])
        .expect("Failed to register Side");
    bcs.register_struct_str(
        "Order",
        &[],
        &[
            ("id", "u64"),
            ("owner", "address"),
            ("price", "u64"),
            ("quantity", "u128"),
            ("side", "Side"),
            ("expiry", "Option<u64>"),
            ("client_tag", "string"),
            ("fills", "vector<u32>"),
        ],
    )
    .expect("Failed to register Order");
    bcs.register_struct_str(
        "OrderBook",
        &[],
        &[("market", "string"), ("orders", "vector<Order>")],
    )
    .expect("Failed to register OrderBook");
    bcs
}

fn order_to_value(order: &Order) -> Value {
    let side = match order.side {
        Side::Bid => Value::unit_variant("Bid"),
        Side::Ask { limit } => Value::variant("Ask", Value::U64(limit)),
    };
    Value::structure([
        ("id", Value::U64(order.id)),
        ("owner", Value::byte_array(&order.owner)),
        ("price", Value::U64(order.price)),
        ("quantity", Value::U128(order.quantity)),
        ("side", side),
        ("expiry", Value::Option(order.expiry.map(|e| Box::new(Value::U64(e))))),
        ("client_tag", Value::from(order.client_tag.as_str())),
        ("fills", Value::Vector(order.fills.iter().copied().map(Value::U32).collect())),
    ])
}

fn book_to_value(book: &OrderBook) -> Value {
    Value::structure([
        ("market", Value::from(book.market.as_str())),
        ("orders", Value::Vector(book.orders.iter().map(order_to_value).collect())),
    ])
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let count: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(100_000);

    println!("Generating {} orders", count);

    let gen_start = Instant::now();
    let book = make_orders(count, SEED);
    let value = book_to_value(&book);
    println!("Generated in {:?}", gen_start.elapsed());

    let bcs = build_engine();
    info!(types = bcs.registry().len(), "schema registered");
    let tag = TypeTag::structure("OrderBook");

    // Benchmark encoding
    let encode_start = Instant::now();
    let encoded = bcs.encode(&value, &tag).expect("Failed to encode");
    let encode_time = encode_start.elapsed();

    println!("\nBCS: {} bytes in {:?}", encoded.len(), encode_time);
    println!(
        "  Throughput: {:.2} MB/s",
        (encoded.len() as f64 / 1_000_000.0) / encode_time.as_secs_f64()
    );

    // Verify encoding is deterministic
    let encoded2 = bcs.encode(&value, &tag).expect("Failed to encode");
    assert_eq!(encoded, encoded2, "BCS encoding should be deterministic");

    let size = bcs.serialized_size(&value, &tag).expect("Failed to size");
    assert_eq!(size, encoded.len());

    // Benchmark decoding
    const DECODE_ITERS: u32 = 5;

    // Warmup
    for _ in 0..2 {
        let _ = bcs.decode(&encoded, &tag).expect("Failed to decode");
    }

    let decode_start = Instant::now();
    let mut decoded = None;
    for _ in 0..DECODE_ITERS {
        decoded = Some(bcs.decode(&encoded, &tag).expect("Failed to decode"));
    }
    let decode_time = decode_start.elapsed() / DECODE_ITERS;
    let decoded = decoded.expect("at least one decode iteration");

    println!(
        "\nDecode: {:?} (avg of {} iterations)",
        decode_time, DECODE_ITERS
    );
    println!(
        "  Throughput: {:.2} MB/s",
        (encoded.len() as f64 / 1_000_000.0) / decode_time.as_secs_f64()
    );
    assert_eq!(decoded, value);

    // Compare with JSON
    let json_start = Instant::now();
    let json = serde_json::to_vec(&book).expect("Failed to serialize JSON");
    let json_time = json_start.elapsed();

    println!("\nJSON: {} bytes in {:?}", json.len(), json_time);
    println!(
        "  BCS is {:.1}% of JSON size",
        100.0 * encoded.len() as f64 / json.len() as f64
    );
}
