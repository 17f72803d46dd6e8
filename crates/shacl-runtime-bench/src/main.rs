//! Benchmark for document decode, validate and encode using synthetic city data.
//!
//! Builds a small place model, generates one document with a configurable
//! number of cities (default 50k) and times each stage.
//!
//! Usage: `bench-documents [CITY_COUNT] [OUTPUT_PATH]`

use std::env;
use std::fs;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use shacl_runtime::{
    DecodeOptions, EncodeOptions, FnHandler, NodeKind, ObjectSet, Path, PropertyDef, Registry,
    TypeDef, ValidationError, ValueKind,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONTEXT_URL: &str = "https://example.org/places/context.json";
const DEFAULT_CITY_COUNT: usize = 50_000;
const DECODE_ITERS: u32 = 5;

// =============================================================================
// MODEL
// =============================================================================

fn ex(suffix: &str) -> String {
    format!("https://example.org/places/{}", suffix)
}

fn prop(name: &str, kind: ValueKind) -> PropertyDef {
    PropertyDef::new(name, ex(name), kind).compact(name)
}

fn build_registry() -> Registry {
    Registry::builder(CONTEXT_URL)
        .register(
            TypeDef::new(ex("Place"))
                .compact("Place")
                .abstract_class()
                .node_kind(NodeKind::Iri)
                .property(prop("name", ValueKind::String).required())
                .property(prop("nativeNames", ValueKind::String).list()),
        )
        .register(
            TypeDef::new(ex("Country"))
                .compact("Country")
                .parent(ex("Place"))
                .property(prop("code", ValueKind::String).pattern("^[A-Z]{2}$").required()),
        )
        .register(
            TypeDef::new(ex("City"))
                .compact("City")
                .parent(ex("Place"))
                .extensible(true)
                .property(prop("population", ValueKind::Integer).min_inclusive(0))
                .property(prop("latitude", ValueKind::Float))
                .property(prop("longitude", ValueKind::Float))
                .property(prop("founded", ValueKind::DateTime))
                .property(
                    prop("timezone", ValueKind::Iri)
                        .context_entry(ex("tz/utc"), "utc")
                        .context_entry(ex("tz/cet"), "cet"),
                )
                .property(prop("country", ValueKind::Object(ex("Country"))).required())
                .property(prop("neighbours", ValueKind::Object(ex("City"))).list().max_count(8)),
        )
        .build()
        .expect("Failed to build registry")
}

// =============================================================================
// DATA
// =============================================================================

fn generate_document(city_count: usize) -> Value {
    let countries = ["DE", "FR", "NL", "PL", "PT", "ES", "IT", "JP"];
    let mut graph = Vec::with_capacity(city_count);

    for idx in 0..city_count {
        let code = countries[idx % countries.len()];
        let neighbours: Vec<Value> = (1..=3)
            .map(|offset| json!(ex(&format!("city/{}", (idx + offset) % city_count))))
            .collect();
        let timezone = if idx % 2 == 0 { "utc" } else { "cet" };

        let mut city = json!({
            "@type": "City",
            "@id": ex(&format!("city/{}", idx)),
            "name": format!("City {}", idx),
            "nativeNames": [format!("Stadt {}", idx), format!("Ville {}", idx)],
            "population": (idx * 37) % 2_000_000,
            "latitude": format!("{}", (idx % 180) as f64 - 90.0 + 0.25),
            "longitude": format!("{}", (idx % 360) as f64 - 180.0 + 0.5),
            "founded": format!("{:04}-01-01T00:00:00+01:00", 1000 + idx % 1000),
            "timezone": timezone,
            "country": {
                "@type": "Country",
                "@id": ex(&format!("country/{}", code)),
                "name": code,
                "code": code
            },
            "neighbours": neighbours
        });

        if idx % 10 == 0 {
            city["https://example.org/places/wikidataId"] = json!([format!("Q{}", idx)]);
        }
        graph.push(city);
    }

    json!({
        "@context": CONTEXT_URL,
        "@graph": graph
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let city_count = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CITY_COUNT);
    let output_path = args.get(2);

    let registry = Arc::new(build_registry());
    info!(classes = registry.len(), "registry ready");

    println!("=== Document Benchmark ===");
    println!("Cities: {}", city_count);

    let generate_start = Instant::now();
    let document = generate_document(city_count);
    let text = serde_json::to_string(&document).expect("Failed to serialize input");
    println!(
        "\nGenerated input: {} bytes ({:.1} MB) in {:?}",
        text.len(),
        text.len() as f64 / 1_000_000.0,
        generate_start.elapsed()
    );

    // Warmup
    for _ in 0..2 {
        let mut set = ObjectSet::new(registry.clone());
        set.decode(text.as_bytes()).expect("Failed to decode");
    }

    let decode_start = Instant::now();
    let mut decoded = None;
    for _ in 0..DECODE_ITERS {
        let mut set = ObjectSet::new(registry.clone());
        set.decode_with_options(text.as_bytes(), DecodeOptions::new())
            .expect("Failed to decode");
        decoded = Some(set);
    }
    let decode_time = decode_start.elapsed() / DECODE_ITERS;
    let set = decoded.expect("at least one decode iteration");

    println!(
        "\nDecode: {:?} (avg of {} iterations)",
        decode_time, DECODE_ITERS
    );
    println!(
        "  Throughput: {:.2} MB/s",
        (text.len() as f64 / 1_000_000.0) / decode_time.as_secs_f64()
    );
    assert_eq!(set.len(), city_count);

    let validate_start = Instant::now();
    let mut error_count = 0usize;
    let valid = set.validate(&mut FnHandler(|_: &ValidationError, _: &Path| error_count += 1));
    let validate_time = validate_start.elapsed();

    println!("\nValidate: {:?}", validate_time);
    println!("  Valid: {} ({} errors)", valid, error_count);

    let encode_start = Instant::now();
    let mut encoded = Vec::with_capacity(text.len());
    set.encode(&mut encoded).expect("Failed to encode");
    let encode_time = encode_start.elapsed();

    println!("\nEncode: {} bytes in {:?}", encoded.len(), encode_time);
    println!(
        "  Throughput: {:.2} MB/s",
        (encoded.len() as f64 / 1_000_000.0) / encode_time.as_secs_f64()
    );

    // Verify round trip
    let reparsed: Value = serde_json::from_slice(&encoded).expect("Failed to parse output");
    assert_eq!(reparsed, document, "Round trip should preserve the document");

    let countries = set.objects_of_type("Country", false).len();
    println!("\nCountry objects: {}", countries);

    if let Some(path) = output_path {
        let mut pretty = Vec::new();
        set.encode_with_options(&mut pretty, EncodeOptions::pretty())
            .expect("Failed to encode");
        fs::write(path, &pretty).expect("Failed to write output file");
        println!("\n=== Output File ===");
        println!("Pretty: {} ({} bytes)", path, pretty.len());
    }
}
