//! Telemetry frame demo
//!
//! Builds a vehicle status frame from a runtime schema, prints its wire
//! bytes, then parses them back through a fresh tree with the same
//! schema.
//!
//! Run with: cargo run -p telemetry-frame -- --plate "沪A12345"

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use wiretree::{hex_dump, FieldDescriptor, FieldKind, SchemaTree, DEFAULT_CHARSET};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(about = "Build and parse a telemetry status frame")]
struct Args {
    /// License plate carried in the variable-length text field
    #[arg(long, default_value = "沪A12345")]
    plate: String,

    /// Charset label for text fields
    #[arg(long, default_value = DEFAULT_CHARSET)]
    charset: String,

    /// Encode multi-byte fields big-endian instead of little-endian
    #[arg(long)]
    big_endian: bool,
}

/// Outer frame: message id, GNSS block, plate, odometer, vendor blob.
fn frame_schema(little_endian: bool) -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new(FieldKind::U8, little_endian),
        FieldDescriptor::new(FieldKind::SubTree, little_endian),
        FieldDescriptor::new(FieldKind::VarLen8, little_endian),
        FieldDescriptor::new(FieldKind::U32, little_endian),
        FieldDescriptor::with_length(FieldKind::Raw, 0, little_endian),
    ]
}

/// GNSS block: latitude and longitude scaled by 1e6, speed in 0.1 km/h.
fn gnss_schema(little_endian: bool) -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new(FieldKind::S32, little_endian),
        FieldDescriptor::new(FieldKind::S32, little_endian),
        FieldDescriptor::new(FieldKind::U16, little_endian),
    ]
}

fn main() -> wiretree::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting tracing subscriber failed");

    let args = Args::parse();
    let little_endian = !args.big_endian;

    let mut gnss = SchemaTree::new(gnss_schema(little_endian));
    gnss.set_s32(0, 31_230_416).set_s32(1, 121_473_701).set_u16(2, 652);

    let mut frame = SchemaTree::new(frame_schema(little_endian));
    frame
        .set_u8(0, 0x02)
        .set_child(1, gnss)
        .set_str(2, &args.plate, &args.charset)
        .set_u32(3, 1_284_350)
        .set_raw(4, vec![0xDE, 0xAD]);

    let bytes = frame.to_bytes()?;
    info!("frame: {}", hex_dump(&bytes));

    let mut parsed = SchemaTree::with_children(
        frame_schema(little_endian),
        [SchemaTree::new(gnss_schema(little_endian))],
    );
    parsed.parse_bytes(bytes)?;

    let gnss = parsed.get_child(1).expect("GNSS block was pre-attached");
    info!(
        "message {:#04x}: lat {} lon {} speed {} km/h plate {:?} odometer {} m blob {}",
        parsed.get_u8(0),
        gnss.get_s32(0) as f64 / 1e6,
        gnss.get_s32(1) as f64 / 1e6,
        gnss.get_u16(2) as f64 / 10.0,
        parsed.get_str(2, &args.charset),
        parsed.get_u32(3),
        hex_dump(&parsed.get_raw(4).unwrap_or_default()),
    );

    Ok(())
}
