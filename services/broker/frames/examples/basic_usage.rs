//! Basic usage example for the broker frame codecs.

use broker_frames::{
    Address, AddressView, BrokerInfo, Frame, FrameCodec, FrameFlags, HeaderView, Id, RouteJoin,
    Tags, WellKnownKey,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Broker Frames Example ===\n");

    // 1. Build a tag set; duplicate keys resolve to the last value
    println!("1. Building tags...");
    let tags = Tags::builder()
        .with(WellKnownKey::MajorVersion, "1")
        .with(WellKnownKey::MinorVersion, "0")
        .with("mycustomtag", "first")
        .with("mycustomtag", "mycustomtagvalue")
        .build();
    println!("   Tags: {}", tags);

    // 2. Encode a BROKER_INFO frame
    println!("\n2. Encoding a BROKER_INFO frame...");
    let broker_id = Id::random();
    let broker_info =
        BrokerInfo::new(broker_id, 1_700_000_000_000, tags.clone(), FrameFlags::empty());
    let encoded = broker_info.encode();
    println!("   Encoded frame size: {} bytes", encoded.len());

    // 3. Peek at the header, then dispatch
    println!("\n3. Decoding by header dispatch...");
    let header = HeaderView::new(&encoded)?;
    println!(
        "   Version {}.{}, type {}",
        header.major_version(),
        header.minor_version(),
        header.frame_type()?
    );
    match Frame::decode(&encoded)? {
        Frame::BrokerInfo(info) => println!("   Broker {} at {}", info.broker_id, info.timestamp),
        other => println!("   Unexpected frame: {}", other),
    }

    // 4. Read an ADDRESS frame field by field without materializing it
    println!("\n4. Reading an ADDRESS frame through its flyweight...");
    let metadata = Tags::builder().with("mycustommetadata", "value").build();
    let flags = FrameFlags::from_raw(0b00_1000_0000);
    let address = Address::new(Id::random(), metadata, tags.clone(), flags);
    let encoded = address.encode();
    let view = AddressView::new(&encoded)?;
    println!("   Origin route: {}", view.origin_route_id()?);
    println!("   Metadata: {}", view.metadata()?);
    println!("   Tags: {}", view.tags()?);
    println!("   Flags: {}", view.flags());

    // 5. ROUTE_JOIN service names are borrowed straight from the buffer
    println!("\n5. Reading a ROUTE_JOIN service name...");
    let join = RouteJoin::new(
        broker_id,
        Id::random(),
        1_700_000_000_001,
        "myService",
        tags,
        FrameFlags::empty(),
    );
    let encoded = join.encode();
    let decoded = RouteJoin::decode(&encoded)?;
    println!("   Service: {}", decoded.service_name);
    println!("   Round trip equal: {}", decoded == join);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
