//! Basic usage example for the wiki wire envelope.

use bytes::{Bytes, BytesMut};
use wiki_wire::{decode_first_string_field, encode_string_field, Frame, FrameDecoder, Inflated};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Wiki Wire Envelope Example ===\n");

    // 1. Encode a compressed request frame
    println!("1. Encoding a compressed request frame...");
    let request_body = encode_string_field(1, "my_symbol");
    let frame = Frame::compressed(&request_body)?;
    let frame_bytes = frame.encode()?;
    println!("   Encoded frame size: {} bytes", frame_bytes.len());

    // 2. Decode it back from a receive buffer
    println!("\n2. Decoding the frame...");
    let mut decoder = FrameDecoder::new();
    let mut buf = BytesMut::from(frame_bytes.as_ref());

    if let Some(decoded) = decoder.decode(&mut buf) {
        println!("   Flags: {:#04x}", decoded.flags.bits());
        match decoded.inflate() {
            Inflated::Gzip(payload) => {
                println!("   Inflated payload: {} bytes", payload.len());
                println!(
                    "   First string field: {:?}",
                    decode_first_string_field(&payload)
                );
            }
            other => println!("   Unexpected payload mode: {other:?}"),
        }
    }

    // 3. Feed a fragmented stream chunk by chunk
    println!("\n3. Decoding a fragmented response stream...");
    let first = Frame::plain(Bytes::from_static(b"Hello ")).encode()?;
    let second = Frame::plain(Bytes::from_static(b"world")).encode()?;
    let stream: Vec<u8> = first.iter().chain(second.iter()).copied().collect();

    let mut buf = BytesMut::new();
    let mut frames = 0usize;
    for chunk in stream.chunks(3) {
        buf.extend_from_slice(chunk);
        while let Some(frame) = decoder.decode(&mut buf) {
            frames += 1;
            println!(
                "   Frame {}: {:?}",
                frames,
                std::str::from_utf8(&frame.payload)
            );
        }
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
