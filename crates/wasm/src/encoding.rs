/*
 * Copyright (c) 2026. Mikhail Kulik.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Low-level binary encoding: LEB128 varints, floats and names.
//!
//! Module assembly goes through `wasm_encoder`; these writers are the scalar
//! primitives for callers that produce raw bytes. Every writer appends to a
//! `Vec<u8>` sink. Exceeding a varint's byte budget means an upstream
//! invariant was broken and panics.

/// Maximum encoded length of a 32-bit varint.
pub const MAX_LEB128_32: usize = 5;

fn write_unsigned(sink: &mut Vec<u8>, mut value: u64, budget: usize) {
    let start = sink.len();
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            sink.push(byte);
            break;
        }
        sink.push(byte | 0x80);
    }
    assert!(
        sink.len() - start <= budget,
        "unsigned LEB128 exceeded its {}-byte budget",
        budget
    );
}

/// Signed LEB128. Emission stops once the remaining magnitude, doubled to
/// account for the sign bit, fits in the bytes already written.
fn write_signed(sink: &mut Vec<u8>, mut value: i64, budget: usize) {
    let start = sink.len();
    let magnitude = (if value < 0 { !value } else { value }) as u64;
    let mut remaining = magnitude << 1;
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        remaining >>= 7;
        if remaining == 0 {
            sink.push(byte);
            break;
        }
        sink.push(byte | 0x80);
    }
    assert!(
        sink.len() - start <= budget,
        "signed LEB128 exceeded its {}-byte budget",
        budget
    );
}

pub fn write_u32(sink: &mut Vec<u8>, value: u32) {
    write_unsigned(sink, value as u64, MAX_LEB128_32);
}

/// Lengths and counts are `usize` in memory but `u32` on the wire.
pub fn write_len(sink: &mut Vec<u8>, len: usize) {
    assert!(len <= u32::MAX as usize, "length {} does not fit in u32", len);
    write_u32(sink, len as u32);
}

pub fn write_i32(sink: &mut Vec<u8>, value: i32) {
    write_signed(sink, value as i64, MAX_LEB128_32);
}

/// IEEE 754 bits, little-endian, always 8 bytes.
pub fn write_f64(sink: &mut Vec<u8>, value: f64) {
    sink.extend_from_slice(&value.to_le_bytes());
}

/// Length-prefixed UTF-8.
pub fn write_name(sink: &mut Vec<u8>, name: &str) {
    write_len(sink, name.len());
    sink.extend_from_slice(name.as_bytes());
}
