/// Computes the murmurhash2 variant used by `@emotion/hash` and returns it as a base36 string.
///
/// Only the low byte of every UTF-16 code unit takes part in the hash, exactly as the runtime
/// implementation does with `charCodeAt(i) & 0xff`, so build-time and run-time names agree.
pub fn hash(input: &str) -> String {
  let units: Vec<u16> = input.encode_utf16().collect();
  to_base36(murmur2(&units))
}

fn murmur2(units: &[u16]) -> u32 {
  let mut h: u32 = 0;
  let mut chunks = units.chunks_exact(4);

  for chunk in &mut chunks {
    let mut k = (chunk[0] as u32 & 0xff)
      | ((chunk[1] as u32 & 0xff) << 8)
      | ((chunk[2] as u32 & 0xff) << 16)
      | ((chunk[3] as u32 & 0xff) << 24);

    k = mul_mix(k);
    k ^= k >> 24;
    h = mul_mix(k) ^ mul_mix(h);
  }

  let tail = chunks.remainder();
  if tail.len() == 3 {
    h ^= (tail[2] as u32 & 0xff) << 16;
  }
  if tail.len() >= 2 {
    h ^= (tail[1] as u32 & 0xff) << 8;
  }
  if !tail.is_empty() {
    h ^= tail[0] as u32 & 0xff;
    h = mul_mix(h);
  }

  h ^= h >> 13;
  h = mul_mix(h);
  h ^ (h >> 15)
}

#[inline]
fn mul_mix(value: u32) -> u32 {
  let low = (value & 0xffff).wrapping_mul(0x5bd1e995);
  let high = (value >> 16).wrapping_mul(0xe995);
  low.wrapping_add(high << 16)
}

fn to_base36(mut value: u32) -> String {
  const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

  if value == 0 {
    return "0".to_string();
  }

  let mut out = Vec::with_capacity(7);
  while value > 0 {
    out.push(DIGITS[(value % 36) as usize] as char);
    value /= 36;
  }

  out.iter().rev().collect()
}
