//! MPQ hashing and block cipher
//!
//! Every name lookup, the hash/block tables and encrypted file sectors go
//! through the same 0x500-entry crypt table.

use lazy_static::lazy_static;

lazy_static! {
    static ref CRYPT_TABLE: [u32; 0x500] = build_crypt_table();
}

/// Which slice of the crypt table a string hash draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    TableOffset = 0,
    NameA = 1,
    NameB = 2,
    FileKey = 3,
}

fn build_crypt_table() -> [u32; 0x500] {
    let mut table = [0u32; 0x500];
    let mut seed: u32 = 0x0010_0001;

    for index1 in 0..0x100 {
        let mut index2 = index1;
        for _ in 0..5 {
            seed = (seed * 125 + 3) % 0x2A_AAAB;
            let high = (seed & 0xFFFF) << 0x10;
            seed = (seed * 125 + 3) % 0x2A_AAAB;
            let low = seed & 0xFFFF;
            table[index2] = high | low;
            index2 += 0x100;
        }
    }

    table
}

/// Hash a file name. Archive names are case-insensitive and use `\` separators.
pub fn hash_string(name: &str, hash_type: HashType) -> u32 {
    let mut seed1: u32 = 0x7FED_7FED;
    let mut seed2: u32 = 0xEEEE_EEEE;
    let offset = (hash_type as usize) * 0x100;

    for byte in name.bytes() {
        let ch = match byte {
            b'/' => b'\\',
            other => other.to_ascii_uppercase(),
        } as u32;
        seed1 = CRYPT_TABLE[offset + ch as usize] ^ seed1.wrapping_add(seed2);
        seed2 = ch
            .wrapping_add(seed1)
            .wrapping_add(seed2)
            .wrapping_add(seed2 << 5)
            .wrapping_add(3);
    }

    seed1
}

fn next_key(key: u32) -> u32 {
    ((!key << 0x15).wrapping_add(0x1111_1111)) | (key >> 0x0B)
}

/// Decrypt a run of little-endian words in place
pub fn decrypt_words(data: &mut [u32], mut key: u32) {
    let mut seed: u32 = 0xEEEE_EEEE;
    for value in data.iter_mut() {
        seed = seed.wrapping_add(CRYPT_TABLE[0x400 + (key & 0xFF) as usize]);
        let plain = *value ^ key.wrapping_add(seed);
        key = next_key(key);
        seed = plain
            .wrapping_add(seed)
            .wrapping_add(seed << 5)
            .wrapping_add(3);
        *value = plain;
    }
}

/// Encrypt a run of little-endian words in place
#[cfg(test)]
pub fn encrypt_words(data: &mut [u32], mut key: u32) {
    let mut seed: u32 = 0xEEEE_EEEE;
    for value in data.iter_mut() {
        seed = seed.wrapping_add(CRYPT_TABLE[0x400 + (key & 0xFF) as usize]);
        let plain = *value;
        *value = plain ^ key.wrapping_add(seed);
        key = next_key(key);
        seed = plain
            .wrapping_add(seed)
            .wrapping_add(seed << 5)
            .wrapping_add(3);
    }
}

/// Decrypt a byte buffer. Trailing bytes that do not fill a word stay as-is.
pub fn decrypt_bytes(data: &mut [u8], key: u32) {
    let mut words = bytes_to_words(data);
    decrypt_words(&mut words, key);
    for (chunk, word) in data.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

pub fn bytes_to_words(data: &[u8]) -> Vec<u32> {
    data.chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_keys_match_known_values() {
        assert_eq!(hash_string("(hash table)", HashType::FileKey), 0xC3AF_3770);
        assert_eq!(hash_string("(block table)", HashType::FileKey), 0xEC83_B3A3);
    }

    #[test]
    fn test_hash_ignores_case_and_slash_style() {
        assert_eq!(
            hash_string("data\\global\\ui\\FontFormal10.tbl", HashType::NameA),
            hash_string("DATA/GLOBAL/UI/fontformal10.TBL", HashType::NameA),
        );
    }

    #[test]
    fn test_encrypt_then_decrypt_restores_words() {
        let original = vec![0xDEAD_BEEF, 1, 2, 0xFFFF_FFFF, 42];
        let mut data = original.clone();
        encrypt_words(&mut data, 0x1234_5678);
        assert_ne!(data, original);
        decrypt_words(&mut data, 0x1234_5678);
        assert_eq!(data, original);
    }

    #[test]
    fn test_decrypt_bytes_leaves_tail_untouched() {
        let mut words = vec![7u32, 9];
        encrypt_words(&mut words, 99);
        let mut bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        bytes.push(0xAB);
        decrypt_bytes(&mut bytes, 99);
        assert_eq!(&bytes[0..4], &7u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &9u32.to_le_bytes());
        assert_eq!(bytes[8], 0xAB);
    }
}
