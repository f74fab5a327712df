//! Read-only MPQ archive access
//!
//! Supports the archive layout Diablo II ships with: format version 0/1
//! headers, encrypted hash and block tables, single-unit and sectored files,
//! file-key decryption and zlib-compressed sectors. Other compression
//! methods are reported as [`ArchiveError::UnsupportedCompression`].

mod crypt;

pub use crypt::{hash_string, HashType};

use flate2::read::ZlibDecoder;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;

const MPQ_MAGIC: &[u8; 4] = b"MPQ\x1A";
const HEADER_SEARCH_STEP: u64 = 0x200;
const HEADER_SEARCH_LIMIT: u64 = 0x10_0000;
const HASH_ENTRY_EMPTY: u32 = 0xFFFF_FFFF;
const HASH_ENTRY_DELETED: u32 = 0xFFFF_FFFE;

const FILE_IMPLODE: u32 = 0x0000_0100;
const FILE_COMPRESS: u32 = 0x0000_0200;
const FILE_ENCRYPTED: u32 = 0x0001_0000;
const FILE_FIX_KEY: u32 = 0x0002_0000;
const FILE_SINGLE_UNIT: u32 = 0x0100_0000;
const FILE_SECTOR_CRC: u32 = 0x0400_0000;
const FILE_EXISTS: u32 = 0x8000_0000;

const COMPRESSION_ZLIB: u8 = 0x02;

/// Name of the embedded file listing
pub const LISTFILE_NAME: &str = "(listfile)";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("{} is not an MPQ archive", .0.display())]
    NotAnArchive(PathBuf),
    #[error("archive table is truncated")]
    Truncated,
    #[error("could not locate {0} in the archive")]
    FileNotFound(String),
    #[error("unsupported compression method 0x{0:02X}")]
    UnsupportedCompression(u8),
    #[error("corrupt archive data: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, Copy)]
struct HashEntry {
    name_a: u32,
    name_b: u32,
    block_index: u32,
}

#[derive(Debug, Clone, Copy)]
struct BlockEntry {
    file_pos: u32,
    compressed_size: u32,
    file_size: u32,
    flags: u32,
}

/// An opened MPQ archive. Only the tables are held in memory; file contents
/// are read from disk on demand.
#[derive(Debug, Clone)]
pub struct Mpq {
    path: PathBuf,
    archive_offset: u64,
    sector_size: usize,
    hash_table: Vec<HashEntry>,
    block_table: Vec<BlockEntry>,
}

impl Mpq {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;
        let file_len = file.metadata()?.len();

        let archive_offset = find_header(&mut file, file_len)?
            .ok_or_else(|| ArchiveError::NotAnArchive(path.clone()))?;

        let mut header = [0u8; 32];
        file.seek(SeekFrom::Start(archive_offset))?;
        file.read_exact(&mut header)?;

        let sector_shift = u16::from_le_bytes([header[14], header[15]]);
        if sector_shift > 20 {
            return Err(ArchiveError::Corrupt(format!("sector size shift {sector_shift}")));
        }
        let hash_table_pos = read_u32(&header, 16);
        let block_table_pos = read_u32(&header, 20);
        let hash_table_size = read_u32(&header, 24) as usize;
        let block_table_size = read_u32(&header, 28) as usize;

        let hash_words = read_table(
            &mut file,
            archive_offset + hash_table_pos as u64,
            hash_table_size,
            file_len,
            hash_string("(hash table)", HashType::FileKey),
        )?;
        let hash_table = hash_words
            .chunks_exact(4)
            .map(|w| HashEntry { name_a: w[0], name_b: w[1], block_index: w[3] })
            .collect();

        let block_words = read_table(
            &mut file,
            archive_offset + block_table_pos as u64,
            block_table_size,
            file_len,
            hash_string("(block table)", HashType::FileKey),
        )?;
        let block_table = block_words
            .chunks_exact(4)
            .map(|w| BlockEntry { file_pos: w[0], compressed_size: w[1], file_size: w[2], flags: w[3] })
            .collect();

        log::debug!(
            "Opened MPQ {} ({} hash entries, {} blocks)",
            path.display(),
            hash_table_size,
            block_table_size
        );

        Ok(Self {
            path,
            archive_offset,
            sector_size: 512usize << sector_shift,
            hash_table,
            block_table,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the archive, used as the root label in browsers
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find_block(name).is_some()
    }

    fn find_block(&self, name: &str) -> Option<BlockEntry> {
        if self.hash_table.is_empty() {
            return None;
        }

        let len = self.hash_table.len();
        let start = hash_string(name, HashType::TableOffset) as usize % len;
        let name_a = hash_string(name, HashType::NameA);
        let name_b = hash_string(name, HashType::NameB);

        for step in 0..len {
            let entry = self.hash_table[(start + step) % len];
            if entry.block_index == HASH_ENTRY_EMPTY {
                return None;
            }
            if entry.block_index != HASH_ENTRY_DELETED
                && entry.name_a == name_a
                && entry.name_b == name_b
            {
                return self
                    .block_table
                    .get(entry.block_index as usize)
                    .copied()
                    .filter(|block| block.flags & FILE_EXISTS != 0);
            }
        }

        None
    }

    /// Read and decode a whole file from the archive
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let block = self
            .find_block(name)
            .ok_or_else(|| ArchiveError::FileNotFound(name.to_string()))?;

        let mut file = File::open(&self.path)?;
        let start = self.archive_offset + block.file_pos as u64;

        let key = if block.flags & FILE_ENCRYPTED != 0 {
            Some(file_key(name, &block))
        } else {
            None
        };

        if block.flags & FILE_SINGLE_UNIT != 0 || block.file_size == 0 {
            let mut data = vec![0u8; block.compressed_size as usize];
            file.seek(SeekFrom::Start(start))?;
            file.read_exact(&mut data)?;
            if let Some(key) = key {
                crypt::decrypt_bytes(&mut data, key);
            }
            return decode_unit(data, &block, block.file_size as usize);
        }

        self.read_sectored(&mut file, start, &block, key)
    }

    fn read_sectored(
        &self,
        file: &mut File,
        start: u64,
        block: &BlockEntry,
        key: Option<u32>,
    ) -> Result<Vec<u8>, ArchiveError> {
        let file_size = block.file_size as usize;
        let sector_count = file_size.div_ceil(self.sector_size);

        let mut raw = vec![0u8; block.compressed_size as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(&mut raw)?;

        let offsets: Vec<usize> = if block.flags & (FILE_COMPRESS | FILE_IMPLODE) != 0 {
            let mut entries = sector_count + 1;
            if block.flags & FILE_SECTOR_CRC != 0 {
                entries += 1;
            }
            let table_len = entries * 4;
            if raw.len() < table_len {
                return Err(ArchiveError::Truncated);
            }
            let mut words = crypt::bytes_to_words(&raw[..table_len]);
            if let Some(key) = key {
                crypt::decrypt_words(&mut words, key.wrapping_sub(1));
            }
            words.into_iter().map(|w| w as usize).collect()
        } else {
            (0..=sector_count)
                .map(|i| (i * self.sector_size).min(raw.len()))
                .collect()
        };

        let mut out = Vec::with_capacity(file_size);
        for index in 0..sector_count {
            let (from, to) = (offsets[index], offsets[index + 1]);
            if from > to || to > raw.len() {
                return Err(ArchiveError::Corrupt(format!("sector {index} is out of range")));
            }
            let mut sector = raw[from..to].to_vec();
            if let Some(key) = key {
                crypt::decrypt_bytes(&mut sector, key.wrapping_add(index as u32));
            }
            let expected = self.sector_size.min(file_size - index * self.sector_size);
            out.extend(decode_unit(sector, block, expected)?);
        }

        Ok(out)
    }

    /// Names from the archive's embedded listfile
    pub fn list_files(&self) -> Result<Vec<String>, ArchiveError> {
        let data = self.read_file(LISTFILE_NAME)?;
        Ok(parse_listfile(&String::from_utf8_lossy(&data)))
    }
}

fn find_header(file: &mut File, file_len: u64) -> Result<Option<u64>, ArchiveError> {
    let mut magic = [0u8; 4];
    let mut offset = 0;
    while offset + 32 <= file_len && offset <= HEADER_SEARCH_LIMIT {
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut magic)?;
        if &magic == MPQ_MAGIC {
            return Ok(Some(offset));
        }
        offset += HEADER_SEARCH_STEP;
    }
    Ok(None)
}

fn read_table(
    file: &mut File,
    position: u64,
    entries: usize,
    file_len: u64,
    key: u32,
) -> Result<Vec<u32>, ArchiveError> {
    let byte_len = entries * 16;
    if position + byte_len as u64 > file_len {
        return Err(ArchiveError::Truncated);
    }
    let mut bytes = vec![0u8; byte_len];
    file.seek(SeekFrom::Start(position))?;
    file.read_exact(&mut bytes)?;
    let mut words = crypt::bytes_to_words(&bytes);
    crypt::decrypt_words(&mut words, key);
    Ok(words)
}

fn file_key(name: &str, block: &BlockEntry) -> u32 {
    let base_name = name.rsplit(['\\', '/']).next().unwrap_or(name);
    let mut key = hash_string(base_name, HashType::FileKey);
    if block.flags & FILE_FIX_KEY != 0 {
        key = key.wrapping_add(block.file_pos) ^ block.file_size;
    }
    key
}

/// Decode one stored unit (a whole single-unit file or a single sector)
fn decode_unit(data: Vec<u8>, block: &BlockEntry, expected: usize) -> Result<Vec<u8>, ArchiveError> {
    if data.len() >= expected {
        return Ok(data);
    }
    if block.flags & FILE_IMPLODE != 0 {
        return Err(ArchiveError::UnsupportedCompression(0x08));
    }
    if block.flags & FILE_COMPRESS == 0 {
        return Err(ArchiveError::Corrupt("stored data shorter than file size".into()));
    }

    let (&method, payload) = data
        .split_first()
        .ok_or_else(|| ArchiveError::Corrupt("empty compressed unit".into()))?;
    if method != COMPRESSION_ZLIB {
        return Err(ArchiveError::UnsupportedCompression(method));
    }

    let mut out = Vec::with_capacity(expected);
    ZlibDecoder::new(payload).read_to_end(&mut out)?;
    Ok(out)
}

fn parse_listfile(text: &str) -> Vec<String> {
    text.split(['\r', '\n', ';'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

/// Builds small archives for tests in other modules.
#[cfg(test)]
pub mod test_support {
    use super::crypt::encrypt_words;
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    pub enum Storage {
        Stored,
        Zlib,
        /// Uncompressed, sectored, encrypted with the file key
        EncryptedSectors,
    }

    /// Write an archive with a 512-byte sector size containing `files`
    /// and a generated listfile.
    pub fn write_mpq(path: &Path, files: &[(&str, &[u8], Storage)]) {
        let listfile: String = files.iter().map(|(name, _, _)| format!("{name}\r\n")).collect();
        let mut entries: Vec<(String, Vec<u8>, u32, u32)> = Vec::new();

        for (name, data, storage) in files {
            match storage {
                Storage::Stored => {
                    entries.push((name.to_string(), data.to_vec(), data.len() as u32, FILE_EXISTS | FILE_SINGLE_UNIT))
                }
                Storage::Zlib => {
                    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                    encoder.write_all(data).unwrap();
                    let mut packed = vec![COMPRESSION_ZLIB];
                    packed.extend(encoder.finish().unwrap());
                    entries.push((
                        name.to_string(),
                        packed,
                        data.len() as u32,
                        FILE_EXISTS | FILE_SINGLE_UNIT | FILE_COMPRESS,
                    ))
                }
                Storage::EncryptedSectors => {
                    entries.push((name.to_string(), data.to_vec(), data.len() as u32, FILE_EXISTS | FILE_ENCRYPTED))
                }
            }
        }
        entries.push((LISTFILE_NAME.to_string(), listfile.clone().into_bytes(), listfile.len() as u32, FILE_EXISTS | FILE_SINGLE_UNIT));

        let hash_size = (entries.len() * 2).next_power_of_two().max(4);
        let mut out = vec![0u8; 32];
        let mut hash_table = vec![[HASH_ENTRY_EMPTY; 4]; hash_size];
        let mut block_table = Vec::new();

        for (index, (name, data, file_size, flags)) in entries.iter().enumerate() {
            let file_pos = out.len() as u32;
            let mut payload = data.clone();
            if flags & FILE_ENCRYPTED != 0 {
                let key = hash_string(name.rsplit('\\').next().unwrap(), HashType::FileKey);
                for (sector_index, sector) in payload.chunks_mut(512).enumerate() {
                    let mut words = crypt::bytes_to_words(sector);
                    encrypt_words(&mut words, key.wrapping_add(sector_index as u32));
                    for (chunk, word) in sector.chunks_exact_mut(4).zip(words) {
                        chunk.copy_from_slice(&word.to_le_bytes());
                    }
                }
            }
            out.extend(&payload);
            block_table.push([file_pos, payload.len() as u32, *file_size, *flags]);

            let mut slot = hash_string(name, HashType::TableOffset) as usize % hash_size;
            while hash_table[slot][3] != HASH_ENTRY_EMPTY {
                slot = (slot + 1) % hash_size;
            }
            hash_table[slot] = [
                hash_string(name, HashType::NameA),
                hash_string(name, HashType::NameB),
                0,
                index as u32,
            ];
        }

        let hash_pos = out.len() as u32;
        let mut words: Vec<u32> = hash_table.iter().flatten().copied().collect();
        encrypt_words(&mut words, hash_string("(hash table)", HashType::FileKey));
        out.extend(words.iter().flat_map(|w| w.to_le_bytes()));

        let block_pos = out.len() as u32;
        let mut words: Vec<u32> = block_table.iter().flatten().copied().collect();
        encrypt_words(&mut words, hash_string("(block table)", HashType::FileKey));
        out.extend(words.iter().flat_map(|w| w.to_le_bytes()));

        let archive_size = out.len() as u32;
        let mut header: Vec<u8> = Vec::with_capacity(32);
        header.extend(MPQ_MAGIC);
        header.extend(32u32.to_le_bytes());
        header.extend(archive_size.to_le_bytes());
        header.extend(0u16.to_le_bytes());
        header.extend(0u16.to_le_bytes());
        header.extend(hash_pos.to_le_bytes());
        header.extend(block_pos.to_le_bytes());
        header.extend((hash_size as u32).to_le_bytes());
        header.extend((block_table.len() as u32).to_le_bytes());
        out[..32].copy_from_slice(&header);

        std::fs::write(path, out).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{write_mpq, Storage};
    use super::*;
    use tempfile::TempDir;

    fn sample_archive(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("d2data.mpq");
        let long: Vec<u8> = (0..1300u32).map(|i| (i % 251) as u8).collect();
        write_mpq(
            &path,
            &[
                ("data\\global\\palette\\act1\\pal.dat", &b"stored bytes"[..], Storage::Stored),
                ("data\\global\\excel\\readme.txt", &b"zlib zlib zlib zlib zlib zlib"[..], Storage::Zlib),
                ("data\\global\\ui\\cursor.dc6", &long[..], Storage::EncryptedSectors),
            ],
        );
        path
    }

    #[test]
    fn test_reads_stored_file() {
        let dir = TempDir::new().unwrap();
        let mpq = Mpq::open(sample_archive(&dir)).unwrap();
        let data = mpq.read_file("data\\global\\palette\\act1\\pal.dat").unwrap();
        assert_eq!(data, b"stored bytes");
    }

    #[test]
    fn test_reads_zlib_file() {
        let dir = TempDir::new().unwrap();
        let mpq = Mpq::open(sample_archive(&dir)).unwrap();
        let data = mpq.read_file("DATA\\GLOBAL\\EXCEL\\README.TXT").unwrap();
        assert_eq!(data, b"zlib zlib zlib zlib zlib zlib");
    }

    #[test]
    fn test_reads_encrypted_sectored_file() {
        let dir = TempDir::new().unwrap();
        let mpq = Mpq::open(sample_archive(&dir)).unwrap();
        let data = mpq.read_file("data\\global\\ui\\cursor.dc6").unwrap();
        assert_eq!(data.len(), 1300);
        assert!(data.iter().enumerate().all(|(i, b)| *b == (i % 251) as u8));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let mpq = Mpq::open(sample_archive(&dir)).unwrap();
        assert!(!mpq.contains("data\\nothing.txt"));
        assert!(matches!(
            mpq.read_file("data\\nothing.txt"),
            Err(ArchiveError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_listfile_names() {
        let dir = TempDir::new().unwrap();
        let mpq = Mpq::open(sample_archive(&dir)).unwrap();
        let names = mpq.list_files().unwrap();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"data\\global\\excel\\readme.txt".to_string()));
        assert_eq!(mpq.file_name(), "d2data.mpq");
    }

    #[test]
    fn test_rejects_non_archive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.mpq");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();
        assert!(matches!(Mpq::open(&path), Err(ArchiveError::NotAnArchive(_))));
    }

    #[test]
    fn test_parse_listfile_accepts_mixed_separators() {
        let names = parse_listfile("a.txt\r\nb.txt;c.txt\n\n  d.txt  ");
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt", "d.txt"]);
    }
}
