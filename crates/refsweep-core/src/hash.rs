use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read granularity; bounds memory regardless of attachment size.
const CHUNK_SIZE: usize = 1024 * 1024;

/// Content digest (hex) and byte size of a file, or the I/O error as a
/// string. Failure is data here — the classifier logs it as evidence
/// instead of aborting the run.
pub fn hash_file(path: &Path) -> Result<(String, u64), String> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return Err(e.to_string()),
    };

    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut size: u64 = 0;
    loop {
        match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                size += n as u64;
                hasher.update(&buf[..n]);
            }
            Err(e) => return Err(e.to_string()),
        }
    }
    Ok((hasher.finalize().to_hex().to_string(), size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_digest_and_size_match_content() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("f.bin");
        fs::write(&path, b"hello hashing").unwrap();

        let (digest, size) = hash_file(&path).unwrap();
        assert_eq!(size, 13);
        assert_eq!(digest, blake3::hash(b"hello hashing").to_hex().to_string());
    }

    #[test]
    fn test_identical_bytes_identical_digest() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a.bin");
        let b = tmp.path().join("b.bin");
        fs::write(&a, vec![0xAB; 4096]).unwrap();
        fs::write(&b, vec![0xAB; 4096]).unwrap();

        assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn test_unreadable_path_becomes_error_string() {
        let tmp = tempdir().unwrap();
        let err = hash_file(tmp.path()).unwrap_err();
        assert!(!err.is_empty());
    }
}
