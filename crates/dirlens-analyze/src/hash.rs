//! Streaming content digests.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256, Sha512};

use dirlens_core::{
    FileDigest, HASH_BUFFER_SIZE, HashAlgorithm, Logger, ReadError, default_logger,
};

/// Computes file digests without holding more than one buffer of content.
pub struct HashComputer {
    buffer_size: usize,
    logger: Arc<dyn Logger>,
}

impl HashComputer {
    /// Create a hasher with the default buffer size.
    pub fn new() -> Self {
        Self {
            buffer_size: HASH_BUFFER_SIZE,
            logger: default_logger(),
        }
    }

    /// Use a custom read buffer size (at least 1 byte).
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Use the given logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Hash the content of `path`.
    ///
    /// A failure part way through discards everything read so far.
    pub fn hash(&self, path: &Path, algorithm: HashAlgorithm) -> Result<FileDigest, ReadError> {
        let file = File::open(path).map_err(|e| ReadError::open(path, e))?;
        let digest = self
            .hash_reader(file, algorithm)
            .map_err(|e| ReadError::read(path, e))?;

        self.logger.debug(&format!(
            "{algorithm} of {} ({} bytes): {}",
            path.display(),
            digest.bytes_read,
            digest.hex
        ));
        Ok(digest)
    }

    /// Hash everything `reader` yields.
    pub fn hash_reader<R: Read>(
        &self,
        mut reader: R,
        algorithm: HashAlgorithm,
    ) -> io::Result<FileDigest> {
        let mut hasher = StreamHasher::new(algorithm);
        let mut buffer = vec![0u8; self.buffer_size];
        let mut bytes_read = 0u64;

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..n]);
            bytes_read += n as u64;
        }

        Ok(FileDigest {
            algorithm,
            hex: hasher.finalize_hex(),
            bytes_read,
        })
    }
}

impl Default for HashComputer {
    fn default() -> Self {
        Self::new()
    }
}

/// In-progress state of one of the supported digests.
enum StreamHasher {
    Sha256(Sha256),
    Sha512(Sha512),
    Blake3(Box<blake3::Hasher>),
}

impl StreamHasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => Self::Sha512(Sha512::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(hasher) => hasher.update(data),
            Self::Sha512(hasher) => hasher.update(data),
            Self::Blake3(hasher) => {
                hasher.update(data);
            }
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Self::Sha256(hasher) => format!("{:x}", hasher.finalize()),
            Self::Sha512(hasher) => format!("{:x}", hasher.finalize()),
            Self::Blake3(hasher) => hasher.finalize().to_hex().to_string(),
        }
    }
}
